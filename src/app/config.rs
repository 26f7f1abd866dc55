use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::telemetry::DeviceProfile;

/// アプリケーション設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 起動時に選択するシリアルポート（未設定時はダイアログで選択）
    pub default_port: Option<String>,
    /// デフォルトのボーレート
    #[serde(default = "default_baud")]
    pub default_baud: u32,
    /// デフォルトのデバイスプロファイル
    #[serde(default)]
    pub default_device: DeviceProfile,
    /// トランスクリプトの最大保持行数
    #[serde(default = "default_transcript_limit")]
    pub transcript_limit: usize,
    /// ログレベル
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_baud() -> u32 {
    115200
}

fn default_transcript_limit() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_port: None,
            default_baud: default_baud(),
            default_device: DeviceProfile::default(),
            transcript_limit: default_transcript_limit(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// 設定ファイルから読み込み（存在しない場合はデフォルトを作成して保存）
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))?;
            Ok(config)
        } else {
            // 初回起動時はデフォルト設定をファイルに保存
            let config = Self::default();
            if let Err(e) = config.save_to(config_path) {
                tracing::warn!("Failed to save default config: {}", e);
            }
            Ok(config)
        }
    }

    /// 設定ファイルパスを取得
    pub fn config_path() -> Result<PathBuf> {
        // ~/.config/device-monitor/config.toml を使用
        let base_dirs = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))?;
        Ok(base_dirs.home_dir().join(".config/device-monitor/config.toml"))
    }

    /// 現在の設定をファイルに保存
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip_preserves_fields() {
        let config = Config {
            default_port: Some("/dev/ttyUSB0".to_string()),
            default_baud: 9600,
            default_device: DeviceProfile::Home,
            transcript_limit: 250,
            log_level: "debug".to_string(),
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.default_port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(parsed.default_baud, 9600);
        assert_eq!(parsed.default_device, DeviceProfile::Home);
        assert_eq!(parsed.transcript_limit, 250);
        assert_eq!(parsed.log_level, "debug");
    }

    #[test]
    fn save_and_load_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config {
            default_port: Some("/dev/ttyACM0".to_string()),
            default_baud: 57600,
            default_device: DeviceProfile::Home,
            transcript_limit: 500,
            log_level: "trace".to_string(),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(loaded.default_baud, 57600);
        assert_eq!(loaded.default_device, DeviceProfile::Home);
        assert_eq!(loaded.transcript_limit, 500);
        assert_eq!(loaded.log_level, "trace");
    }

    #[test]
    fn first_load_writes_default_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device-monitor").join("config.toml");

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_baud, 115200);
        assert_eq!(loaded.default_device, DeviceProfile::Feeder);
        // 初回読み込みでファイルが作られている
        assert!(path.exists());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.default_baud, 115200);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.default_port, None);
        assert_eq!(parsed.default_baud, 115200);
        assert_eq!(parsed.default_device, DeviceProfile::Feeder);
        assert_eq!(parsed.transcript_limit, 1000);
        assert_eq!(parsed.log_level, "info");
    }
}
