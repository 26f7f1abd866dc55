use std::collections::VecDeque;

use tracing::info;

use crate::serial;
use crate::telemetry::{DeviceProfile, DeviceSnapshot};
use crate::ui::port_dialog::SelectionDialog;

/// 表示モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// ダッシュボード表示
    #[default]
    Dashboard,
    /// ヘルプ表示
    Help,
    /// 選択ダイアログ表示
    Selection,
}

/// アプリケーション状態
pub struct AppState {
    /// 選択中のデバイスプロファイル
    pub profile: DeviceProfile,
    /// 最新のテレメトリスナップショット
    pub snapshot: DeviceSnapshot,
    /// 受信した生ログ行（新しいものが末尾）
    pub transcript: VecDeque<String>,
    /// トランスクリプトの最大保持行数
    pub transcript_limit: usize,
    /// 検出済みシリアルポート一覧
    pub ports: Vec<String>,
    /// 選択中のポート
    pub selected_port: Option<String>,
    /// 選択中のボーレート
    pub baud: u32,
    /// モニタリング中か
    pub monitoring: bool,
    /// 現在の表示モード
    pub view_mode: ViewMode,
    /// 開いている選択ダイアログ
    pub selection_dialog: Option<SelectionDialog>,
    /// ステータスバーに表示するメッセージ
    pub status_message: Option<String>,
    /// 終了フラグ
    pub should_quit: bool,
}

impl AppState {
    pub fn new(profile: DeviceProfile, baud: u32, transcript_limit: usize) -> Self {
        Self {
            profile,
            snapshot: DeviceSnapshot::new(profile),
            transcript: VecDeque::new(),
            transcript_limit,
            ports: Vec::new(),
            selected_port: None,
            baud,
            monitoring: false,
            view_mode: ViewMode::Dashboard,
            selection_dialog: None,
            status_message: None,
            should_quit: false,
        }
    }

    /// ポート一覧を再取得。選択中のポートが消えていたら先頭を選び直す。
    pub fn refresh_ports(&mut self) {
        match serial::list_ports() {
            Ok(ports) => self.ports = ports,
            Err(e) => {
                self.status_message = Some(format!("Port scan failed: {}", e));
                return;
            }
        }
        let still_present = self
            .selected_port
            .as_ref()
            .is_some_and(|p| self.ports.contains(p));
        if !still_present {
            self.selected_port = self.ports.first().cloned();
        }
        info!("found {} serial ports", self.ports.len());
    }

    /// セッション開始。スナップショットとトランスクリプトは毎回リセット。
    pub fn begin_session(&mut self) {
        self.snapshot = DeviceSnapshot::new(self.profile);
        self.transcript.clear();
        self.monitoring = true;
    }

    /// セッション終了。reason があれば異常終了としてメッセージに出す。
    pub fn end_session(&mut self, reason: Option<String>) {
        self.monitoring = false;
        self.status_message = match reason {
            Some(reason) => Some(format!("Session ended: {}", reason)),
            None => Some("Monitoring stopped".to_string()),
        };
    }

    /// ワーカーからのテレメトリを反映。停止後に残っていた分は捨てる。
    pub fn apply_telemetry(&mut self, raw: String, snapshot: DeviceSnapshot) {
        if !self.monitoring {
            return;
        }
        self.transcript.push_back(raw);
        while self.transcript.len() > self.transcript_limit {
            self.transcript.pop_front();
        }
        self.snapshot = snapshot;
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// プロファイル切替。モニタリング中は無効。
    pub fn toggle_profile(&mut self) {
        if self.monitoring {
            self.status_message = Some("Stop monitoring before switching device".to_string());
            return;
        }
        self.profile = self.profile.toggle();
        self.snapshot = DeviceSnapshot::new(self.profile);
        self.status_message = Some(format!("Device: {}", self.profile.label()));
    }

    pub fn open_dialog(&mut self, dialog: SelectionDialog) {
        self.selection_dialog = Some(dialog);
        self.view_mode = ViewMode::Selection;
    }

    pub fn close_dialog(&mut self) {
        self.selection_dialog = None;
        self.view_mode = ViewMode::Dashboard;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(DeviceProfile::Feeder, 115200, 3)
    }

    #[test]
    fn restart_resets_snapshot_and_transcript() {
        let mut state = state();
        state.begin_session();

        let mut snap = DeviceSnapshot::new(DeviceProfile::Feeder);
        snap.classify("Relay ON - Dispensing food", chrono::Local::now());
        state.apply_telemetry("Relay ON - Dispensing food".to_string(), snap);
        assert_ne!(state.snapshot, DeviceSnapshot::new(DeviceProfile::Feeder));
        assert_eq!(state.transcript.len(), 1);

        state.end_session(None);
        state.begin_session();
        assert_eq!(state.snapshot, DeviceSnapshot::new(DeviceProfile::Feeder));
        assert!(state.transcript.is_empty());
    }

    #[test]
    fn transcript_is_capped() {
        let mut state = state();
        state.begin_session();
        for i in 0..10 {
            let snap = DeviceSnapshot::new(DeviceProfile::Feeder);
            state.apply_telemetry(format!("line {}", i), snap);
        }
        assert_eq!(state.transcript.len(), 3);
        assert_eq!(state.transcript.front().map(String::as_str), Some("line 7"));
        assert_eq!(state.transcript.back().map(String::as_str), Some("line 9"));
    }

    #[test]
    fn telemetry_after_stop_is_dropped() {
        let mut state = state();
        state.begin_session();
        state.end_session(None);

        let snap = DeviceSnapshot::new(DeviceProfile::Feeder);
        state.apply_telemetry("stale".to_string(), snap);
        assert!(state.transcript.is_empty());
    }

    #[test]
    fn profile_toggle_blocked_while_monitoring() {
        let mut state = state();
        state.begin_session();
        state.toggle_profile();
        assert_eq!(state.profile, DeviceProfile::Feeder);

        state.end_session(None);
        state.toggle_profile();
        assert_eq!(state.profile, DeviceProfile::Home);
        assert_eq!(state.snapshot.profile(), DeviceProfile::Home);
    }
}
