use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use crate::telemetry::DeviceSnapshot;

/// アプリケーション内部イベント
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// キー入力
    Key(KeyEvent),
    /// ターミナルリサイズ
    Resize(u16, u16),
    /// One classified line from the reader worker: the raw transcript
    /// line plus the snapshot as of that line. Channel order is read
    /// order.
    Telemetry {
        raw: String,
        snapshot: DeviceSnapshot,
    },
    /// The reader worker stopped, with a reason when it wasn't asked to.
    SessionEnded { reason: Option<String> },
}

/// ユーザーアクション（キー入力から変換）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// 上に移動
    MoveUp,
    /// 下に移動
    MoveDown,
    /// 決定
    Select,
    /// 戻る / オーバーレイを閉じる
    Back,
    /// ヘルプ表示切替
    ToggleHelp,
    /// モニタリング開始
    StartMonitor,
    /// モニタリング停止
    StopMonitor,
    /// シリアルポート選択
    SelectPort,
    /// ボーレート選択
    SelectBaud,
    /// デバイスプロファイル切替（停止中のみ）
    ToggleProfile,
    /// ポート一覧を再取得
    RefreshPorts,
    /// トランスクリプトをクリア
    ClearTranscript,
    /// 終了
    Quit,
    /// 何もしない
    None,
}

impl From<KeyEvent> for Action {
    fn from(key: KeyEvent) -> Self {
        match (key.code, key.modifiers) {
            // 移動
            (KeyCode::Up | KeyCode::Char('k'), _) => Action::MoveUp,
            (KeyCode::Down | KeyCode::Char('j'), _) => Action::MoveDown,
            // 決定・戻る
            (KeyCode::Enter, _) => Action::Select,
            (KeyCode::Esc, _) => Action::Back,
            // ヘルプ
            (KeyCode::Char('?'), _) => Action::ToggleHelp,
            // セッション制御
            (KeyCode::Char('s'), _) => Action::StartMonitor,
            (KeyCode::Char('x'), _) => Action::StopMonitor,
            // 接続設定
            (KeyCode::Char('p'), _) => Action::SelectPort,
            (KeyCode::Char('b'), _) => Action::SelectBaud,
            (KeyCode::Char('d'), _) => Action::ToggleProfile,
            (KeyCode::Char('r'), _) => Action::RefreshPorts,
            // 表示
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
            (KeyCode::Char('c'), _) => Action::ClearTranscript,
            // 終了
            (KeyCode::Char('q'), _) => Action::Quit,
            // その他
            _ => Action::None,
        }
    }
}

/// イベントポーリング
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<AppEvent>> {
    if event::poll(timeout)? {
        match event::read()? {
            Event::Key(key) => Ok(Some(AppEvent::Key(key))),
            Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
            _ => Ok(None),
        }
    } else {
        Ok(None)
    }
}
