pub mod dashboard;
pub mod help_view;
pub mod port_dialog;
pub mod status_bar;
pub mod transcript;

pub use port_dialog::{SelectionDialog, SelectionDialogKind};

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{AppState, ViewMode};

/// 中央配置用のRect計算（共通ユーティリティ）
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// メインUIを描画
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // ダッシュボード行数はグループ数で決まる（枠込み）
    let dashboard_height = state.snapshot.field_groups().len() as u16 + 2;

    let chunks = Layout::vertical([
        Constraint::Length(3),                // 接続情報
        Constraint::Length(dashboard_height), // ダッシュボード
        Constraint::Min(5),                   // トランスクリプト
        Constraint::Length(1),                // ステータスバー
    ])
    .split(area);

    render_connection(frame, chunks[0], state);
    dashboard::render(frame, chunks[1], state);
    transcript::render(frame, chunks[2], state);
    status_bar::render(frame, chunks[3], state);

    // オーバーレイ
    match &state.view_mode {
        ViewMode::Help => {
            help_view::render(frame, area);
        }
        ViewMode::Selection => {
            if let Some(ref dialog) = state.selection_dialog {
                port_dialog::render(frame, area, dialog);
            }
        }
        ViewMode::Dashboard => {}
    }
}

/// 接続情報ヘッダを描画
fn render_connection(frame: &mut Frame, area: Rect, state: &AppState) {
    let port = state.selected_port.as_deref().unwrap_or("no port");
    let (link_label, link_color) = if state.monitoring {
        ("MONITORING", Color::Green)
    } else {
        ("STOPPED", Color::DarkGray)
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", state.profile.label()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("| "),
        Span::raw(format!("{} @ {} baud ", port, state.baud)),
        Span::raw("| "),
        Span::styled(link_label, Style::default().fg(link_color)),
    ]);

    let widget = Paragraph::new(line).block(
        Block::default()
            .title(" Device Monitor ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, area);
}
