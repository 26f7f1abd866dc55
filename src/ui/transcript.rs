use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::AppState;

/// 生ログのトランスクリプトを描画（末尾を優先して表示）
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = area.height.saturating_sub(2) as usize;
    let skip = state.transcript.len().saturating_sub(visible);

    let lines: Vec<Line> = state
        .transcript
        .iter()
        .skip(skip)
        .map(|l| Line::from(l.as_str()))
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(" Live Data Stream ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(widget, area);
}
