use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;

/// ヘルプオーバーレイを描画
pub fn render(frame: &mut Frame, area: Rect) {
    // 中央に配置
    let popup_area = centered_rect(60, 70, area);

    // 背景をクリア
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Monitoring",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  s    ", Style::default().fg(Color::Yellow)),
            Span::raw("  Start monitoring"),
        ]),
        Line::from(vec![
            Span::styled("  x    ", Style::default().fg(Color::Yellow)),
            Span::raw("  Stop monitoring"),
        ]),
        Line::from(vec![
            Span::styled("  c    ", Style::default().fg(Color::Yellow)),
            Span::raw("  Clear data stream"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Connection",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  p    ", Style::default().fg(Color::Yellow)),
            Span::raw("  Select serial port"),
        ]),
        Line::from(vec![
            Span::styled("  b    ", Style::default().fg(Color::Yellow)),
            Span::raw("  Select baud rate"),
        ]),
        Line::from(vec![
            Span::styled("  d    ", Style::default().fg(Color::Yellow)),
            Span::raw("  Switch device (Pet Feeder / Smart Home)"),
        ]),
        Line::from(vec![
            Span::styled("  r    ", Style::default().fg(Color::Yellow)),
            Span::raw("  Refresh port list"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Other",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  j/↓  ", Style::default().fg(Color::Yellow)),
            Span::raw("Move down (in dialogs)"),
        ]),
        Line::from(vec![
            Span::styled("  k/↑  ", Style::default().fg(Color::Yellow)),
            Span::raw("Move up (in dialogs)"),
        ]),
        Line::from(vec![
            Span::styled("  ?    ", Style::default().fg(Color::Yellow)),
            Span::raw("  Toggle this help"),
        ]),
        Line::from(vec![
            Span::styled("  Esc  ", Style::default().fg(Color::Yellow)),
            Span::raw("  Close overlay / Back"),
        ]),
        Line::from(vec![
            Span::styled("  q    ", Style::default().fg(Color::Yellow)),
            Span::raw("  Quit"),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help, popup_area);
}
