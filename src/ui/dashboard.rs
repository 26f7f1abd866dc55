use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::AppState;
use crate::telemetry::FieldGroup;

/// テレメトリダッシュボードを描画
///
/// One line per field group: a bold group title followed by its
/// label/value pairs, each value colored by severity.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let groups = state.snapshot.field_groups();
    let lines: Vec<Line> = groups.iter().map(group_line).collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(" Status ")
            .borders(Borders::ALL),
    );
    frame.render_widget(widget, area);
}

fn group_line(group: &FieldGroup) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(" {:<18}", group.title),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    for (i, row) in group.rows.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("{}: ", row.label),
            Style::default().fg(ratatui::style::Color::Yellow),
        ));
        spans.push(Span::styled(
            row.value.clone(),
            Style::default().fg(row.severity.color()),
        ));
    }

    Line::from(spans)
}
