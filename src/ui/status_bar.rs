use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use tgdrive::logic::errors::describe;
use tgdrive::logic::ui::SORT_PRESETS;
use tgdrive::model::ConnectionState;
use tgdrive::{SortDirection, SortField};

/// Render the sort bar: the three presets plus the direction
pub fn render_sort_bar(f: &mut Frame, area: Rect, sort: SortField, direction: SortDirection) {
    let mut spans = vec![Span::styled(" Sort: ", Style::default().fg(Color::Gray))];

    for (idx, (field, _)) in SORT_PRESETS.iter().enumerate() {
        let label = format!("[{}] {}", idx + 1, field.as_str());
        let style = if *field == sort {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("  "));
    }

    let arrow = match direction {
        SortDirection::Asc => "↑ asc",
        SortDirection::Desc => "↓ desc",
    };
    spans.push(Span::styled(arrow, Style::default().fg(Color::Yellow)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the bottom status bar
pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    base_url: &str,
    connection: &ConnectionState,
    total: usize,
    visible: usize,
    active_transfers: usize,
) {
    let (state_text, state_color) = match connection {
        ConnectionState::Unknown => ("Connecting...".to_string(), Color::Yellow),
        ConnectionState::Connected => ("Connected".to_string(), Color::Green),
        ConnectionState::Disconnected {
            error_type,
            message,
        } => (
            format!("{}: {}", describe(*error_type), message),
            Color::Red,
        ),
    };

    let files_text = if visible == total {
        format!("{} files", total)
    } else {
        format!("{}/{} files", visible, total)
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(state_text, Style::default().fg(state_color)),
        Span::raw(" │ "),
        Span::raw(base_url.to_string()),
        Span::raw(" │ "),
        Span::raw(files_text),
        Span::raw(" │ "),
        Span::raw(format!("{} active transfer(s)", active_transfers)),
    ]);

    f.render_widget(
        Paragraph::new(line).style(Style::default().fg(Color::Gray)),
        area,
    );
}
