//! Search Input UI
//!
//! Renders the search input box with query, match count, and cursor.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render search input box
///
/// # Arguments
/// - `query`: Current search query
/// - `active`: Whether input is actively receiving keystrokes
/// - `match_count`: Number of visible records
/// - `vim_mode`: Whether vim keybindings are enabled
pub fn render_search_input(
    f: &mut Frame,
    area: Rect,
    query: &str,
    active: bool,
    match_count: usize,
    vim_mode: bool,
) {
    let title = if active {
        format!(" Search ({} matches) - Enter to keep, Esc to cancel ", match_count)
    } else if !query.trim().is_empty() {
        format!(" Search ({} matches) - Esc to clear ", match_count)
    } else {
        let search_key = if vim_mode { "/" } else { "Ctrl-F" };
        format!(" Search ({}) ", search_key)
    };

    let border_color = if active { Color::Cyan } else { Color::Gray };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(border_color));

    let cursor_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::SLOW_BLINK);

    let input_line = if active {
        Line::from(vec![
            Span::raw("Name: "),
            Span::raw(query.to_string()),
            Span::styled("█", cursor_style),
        ])
    } else {
        Line::from(vec![Span::styled(
            format!("Name: {}", query),
            Style::default().fg(Color::Gray),
        )])
    };

    f.render_widget(Paragraph::new(vec![input_line]).block(block), area);
}
