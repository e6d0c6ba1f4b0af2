use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use tgdrive::logic::file_list::{EmptyState, FileRow, ProgressView, UploadRow};

/// Cut `text` to at most `max` terminal columns, marking the cut with `…`
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Text progress bar: `[#######.......]  40%  label`
pub fn progress_line(progress: &ProgressView, width: usize) -> Line<'static> {
    let bar_width = width.saturating_sub(8).clamp(4, 30);
    let filled = (bar_width * progress.percent.min(100) as usize + 50) / 100;

    Line::from(vec![
        Span::raw("  ["),
        Span::styled("#".repeat(filled), Style::default().fg(Color::Cyan)),
        Span::styled(
            ".".repeat(bar_width - filled),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("] {:>3}%  ", progress.percent)),
        Span::styled(progress.label.clone(), Style::default().fg(Color::Gray)),
    ])
}

fn upload_item(row: &UploadRow, width: usize) -> ListItem<'static> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("↑ ", Style::default().fg(Color::Yellow)),
            Span::styled(
                truncate_to_width(&row.name, width.saturating_sub(4)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("  {}", row.meta),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(progress) = &row.progress {
        lines.push(progress_line(progress, width));
    }
    ListItem::new(lines)
}

fn file_item(row: &FileRow, width: usize) -> ListItem<'static> {
    let mut lines = vec![
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                truncate_to_width(&row.name, width.saturating_sub(4)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!("  {}", row.meta),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("   "),
            Span::styled("[Download] ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("[{}] ", row.share_label),
                Style::default().fg(if row.share_label == "Revoke" {
                    Color::Magenta
                } else {
                    Color::Gray
                }),
            ),
            Span::styled("[Delete]", Style::default().fg(Color::Gray)),
        ]),
    ];
    if let Some(progress) = &row.progress {
        lines.push(progress_line(progress, width));
    }
    ListItem::new(lines)
}

/// Render the file list: upload placeholders first, then the visible records
///
/// `selected` indexes into `files` only; upload rows are not selectable.
pub fn render_file_list(
    f: &mut Frame,
    area: Rect,
    uploads: &[UploadRow],
    files: &[FileRow],
    selected: Option<usize>,
    empty: Option<EmptyState>,
    loaded: bool,
    title: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(Style::default().fg(Color::Cyan));
    let width = area.width.saturating_sub(2) as usize;

    let mut items: Vec<ListItem> = uploads.iter().map(|row| upload_item(row, width)).collect();
    items.extend(files.iter().map(|row| file_item(row, width)));

    if items.is_empty() {
        let message = match (loaded, empty) {
            (false, _) => "Loading...",
            (true, Some(state)) => state.message(),
            (true, None) => "",
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    // Records are filtered out by search but uploads are still listed
    if files.is_empty() {
        if let Some(state) = empty {
            items.push(ListItem::new(Line::from(Span::styled(
                format!("  {}", state.message()),
                Style::default().fg(Color::DarkGray),
            ))));
        }
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(selected.map(|idx| idx + uploads.len()));
    f.render_stateful_widget(list, area, &mut state);
}
