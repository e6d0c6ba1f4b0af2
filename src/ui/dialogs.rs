use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::file_list::truncate_to_width;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

/// Render the delete confirmation dialog
pub fn render_delete_confirmation(f: &mut Frame, display_name: &str) {
    let prompt_width = 56;
    let name = truncate_to_width(display_name, prompt_width as usize - 10);
    let prompt_text = format!(
        "Delete this file from Telegram and the list?\n\n\
        File: {}\n\n\
        Continue? (y/n)",
        name
    );

    let prompt_area = centered(f.area(), prompt_width, 9);

    let prompt = Paragraph::new(prompt_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .border_style(Style::default().fg(Color::Red)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, prompt_area);
    f.render_widget(prompt, prompt_area);
}

/// Render the upload path prompt
pub fn render_path_prompt(f: &mut Frame, input: &str) {
    let prompt_area = centered(f.area(), 70, 7);
    let visible = prompt_area.width.saturating_sub(6) as usize;

    // Keep the end of a long path in view
    let shown: String = {
        let count = input.chars().count();
        input.chars().skip(count.saturating_sub(visible)).collect()
    };

    let lines = vec![
        Line::from(Span::styled(
            "Path(s) to upload. Quote paths with spaces, or drop files here.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("> "),
            Span::raw(shown),
            Span::styled(
                "█",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ]),
    ];

    let prompt = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Upload - Enter to send, Esc to cancel ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black));

    f.render_widget(Clear, prompt_area);
    f.render_widget(prompt, prompt_area);
}
