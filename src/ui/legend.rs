use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use tgdrive::model::InputMode;

fn key(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::Yellow))
}

/// Build hotkey spans (extracted for testability)
fn build_hotkey_spans(vim_mode: bool, input_mode: InputMode, has_query: bool) -> Vec<Span<'static>> {
    match input_mode {
        InputMode::Search => {
            return vec![
                key("Enter"),
                Span::raw(":Keep filter  "),
                key("Esc"),
                Span::raw(":Cancel search  "),
            ]
        }
        InputMode::PickPath => {
            return vec![
                key("Enter"),
                Span::raw(":Upload  "),
                key("Esc"),
                Span::raw(":Cancel  "),
            ]
        }
        InputMode::Normal => {}
    }

    let mut hotkey_spans = if vim_mode {
        vec![
            key("jk"),
            Span::raw(":Nav  "),
            key("gg/G"),
            Span::raw(":First/Last  "),
        ]
    } else {
        vec![key("↑/↓"), Span::raw(":Nav  ")]
    };

    hotkey_spans.extend(vec![
        key("Enter"),
        Span::raw(":Download  "),
        key("s"),
        Span::raw(":Share/Revoke  "),
        key("x"),
        Span::raw(":Delete  "),
        key("u"),
        Span::raw(":Upload  "),
        key("1/2/3"),
        Span::raw(":Date/Size/A-Z  "),
        key("r"),
        Span::raw(":Reverse  "),
        key("R"),
        Span::raw(":Refresh  "),
    ]);

    if has_query {
        hotkey_spans.extend(vec![key("Esc"), Span::raw(":Clear Search  ")]);
    } else {
        let search_key = if vim_mode { "/" } else { "^F" };
        hotkey_spans.extend(vec![key(search_key), Span::raw(":Search  ")]);
    }

    hotkey_spans.extend(vec![
        key("L"),
        Span::raw(":Logout  "),
        key("q"),
        Span::raw(":Quit"),
    ]);
    hotkey_spans
}

/// Render the hotkey legend
pub fn render_legend(f: &mut Frame, area: Rect, vim_mode: bool, input_mode: InputMode, has_query: bool) {
    let spans = build_hotkey_spans(vim_mode, input_mode, has_query);
    let legend = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Hotkeys"))
        .wrap(Wrap { trim: false });
    f.render_widget(legend, area);
}
