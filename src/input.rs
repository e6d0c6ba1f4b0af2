//! Keyboard Input Mapping
//!
//! Turns key presses into messages. All state changes happen in
//! `handlers::update`; the only state kept here is the pending `g` of vim's
//! `gg`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use tgdrive::logic::ui::{cycle_sort_preset, sort_preset};
use tgdrive::messages::Msg;
use tgdrive::model::{InputMode, Model};

#[derive(Debug, Default)]
pub struct KeyMapper {
    pending_g: bool,
}

impl KeyMapper {
    pub fn map(&mut self, model: &Model, key: KeyEvent) -> Option<Msg> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            return Some(Msg::Quit);
        }

        // Confirmation prompt swallows everything else
        if model.ui.confirm.is_some() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(Msg::DeleteConfirmed),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    Some(Msg::DeleteCancelled)
                }
                _ => None,
            };
        }

        match model.ui.input_mode {
            InputMode::Search => return search_key(&model.files.query, key, ctrl),
            InputMode::PickPath => return path_key(&model.ui.path_input, key, ctrl),
            InputMode::Normal => {}
        }

        let vim = model.ui.vim_mode;
        let pending_g = std::mem::take(&mut self.pending_g);

        match key.code {
            KeyCode::Char('q') => Some(Msg::Quit),
            KeyCode::Down => Some(Msg::SelectNext),
            KeyCode::Up => Some(Msg::SelectPrev),
            KeyCode::Char('j') if vim => Some(Msg::SelectNext),
            KeyCode::Char('k') if vim => Some(Msg::SelectPrev),
            KeyCode::Home => Some(Msg::SelectFirst),
            KeyCode::End => Some(Msg::SelectLast),
            KeyCode::Char('g') if vim => {
                if pending_g {
                    Some(Msg::SelectFirst)
                } else {
                    self.pending_g = true;
                    None
                }
            }
            KeyCode::Char('G') if vim => Some(Msg::SelectLast),
            KeyCode::Char('f') if ctrl => Some(Msg::OpenSearch),
            KeyCode::Char('/') => Some(Msg::OpenSearch),
            KeyCode::Esc if !model.files.query.is_empty() => {
                Some(Msg::SearchChanged(String::new()))
            }
            KeyCode::Enter | KeyCode::Char('d') => Some(Msg::DownloadSelected),
            KeyCode::Char('s') => Some(Msg::ShareToggleSelected),
            KeyCode::Char('x') | KeyCode::Delete => Some(Msg::DeleteSelected),
            KeyCode::Char('u') => Some(Msg::OpenPathPrompt),
            KeyCode::Char(c @ '1'..='3') => {
                let slot = c.to_digit(10)? as usize;
                sort_preset(slot).map(|(sort, direction)| Msg::SortSelected(sort, direction))
            }
            KeyCode::Tab => {
                let (sort, direction) = cycle_sort_preset(model.files.sort);
                Some(Msg::SortSelected(sort, direction))
            }
            KeyCode::Char('r') => Some(Msg::SortReversed),
            KeyCode::Char('R') => Some(Msg::Refresh),
            KeyCode::Char('L') => Some(Msg::Logout),
            _ => None,
        }
    }
}

fn search_key(query: &str, key: KeyEvent, ctrl: bool) -> Option<Msg> {
    match key.code {
        KeyCode::Esc => Some(Msg::InputCancelled),
        KeyCode::Enter => Some(Msg::SearchSubmitted),
        KeyCode::Backspace => {
            let mut query = query.to_string();
            query.pop();
            Some(Msg::SearchChanged(query))
        }
        KeyCode::Char('u') if ctrl => Some(Msg::SearchChanged(String::new())),
        KeyCode::Char(c) if !ctrl => Some(Msg::SearchChanged(format!("{}{}", query, c))),
        _ => None,
    }
}

fn path_key(input: &str, key: KeyEvent, ctrl: bool) -> Option<Msg> {
    match key.code {
        KeyCode::Esc => Some(Msg::InputCancelled),
        KeyCode::Enter => Some(Msg::PathSubmitted),
        KeyCode::Backspace => {
            let mut input = input.to_string();
            input.pop();
            Some(Msg::PathInputChanged(input))
        }
        KeyCode::Char('u') if ctrl => Some(Msg::PathInputChanged(String::new())),
        KeyCode::Char(c) if !ctrl => Some(Msg::PathInputChanged(format!("{}{}", input, c))),
        _ => None,
    }
}
