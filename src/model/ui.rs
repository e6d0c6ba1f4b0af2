//! UI Model
//!
//! Everything the screen needs that is not server data: selection, modal
//! dialogs, text inputs and the current toast.

use std::time::Instant;

use super::types::{ConfirmAction, ConnectionState, InputMode, Toast};

#[derive(Clone, Debug)]
pub struct UiModel {
    // ============================================
    // PREFERENCES
    // ============================================
    /// Whether vim keybindings are enabled
    pub vim_mode: bool,

    // ============================================
    // LIST STATE
    // ============================================
    /// Selected row within the *visible* (filtered) records
    pub selected: Option<usize>,

    // ============================================
    // DIALOGS & INPUTS
    // ============================================
    /// Pending confirmation, shown as a modal
    pub confirm: Option<ConfirmAction>,

    /// Which text input, if any, is receiving keystrokes
    pub input_mode: InputMode,

    /// Path being typed in the upload prompt
    pub path_input: String,

    /// Toast currently on screen
    pub toast: Option<Toast>,

    // ============================================
    // STATUS
    // ============================================
    pub connection: ConnectionState,

    /// Whether app should quit
    pub should_quit: bool,
}

impl UiModel {
    pub fn new(vim_mode: bool) -> Self {
        Self {
            vim_mode,
            selected: None,
            confirm: None,
            input_mode: InputMode::Normal,
            path_input: String::new(),
            toast: None,
            connection: ConnectionState::Unknown,
            should_quit: false,
        }
    }

    /// Check if a modal dialog or text prompt is grabbing input
    pub fn has_modal(&self) -> bool {
        self.confirm.is_some() || self.input_mode != InputMode::Normal
    }

    pub fn close_all_modals(&mut self) {
        self.confirm = None;
        self.input_mode = InputMode::Normal;
        self.path_input.clear();
    }

    /// Show a toast, replacing any that is already up
    pub fn show_toast(&mut self, message: impl Into<String>, is_error: bool) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error,
            shown_at: Instant::now(),
        });
    }

    pub fn should_dismiss_toast(&self) -> bool {
        self.toast.as_ref().is_some_and(|toast| {
            crate::logic::ui::should_dismiss_toast(toast.shown_at.elapsed().as_millis())
        })
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }
}
