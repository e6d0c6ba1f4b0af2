//! Pure Application Model - Elm Architecture
//!
//! The whole client state, split into focused sub-models:
//!
//! - **FilesModel**: cached listing, sort and search
//! - **TransfersModel**: uploads and downloads in flight
//! - **UiModel**: selection, dialogs, toast
//!
//! No services live here; all I/O happens in the runtime.

pub mod files;
pub mod transfers;
pub mod types;
pub mod ui;

pub use files::FilesModel;
pub use transfers::TransfersModel;
pub use types::*;
pub use ui::UiModel;

use crate::api::FileRecord;

/// Root application model composed of focused sub-models
#[derive(Clone, Debug)]
pub struct Model {
    pub files: FilesModel,
    pub transfers: TransfersModel,
    pub ui: UiModel,
}

impl Model {
    pub fn new(vim_mode: bool) -> Self {
        Self {
            files: FilesModel::new(),
            transfers: TransfersModel::new(),
            ui: UiModel::new(vim_mode),
        }
    }

    /// Record under the cursor, if any
    pub fn selected_record(&self) -> Option<&FileRecord> {
        let idx = self.ui.selected?;
        self.files.visible().get(idx).copied()
    }

    /// Re-point the selection after the visible rows changed
    pub fn reselect(&mut self, previous_id: Option<i64>) {
        let previous_index = self.ui.selected;
        let visible = self.files.visible();
        self.ui.selected =
            crate::logic::navigation::restore_selection(&visible, previous_id, previous_index);
    }

    pub fn has_modal(&self) -> bool {
        self.ui.has_modal()
    }

    pub fn show_toast(&mut self, message: impl Into<String>, is_error: bool) {
        self.ui.show_toast(message, is_error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str) -> FileRecord {
        FileRecord {
            id,
            name: name.to_string(),
            size_bytes: 10,
            size_human: "10 B".to_string(),
            uploaded_at: String::new(),
            share_token: None,
        }
    }

    #[test]
    fn test_selected_record_follows_filter() {
        let mut model = Model::new(false);
        model.files.replace(vec![record(1, "alpha"), record(2, "beta")]);
        model.ui.selected = Some(1);
        assert_eq!(model.selected_record().map(|r| r.id), Some(2));

        model.files.query = "alp".to_string();
        model.reselect(Some(2));
        assert_eq!(model.selected_record().map(|r| r.id), Some(1));
    }

    #[test]
    fn test_no_selection_on_empty_list() {
        let mut model = Model::new(false);
        model.reselect(None);
        assert!(model.selected_record().is_none());
    }
}
