use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use tgdrive::logic::file_list::{empty_state, file_row, upload_row, FileRow, UploadRow};
use tgdrive::model::{ConfirmAction, InputMode, Model};

use super::{dialogs, file_list, legend, search, status_bar, toast};

/// Main render function - draws the whole screen from the model
pub fn render(f: &mut Frame, model: &Model, base_url: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // sort bar
            Constraint::Length(3), // search
            Constraint::Min(5),    // file list
            Constraint::Length(3), // legend
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    status_bar::render_sort_bar(f, chunks[0], model.files.sort, model.files.direction);

    let visible = model.files.visible();
    search::render_search_input(
        f,
        chunks[1],
        &model.files.query,
        model.ui.input_mode == InputMode::Search,
        visible.len(),
        model.ui.vim_mode,
    );

    let uploads: Vec<UploadRow> = model.transfers.uploads.iter().map(upload_row).collect();
    let files: Vec<FileRow> = visible
        .iter()
        .map(|record| file_row(record, model.transfers.download(record.id)))
        .collect();
    let empty = empty_state(model.files.records.len(), visible.len());
    file_list::render_file_list(
        f,
        chunks[2],
        &uploads,
        &files,
        model.ui.selected,
        empty,
        model.files.loaded,
        " Files ",
    );

    legend::render_legend(
        f,
        chunks[3],
        model.ui.vim_mode,
        model.ui.input_mode,
        !model.files.normalized_query().is_empty(),
    );

    status_bar::render_status_bar(
        f,
        chunks[4],
        base_url,
        &model.ui.connection,
        model.files.records.len(),
        visible.len(),
        model.transfers.active_count(),
    );

    // Overlays, topmost last
    if model.ui.input_mode == InputMode::PickPath {
        dialogs::render_path_prompt(f, &model.ui.path_input);
    }
    if let Some(ConfirmAction::Delete { name, .. }) = &model.ui.confirm {
        dialogs::render_delete_confirmation(f, name);
    }
    if let Some(toast) = &model.ui.toast {
        toast::render_toast(f, f.area(), &toast.message, toast.is_error);
    }
}
