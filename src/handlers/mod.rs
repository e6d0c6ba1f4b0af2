//! Event Handlers
//!
//! `update` is the single entry point: it takes the model and one message,
//! mutates the model, and returns the commands for the runtime to execute.
//! - api: Responses from the API worker
//! - transfers: Events from upload/download orchestrators
//!
//! User actions are handled here directly.

pub mod api;
pub mod transfers;

pub use api::handle_api_response;
pub use transfers::handle_transfer_event;

use crate::clipboard::CopyOutcome;
use crate::logic::navigation::{next_selection, prev_selection};
use crate::logic::paths::parse_dropped_paths;
use crate::messages::{Command, Msg};
use crate::model::{ConfirmAction, InputMode, LocalFile, Model, UploadTask};
use crate::utils::generate_client_id;

/// Refetch with the current sort
pub(crate) fn fetch_files(model: &Model) -> Command {
    Command::FetchFiles {
        sort: model.files.sort,
        direction: model.files.direction,
    }
}

pub fn update(model: &mut Model, msg: Msg) -> Vec<Command> {
    match msg {
        Msg::Pasted(text) => handle_paste(model, &text),
        Msg::FilesPicked(files) => queue_uploads(model, files),
        Msg::PickFailed { path, message } => {
            model.show_toast(format!("Cannot upload {}: {}", path.display(), message), true);
            Vec::new()
        }
        Msg::OpenPathPrompt => {
            model.ui.close_all_modals();
            model.ui.input_mode = InputMode::PickPath;
            Vec::new()
        }
        Msg::PathInputChanged(text) => {
            if model.ui.input_mode == InputMode::PickPath {
                model.ui.path_input = text;
            }
            Vec::new()
        }
        Msg::PathSubmitted => {
            let text = std::mem::take(&mut model.ui.path_input);
            model.ui.input_mode = InputMode::Normal;
            resolve(parse_dropped_paths(&text))
        }

        Msg::SortSelected(sort, direction) => {
            model.files.sort = sort;
            model.files.direction = direction;
            vec![fetch_files(model)]
        }
        Msg::SortReversed => {
            model.files.direction = model.files.direction.reversed();
            vec![fetch_files(model)]
        }
        Msg::OpenSearch => {
            model.ui.input_mode = InputMode::Search;
            Vec::new()
        }
        Msg::SearchChanged(query) => {
            set_query(model, query);
            Vec::new()
        }
        Msg::SearchSubmitted => {
            model.ui.input_mode = InputMode::Normal;
            Vec::new()
        }
        Msg::InputCancelled => {
            match model.ui.input_mode {
                InputMode::Search => set_query(model, String::new()),
                InputMode::PickPath => model.ui.path_input.clear(),
                InputMode::Normal => {}
            }
            model.ui.input_mode = InputMode::Normal;
            Vec::new()
        }
        Msg::Refresh => vec![fetch_files(model)],

        Msg::SelectNext => {
            let len = model.files.visible().len();
            model.ui.selected = next_selection(model.ui.selected, len);
            Vec::new()
        }
        Msg::SelectPrev => {
            let len = model.files.visible().len();
            model.ui.selected = prev_selection(model.ui.selected, len);
            Vec::new()
        }
        Msg::SelectFirst => {
            let len = model.files.visible().len();
            model.ui.selected = (len > 0).then_some(0);
            Vec::new()
        }
        Msg::SelectLast => {
            let len = model.files.visible().len();
            model.ui.selected = len.checked_sub(1);
            Vec::new()
        }

        Msg::DownloadSelected => start_download(model),
        Msg::ShareToggleSelected => toggle_share(model),
        Msg::DeleteSelected => {
            let action = model.selected_record().map(|record| ConfirmAction::Delete {
                file_id: record.id,
                name: record.name.clone(),
            });
            if action.is_some() {
                model.ui.confirm = action;
            }
            Vec::new()
        }
        Msg::DeleteConfirmed => match model.ui.confirm.take() {
            Some(ConfirmAction::Delete { file_id, .. }) => vec![Command::Delete { file_id }],
            None => Vec::new(),
        },
        Msg::DeleteCancelled => {
            model.ui.confirm = None;
            Vec::new()
        }
        Msg::LinkCopied(outcome) => {
            match outcome {
                CopyOutcome::Copied { .. } => model.show_toast("Share link copied!", false),
                // Nothing could take the link; show it so it can be copied by hand
                CopyOutcome::Unavailable { text } => model.show_toast(text, false),
            }
            Vec::new()
        }

        Msg::Logout => vec![Command::Logout],
        Msg::Quit => {
            model.ui.should_quit = true;
            Vec::new()
        }

        Msg::Api(response) => handle_api_response(model, response),
        Msg::Transfer(event) => handle_transfer_event(model, event),
        Msg::Tick(now) => {
            let expired = model.transfers.expire_downloads(now);
            if expired > 0 {
                tracing::trace!(expired, "reset finished download rows");
            }
            if model.ui.should_dismiss_toast() {
                model.ui.dismiss_toast();
            }
            Vec::new()
        }
    }
}

fn resolve(paths: Vec<std::path::PathBuf>) -> Vec<Command> {
    if paths.is_empty() {
        return Vec::new();
    }
    vec![Command::ResolvePaths(paths)]
}

/// Pasted text goes to whichever input is active; otherwise it is a drop
fn handle_paste(model: &mut Model, text: &str) -> Vec<Command> {
    if model.ui.confirm.is_some() {
        return Vec::new();
    }

    match model.ui.input_mode {
        InputMode::Search => {
            let mut query = model.files.query.clone();
            query.extend(text.chars().filter(|c| !c.is_control()));
            set_query(model, query);
            Vec::new()
        }
        InputMode::PickPath => {
            model.ui.path_input.push_str(text);
            Vec::new()
        }
        InputMode::Normal => resolve(parse_dropped_paths(text)),
    }
}

/// Re-filter locally; the server is not asked again
fn set_query(model: &mut Model, query: String) {
    let previous_id = model.selected_record().map(|r| r.id);
    model.files.query = query;
    model.reselect(previous_id);
}

fn queue_uploads(model: &mut Model, files: Vec<LocalFile>) -> Vec<Command> {
    let mut commands = Vec::new();

    for file in files {
        if file.size == 0 {
            tracing::debug!(path = %file.path.display(), "skipping empty file");
            continue;
        }

        let client_id = generate_client_id();
        model.transfers.add_upload(UploadTask::new(
            client_id.clone(),
            file.display_name(),
            file.size,
        ));
        commands.push(Command::StartUpload { client_id, file });
    }

    commands
}

fn start_download(model: &mut Model) -> Vec<Command> {
    let Some(record) = model.selected_record().cloned() else {
        return Vec::new();
    };

    if !model.transfers.begin_download(record.id) {
        tracing::debug!(file_id = record.id, "download already running");
        return Vec::new();
    }

    vec![Command::StartDownload {
        file_id: record.id,
        name: record.name,
        size: record.size_bytes,
    }]
}

fn toggle_share(model: &mut Model) -> Vec<Command> {
    match model.selected_record() {
        Some(record) if record.is_shared() => vec![Command::Revoke { file_id: record.id }],
        Some(record) => vec![Command::Share { file_id: record.id }],
        None => Vec::new(),
    }
}
