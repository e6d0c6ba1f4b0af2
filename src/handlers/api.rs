//! API Response Handler
//!
//! Applies responses from the background API worker to the model.

use crate::handlers::fetch_files;
use crate::messages::Command;
use crate::model::{ConnectionState, Model};
use crate::services::api::ApiResponse;

/// Handle API response from background service
///
/// Every successful write is followed by a list refresh; every failure ends
/// in an error toast carrying the backend's message when it sent one.
pub fn handle_api_response(model: &mut Model, response: ApiResponse) -> Vec<Command> {
    match response {
        ApiResponse::FilesLoaded {
            sort,
            direction,
            files,
        } => {
            // A listing for a sort the user has since moved away from
            if (sort, direction) != (model.files.sort, model.files.direction) {
                tracing::debug!(?sort, ?direction, "dropping stale file listing");
                return Vec::new();
            }

            match files {
                Ok(records) => {
                    let previous_id = model.selected_record().map(|r| r.id);
                    model.files.replace(records);
                    model.transfers.clear_failed_uploads();
                    model.ui.connection = ConnectionState::Connected;
                    model.reselect(previous_id);
                }
                Err(failure) => {
                    model.show_toast(failure.toast_message("Failed to load files"), true);
                    model.ui.connection = ConnectionState::Disconnected {
                        error_type: failure.kind,
                        message: failure.detail,
                    };
                }
            }
            Vec::new()
        }

        ApiResponse::Deleted { file_id, result } => match result {
            Ok(()) => {
                tracing::info!(file_id, "file deleted");
                model.show_toast("Deleted.", false);
                vec![fetch_files(model)]
            }
            Err(failure) => {
                model.show_toast(failure.toast_message("Delete failed"), true);
                Vec::new()
            }
        },

        ApiResponse::Shared { file_id, link } => match link {
            Ok(link) => {
                tracing::info!(file_id, "share link created");
                vec![Command::CopyLink(link), fetch_files(model)]
            }
            Err(failure) => {
                model.show_toast(failure.toast_message("Share failed"), true);
                Vec::new()
            }
        },

        ApiResponse::Revoked { file_id, result } => match result {
            Ok(()) => {
                tracing::info!(file_id, "share link revoked");
                model.show_toast("Share link revoked.", false);
                vec![fetch_files(model)]
            }
            Err(failure) => {
                model.show_toast(failure.toast_message("Revoke failed"), true);
                Vec::new()
            }
        },

        ApiResponse::LoggedOut { result } => {
            match result {
                Ok(()) => model.ui.should_quit = true,
                Err(failure) => model.show_toast(failure.toast_message("Logout failed"), true),
            }
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FileRecord;
    use crate::logic::errors::{ErrorType, RequestFailure};
    use crate::model::{TaskPhase, UploadTask};
    use crate::{SortDirection, SortField};

    fn record(id: i64, token: Option<&str>) -> FileRecord {
        FileRecord {
            id,
            name: format!("f{}", id),
            size_bytes: 1,
            size_human: "1 B".to_string(),
            uploaded_at: String::new(),
            share_token: token.map(str::to_string),
        }
    }

    fn failure(message: Option<&str>) -> RequestFailure {
        RequestFailure {
            kind: ErrorType::Rejected,
            backend_message: message.map(str::to_string),
            detail: "rejected".to_string(),
        }
    }

    fn loaded(files: Result<Vec<FileRecord>, RequestFailure>) -> ApiResponse {
        ApiResponse::FilesLoaded {
            sort: SortField::Date,
            direction: SortDirection::Desc,
            files,
        }
    }

    #[test]
    fn test_listing_replaces_cache_and_clears_failed_rows() {
        let mut model = Model::new(false);
        model.transfers.add_upload(UploadTask::new("c".into(), "x".into(), 5));
        model.transfers.uploads[0].phase = TaskPhase::Failed;

        let commands = handle_api_response(&mut model, loaded(Ok(vec![record(1, None)])));
        assert!(commands.is_empty());
        assert_eq!(model.files.records.len(), 1);
        assert!(model.transfers.uploads.is_empty());
        assert_eq!(model.ui.connection, ConnectionState::Connected);
        assert_eq!(model.ui.selected, Some(0));
    }

    #[test]
    fn test_stale_listing_ignored() {
        let mut model = Model::new(false);
        model.files.sort = SortField::Name;
        model.files.direction = SortDirection::Asc;
        handle_api_response(&mut model, loaded(Ok(vec![record(1, None)])));
        assert!(model.files.records.is_empty());
        assert!(!model.files.loaded);
    }

    #[test]
    fn test_listing_failure_toasts_and_keeps_cache() {
        let mut model = Model::new(false);
        model.files.replace(vec![record(1, None)]);
        handle_api_response(&mut model, loaded(Err(failure(None))));

        let toast = model.ui.toast.as_ref().unwrap();
        assert_eq!(toast.message, "Failed to load files");
        assert!(toast.is_error);
        assert_eq!(model.files.records.len(), 1);
        assert!(matches!(
            model.ui.connection,
            ConnectionState::Disconnected { .. }
        ));
    }

    #[test]
    fn test_delete_success_refreshes() {
        let mut model = Model::new(false);
        let commands = handle_api_response(
            &mut model,
            ApiResponse::Deleted {
                file_id: 1,
                result: Ok(()),
            },
        );
        assert_eq!(model.ui.toast.as_ref().unwrap().message, "Deleted.");
        assert_eq!(
            commands,
            vec![Command::FetchFiles {
                sort: SortField::Date,
                direction: SortDirection::Desc
            }]
        );
    }

    #[test]
    fn test_delete_failure_uses_backend_message() {
        let mut model = Model::new(false);
        let commands = handle_api_response(
            &mut model,
            ApiResponse::Deleted {
                file_id: 1,
                result: Err(failure(Some("File not found"))),
            },
        );
        assert!(commands.is_empty());
        assert_eq!(model.ui.toast.as_ref().unwrap().message, "File not found");
    }

    #[test]
    fn test_share_copies_then_refreshes() {
        let mut model = Model::new(false);
        let commands = handle_api_response(
            &mut model,
            ApiResponse::Shared {
                file_id: 1,
                link: Ok("https://d/s/abc".to_string()),
            },
        );
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], Command::CopyLink("https://d/s/abc".to_string()));
        assert!(matches!(commands[1], Command::FetchFiles { .. }));
    }

    #[test]
    fn test_share_and_revoke_failures() {
        let mut model = Model::new(false);
        handle_api_response(
            &mut model,
            ApiResponse::Shared {
                file_id: 1,
                link: Err(failure(None)),
            },
        );
        assert_eq!(model.ui.toast.as_ref().unwrap().message, "Share failed");

        handle_api_response(
            &mut model,
            ApiResponse::Revoked {
                file_id: 1,
                result: Err(failure(None)),
            },
        );
        assert_eq!(model.ui.toast.as_ref().unwrap().message, "Revoke failed");
    }

    #[test]
    fn test_revoke_success() {
        let mut model = Model::new(false);
        let commands = handle_api_response(
            &mut model,
            ApiResponse::Revoked {
                file_id: 1,
                result: Ok(()),
            },
        );
        assert_eq!(model.ui.toast.as_ref().unwrap().message, "Share link revoked.");
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_logout_quits() {
        let mut model = Model::new(false);
        handle_api_response(&mut model, ApiResponse::LoggedOut { result: Ok(()) });
        assert!(model.ui.should_quit);
    }
}
