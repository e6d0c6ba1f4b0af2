//! Transfer Event Handler
//!
//! Moves upload/download rows through their phases as orchestrator events
//! arrive. Events for rows that no longer exist are ignored.

use crate::handlers::fetch_files;
use crate::messages::Command;
use crate::model::{Model, TaskPhase};
use crate::services::transfers::{TransferEvent, TransferKey, TransferUpdate};

pub fn handle_transfer_event(model: &mut Model, event: TransferEvent) -> Vec<Command> {
    match event.key {
        TransferKey::Upload(client_id) => handle_upload(model, &client_id, event.update),
        TransferKey::Download(file_id) => handle_download(model, file_id, event.update, event.at),
    }
}

fn handle_upload(model: &mut Model, client_id: &str, update: TransferUpdate) -> Vec<Command> {
    if update == TransferUpdate::Done {
        model.transfers.remove_upload(client_id);
        return vec![fetch_files(model)];
    }

    let Some(task) = model.transfers.upload_mut(client_id) else {
        return Vec::new();
    };

    match update {
        TransferUpdate::Started => task.phase = TaskPhase::Sending,
        TransferUpdate::Progress { percent, rate } => {
            task.percent = percent.min(100);
            if rate.is_some() {
                task.rate = rate;
            }
        }
        TransferUpdate::Processing => {
            task.phase = TaskPhase::Polling;
            task.rate = None;
        }
        TransferUpdate::Failed(message) => {
            task.phase = TaskPhase::Failed;
            model.show_toast(message, true);
        }
        TransferUpdate::Done | TransferUpdate::Saved(_) | TransferUpdate::SaveFailed(_) => {}
    }
    Vec::new()
}

fn handle_download(
    model: &mut Model,
    file_id: i64,
    update: TransferUpdate,
    at: std::time::Instant,
) -> Vec<Command> {
    match update {
        TransferUpdate::Failed(message) => {
            model.transfers.remove_download(file_id);
            model.show_toast(message, true);
        }
        TransferUpdate::Saved(path) => {
            model.transfers.finish_saving(file_id);
            model.show_toast(format!("Saved to {}", path.display()), false);
        }
        TransferUpdate::SaveFailed(message) => {
            model.transfers.finish_saving(file_id);
            model.show_toast(message, true);
        }
        update => {
            if update == TransferUpdate::Done {
                // The file is written after the server-side task is done
                model.transfers.begin_saving(file_id);
            }
            let Some(task) = model.transfers.download_mut(file_id) else {
                return Vec::new();
            };
            match update {
                TransferUpdate::Started => task.phase = TaskPhase::Polling,
                TransferUpdate::Progress { percent, rate } => {
                    task.percent = percent.min(100);
                    if rate.is_some() {
                        task.rate = rate;
                    }
                }
                TransferUpdate::Done => {
                    task.phase = TaskPhase::Done;
                    task.percent = 100;
                    task.finished_at = Some(at);
                }
                _ => {}
            }
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::transfers::DOWNLOAD_RESET_DELAY;
    use crate::model::UploadTask;
    use std::path::PathBuf;
    use std::time::Instant;

    fn upload_event(update: TransferUpdate) -> TransferEvent {
        TransferEvent {
            key: TransferKey::Upload("c1".to_string()),
            update,
            at: Instant::now(),
        }
    }

    fn download_event(update: TransferUpdate, at: Instant) -> TransferEvent {
        TransferEvent {
            key: TransferKey::Download(5),
            update,
            at,
        }
    }

    fn model_with_upload() -> Model {
        let mut model = Model::new(false);
        model
            .transfers
            .add_upload(UploadTask::new("c1".to_string(), "a.bin".to_string(), 100));
        model
    }

    #[test]
    fn test_upload_lifecycle() {
        let mut model = model_with_upload();

        handle_transfer_event(&mut model, upload_event(TransferUpdate::Started));
        assert_eq!(model.transfers.uploads[0].phase, TaskPhase::Sending);

        handle_transfer_event(
            &mut model,
            upload_event(TransferUpdate::Progress {
                percent: 40,
                rate: Some(100.0),
            }),
        );
        handle_transfer_event(
            &mut model,
            upload_event(TransferUpdate::Progress {
                percent: 60,
                rate: None,
            }),
        );
        let task = &model.transfers.uploads[0];
        assert_eq!(task.percent, 60);
        // last sampled rate is kept between samples
        assert_eq!(task.rate, Some(100.0));

        handle_transfer_event(&mut model, upload_event(TransferUpdate::Processing));
        let task = &model.transfers.uploads[0];
        assert_eq!(task.phase, TaskPhase::Polling);
        assert_eq!(task.rate, None);

        let commands = handle_transfer_event(&mut model, upload_event(TransferUpdate::Done));
        assert!(model.transfers.uploads.is_empty());
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], Command::FetchFiles { .. }));
    }

    #[test]
    fn test_upload_failure_keeps_row() {
        let mut model = model_with_upload();
        handle_transfer_event(
            &mut model,
            upload_event(TransferUpdate::Failed("Upload failed".to_string())),
        );
        assert_eq!(model.transfers.uploads[0].phase, TaskPhase::Failed);
        let toast = model.ui.toast.as_ref().unwrap();
        assert_eq!(toast.message, "Upload failed");
        assert!(toast.is_error);
    }

    #[test]
    fn test_download_done_then_reset() {
        let mut model = Model::new(false);
        model.transfers.begin_download(5);
        let now = Instant::now();

        handle_transfer_event(&mut model, download_event(TransferUpdate::Started, now));
        handle_transfer_event(
            &mut model,
            download_event(
                TransferUpdate::Progress {
                    percent: 50,
                    rate: Some(10.0),
                },
                now,
            ),
        );
        handle_transfer_event(&mut model, download_event(TransferUpdate::Done, now));

        let task = model.transfers.download(5).unwrap();
        assert_eq!(task.phase, TaskPhase::Done);
        assert_eq!(task.percent, 100);

        crate::handlers::update(&mut model, crate::messages::Msg::Tick(now + DOWNLOAD_RESET_DELAY));
        assert!(model.transfers.download(5).is_none());
        // still writing to disk
        assert_eq!(model.transfers.active_count(), 1);

        handle_transfer_event(
            &mut model,
            download_event(TransferUpdate::Saved(PathBuf::from("/tmp/dl/a.txt")), now),
        );
        assert_eq!(model.transfers.active_count(), 0);
    }

    #[test]
    fn test_download_failure_removes_row() {
        let mut model = Model::new(false);
        model.transfers.begin_download(5);
        handle_transfer_event(
            &mut model,
            download_event(TransferUpdate::Failed("Download failed".to_string()), Instant::now()),
        );
        assert!(model.transfers.download(5).is_none());
        assert_eq!(model.ui.toast.as_ref().unwrap().message, "Download failed");
    }

    #[test]
    fn test_save_failure_ends_saving() {
        let mut model = Model::new(false);
        model.transfers.begin_saving(5);
        handle_transfer_event(
            &mut model,
            download_event(
                TransferUpdate::SaveFailed("Download failed: disk full".to_string()),
                Instant::now(),
            ),
        );
        assert!(model.transfers.saving.is_empty());
        assert!(model.ui.toast.as_ref().unwrap().is_error);
    }

    #[test]
    fn test_saved_toast() {
        let mut model = Model::new(false);
        handle_transfer_event(
            &mut model,
            download_event(
                TransferUpdate::Saved(PathBuf::from("/tmp/dl/a.txt")),
                Instant::now(),
            ),
        );
        let toast = model.ui.toast.as_ref().unwrap();
        assert_eq!(toast.message, "Saved to /tmp/dl/a.txt");
        assert!(!toast.is_error);
    }
}
