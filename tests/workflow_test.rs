//! Integration tests for user workflows through `update`
//!
//! These drive the model with the same messages the runtime sends and check
//! the commands that come back, without a terminal or a server:
//! 1. Dropped paths become upload rows, empty files are skipped
//! 2. Upload rows go away once the server task is done
//! 3. Share toggles between share and revoke based on the record
//! 4. Sort changes refetch; search only re-filters

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tgdrive::api::FileRecord;
use tgdrive::clipboard::CopyOutcome;
use tgdrive::handlers::update;
use tgdrive::logic::errors::{ErrorType, RequestFailure};
use tgdrive::messages::{Command, Msg};
use tgdrive::model::{LocalFile, Model, TaskPhase};
use tgdrive::services::api::ApiResponse;
use tgdrive::services::transfers::{TransferEvent, TransferKey, TransferUpdate};
use tgdrive::{SortDirection, SortField};

fn record(id: i64, name: &str, token: Option<&str>) -> FileRecord {
    FileRecord {
        id,
        name: name.to_string(),
        size_bytes: 2048,
        size_human: "2.0 KB".to_string(),
        uploaded_at: "2024-05-01 12:00:00".to_string(),
        share_token: token.map(str::to_string),
    }
}

fn loaded_model(records: Vec<FileRecord>) -> Model {
    let mut model = Model::new(false);
    let commands = update(
        &mut model,
        Msg::Api(ApiResponse::FilesLoaded {
            sort: SortField::Date,
            direction: SortDirection::Desc,
            files: Ok(records),
        }),
    );
    assert!(commands.is_empty());
    model
}

fn upload_event(client_id: &str, update: TransferUpdate) -> Msg {
    Msg::Transfer(TransferEvent {
        key: TransferKey::Upload(client_id.to_string()),
        update,
        at: Instant::now(),
    })
}

#[test]
fn test_paste_resolves_every_dropped_path() {
    let mut model = Model::new(false);
    let commands = update(
        &mut model,
        Msg::Pasted("'/tmp/my file.txt' /tmp/b.png\nfile:///tmp/c%20d.pdf\n".to_string()),
    );

    assert_eq!(
        commands,
        vec![Command::ResolvePaths(vec![
            PathBuf::from("/tmp/my file.txt"),
            PathBuf::from("/tmp/b.png"),
            PathBuf::from("/tmp/c d.pdf"),
        ])]
    );
}

#[test]
fn test_empty_files_are_not_uploaded() {
    let mut model = Model::new(false);
    let commands = update(
        &mut model,
        Msg::FilesPicked(vec![
            LocalFile {
                path: PathBuf::from("/tmp/empty.txt"),
                size: 0,
            },
            LocalFile {
                path: PathBuf::from("/tmp/data.bin"),
                size: 10,
            },
        ]),
    );

    assert_eq!(commands.len(), 1);
    assert!(matches!(
        &commands[0],
        Command::StartUpload { file, .. } if file.path == PathBuf::from("/tmp/data.bin")
    ));
    assert_eq!(model.transfers.uploads.len(), 1);
    assert_eq!(model.transfers.uploads[0].name, "data.bin");
}

#[test]
fn test_upload_row_lifecycle() {
    let mut model = Model::new(false);
    let commands = update(
        &mut model,
        Msg::FilesPicked(vec![LocalFile {
            path: PathBuf::from("/tmp/video.mp4"),
            size: 1000,
        }]),
    );
    let client_id = match &commands[0] {
        Command::StartUpload { client_id, .. } => client_id.clone(),
        other => panic!("unexpected command: {:?}", other),
    };

    update(&mut model, upload_event(&client_id, TransferUpdate::Started));
    update(
        &mut model,
        upload_event(
            &client_id,
            TransferUpdate::Progress {
                percent: 50,
                rate: Some(500.0),
            },
        ),
    );
    assert_eq!(model.transfers.uploads[0].phase, TaskPhase::Sending);
    assert_eq!(model.transfers.uploads[0].percent, 50);

    // A progress event without a new sample keeps the last rate
    update(
        &mut model,
        upload_event(
            &client_id,
            TransferUpdate::Progress {
                percent: 60,
                rate: None,
            },
        ),
    );
    assert_eq!(model.transfers.uploads[0].rate, Some(500.0));

    update(&mut model, upload_event(&client_id, TransferUpdate::Processing));
    assert_eq!(model.transfers.uploads[0].phase, TaskPhase::Polling);

    let commands = update(&mut model, upload_event(&client_id, TransferUpdate::Done));
    assert!(model.transfers.uploads.is_empty());
    assert_eq!(
        commands,
        vec![Command::FetchFiles {
            sort: SortField::Date,
            direction: SortDirection::Desc,
        }]
    );
}

#[test]
fn test_failed_upload_shows_error_and_stays_until_refresh() {
    let mut model = Model::new(false);
    let commands = update(
        &mut model,
        Msg::FilesPicked(vec![LocalFile {
            path: PathBuf::from("/tmp/big.iso"),
            size: 10,
        }]),
    );
    let Command::StartUpload { client_id, .. } = &commands[0] else {
        panic!("expected an upload");
    };
    let client_id = client_id.clone();

    update(
        &mut model,
        upload_event(&client_id, TransferUpdate::Failed("File too large".to_string())),
    );
    let toast = model.ui.toast.as_ref().unwrap();
    assert_eq!(toast.message, "File too large");
    assert!(toast.is_error);
    assert_eq!(model.transfers.uploads[0].phase, TaskPhase::Failed);

    update(
        &mut model,
        Msg::Api(ApiResponse::FilesLoaded {
            sort: SortField::Date,
            direction: SortDirection::Desc,
            files: Ok(vec![]),
        }),
    );
    assert!(model.transfers.uploads.is_empty());
}

#[test]
fn test_share_toggle_round_trip() {
    let mut model = loaded_model(vec![record(1, "a.txt", None)]);

    let commands = update(&mut model, Msg::ShareToggleSelected);
    assert_eq!(commands, vec![Command::Share { file_id: 1 }]);

    let commands = update(
        &mut model,
        Msg::Api(ApiResponse::Shared {
            file_id: 1,
            link: Ok("https://drive.example/s/tok".to_string()),
        }),
    );
    assert_eq!(commands[0], Command::CopyLink("https://drive.example/s/tok".to_string()));
    assert!(matches!(commands[1], Command::FetchFiles { .. }));

    update(
        &mut model,
        Msg::LinkCopied(CopyOutcome::Copied {
            via: "native".to_string(),
        }),
    );
    assert_eq!(model.ui.toast.as_ref().unwrap().message, "Share link copied!");

    // The refresh comes back with the token set
    update(
        &mut model,
        Msg::Api(ApiResponse::FilesLoaded {
            sort: SortField::Date,
            direction: SortDirection::Desc,
            files: Ok(vec![record(1, "a.txt", Some("tok"))]),
        }),
    );
    let commands = update(&mut model, Msg::ShareToggleSelected);
    assert_eq!(commands, vec![Command::Revoke { file_id: 1 }]);

    let commands = update(
        &mut model,
        Msg::Api(ApiResponse::Revoked {
            file_id: 1,
            result: Ok(()),
        }),
    );
    assert!(matches!(commands.as_slice(), [Command::FetchFiles { .. }]));
    assert_eq!(model.ui.toast.as_ref().unwrap().message, "Share link revoked.");
}

#[test]
fn test_copy_unavailable_shows_link() {
    let mut model = Model::new(false);
    update(
        &mut model,
        Msg::LinkCopied(CopyOutcome::Unavailable {
            text: "https://drive.example/s/tok".to_string(),
        }),
    );
    let toast = model.ui.toast.as_ref().unwrap();
    assert_eq!(toast.message, "https://drive.example/s/tok");
    assert!(!toast.is_error);
}

#[test]
fn test_sort_refetches_search_does_not() {
    let mut model = loaded_model(vec![
        record(1, "Holiday.jpg", None),
        record(2, "notes.txt", None),
        record(3, "holiday-2.jpg", None),
    ]);

    let commands = update(&mut model, Msg::SortSelected(SortField::Name, SortDirection::Asc));
    assert_eq!(
        commands,
        vec![Command::FetchFiles {
            sort: SortField::Name,
            direction: SortDirection::Asc,
        }]
    );

    let commands = update(&mut model, Msg::SortReversed);
    assert_eq!(
        commands,
        vec![Command::FetchFiles {
            sort: SortField::Name,
            direction: SortDirection::Desc,
        }]
    );

    update(&mut model, Msg::OpenSearch);
    let commands = update(&mut model, Msg::SearchChanged("  HOLIDAY ".to_string()));
    assert!(commands.is_empty());
    let visible: Vec<i64> = model.files.visible().iter().map(|r| r.id).collect();
    assert_eq!(visible, vec![1, 3]);
}

#[test]
fn test_listing_for_old_sort_is_ignored() {
    let mut model = loaded_model(vec![record(1, "a.txt", None)]);
    update(&mut model, Msg::SortSelected(SortField::Size, SortDirection::Asc));

    // Response for the previous sort arrives late
    update(
        &mut model,
        Msg::Api(ApiResponse::FilesLoaded {
            sort: SortField::Date,
            direction: SortDirection::Desc,
            files: Ok(vec![record(9, "stale.txt", None)]),
        }),
    );
    assert_eq!(model.files.records[0].id, 1);
}

#[test]
fn test_delete_requires_confirmation() {
    let mut model = loaded_model(vec![record(4, "old.log", None)]);

    assert!(update(&mut model, Msg::DeleteSelected).is_empty());
    assert!(model.has_modal());

    assert!(update(&mut model, Msg::DeleteCancelled).is_empty());
    assert!(!model.has_modal());

    update(&mut model, Msg::DeleteSelected);
    let commands = update(&mut model, Msg::DeleteConfirmed);
    assert_eq!(commands, vec![Command::Delete { file_id: 4 }]);

    let commands = update(
        &mut model,
        Msg::Api(ApiResponse::Deleted {
            file_id: 4,
            result: Err(RequestFailure {
                kind: ErrorType::Rejected,
                backend_message: Some("File not found".to_string()),
                detail: "File not found".to_string(),
            }),
        }),
    );
    assert!(commands.is_empty());
    assert_eq!(model.ui.toast.as_ref().unwrap().message, "File not found");
}

#[test]
fn test_download_runs_once_and_resets() {
    let mut model = loaded_model(vec![record(2, "movie.mkv", None)]);

    let commands = update(&mut model, Msg::DownloadSelected);
    assert_eq!(
        commands,
        vec![Command::StartDownload {
            file_id: 2,
            name: "movie.mkv".to_string(),
            size: 2048,
        }]
    );
    // Second press while running does nothing
    assert!(update(&mut model, Msg::DownloadSelected).is_empty());

    let done_at = Instant::now();
    update(
        &mut model,
        Msg::Transfer(TransferEvent {
            key: TransferKey::Download(2),
            update: TransferUpdate::Done,
            at: done_at,
        }),
    );
    assert_eq!(model.transfers.download(2).unwrap().percent, 100);

    update(&mut model, Msg::Tick(done_at + Duration::from_millis(100)));
    assert!(model.transfers.download(2).is_some());
    update(&mut model, Msg::Tick(done_at + Duration::from_millis(500)));
    assert!(model.transfers.download(2).is_none());
}

#[test]
fn test_logout_quits_on_success() {
    let mut model = Model::new(false);
    assert_eq!(update(&mut model, Msg::Logout), vec![Command::Logout]);
    update(
        &mut model,
        Msg::Api(ApiResponse::LoggedOut { result: Ok(()) }),
    );
    assert!(model.ui.should_quit);
}
