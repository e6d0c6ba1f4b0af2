//! File list row description
//!
//! Turns cached records and in-flight transfers into plain row data. The
//! ratatui drawer in `ui::file_list` only lays these out.

use crate::api::FileRecord;
use crate::logic::formatting::{format_bytes, format_rate};
use crate::model::{DownloadTask, TaskPhase, UploadTask};

/// Why the list has no record rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing on the server at all
    NoUploads,
    /// Records exist but the search hides all of them
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoUploads => "No uploads yet.",
            EmptyState::NoMatches => "No matching files.",
        }
    }
}

pub fn empty_state(total: usize, visible: usize) -> Option<EmptyState> {
    match (total, visible) {
        (0, _) => Some(EmptyState::NoUploads),
        (_, 0) => Some(EmptyState::NoMatches),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: u8,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRow {
    pub client_id: String,
    pub name: String,
    pub meta: String,
    /// `None` once the upload has failed
    pub progress: Option<ProgressView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub id: i64,
    pub name: String,
    pub meta: String,
    pub share_label: &'static str,
    /// Only present while a download is active
    pub progress: Option<ProgressView>,
}

/// Replace control characters so a file name cannot drive the terminal
///
/// # Examples
/// ```
/// use tgdrive::logic::file_list::sanitize_display;
///
/// assert_eq!(sanitize_display("report.pdf"), "report.pdf");
/// assert_eq!(sanitize_display("evil\x1b[2Jname"), "evil\u{fffd}[2Jname");
/// assert_eq!(sanitize_display("a\nb\tc"), "a\u{fffd}b\u{fffd}c");
/// ```
pub fn sanitize_display(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_control() { '\u{fffd}' } else { c })
        .collect()
}

pub fn share_label(record: &FileRecord) -> &'static str {
    if record.is_shared() {
        "Revoke"
    } else {
        "Share"
    }
}

/// Progress label for an upload, `None` when the progress UI is hidden
pub fn upload_label(task: &UploadTask) -> Option<String> {
    match task.phase {
        TaskPhase::Queued | TaskPhase::Preparing => Some("Preparing...".to_string()),
        TaskPhase::Sending => Some(match task.rate {
            Some(rate) => format!("Uploading to server... {}", format_rate(rate)),
            None => "Uploading to server...".to_string(),
        }),
        TaskPhase::Polling => Some(match task.rate {
            Some(rate) => format!("Uploading to Telegram... {}", format_rate(rate)),
            None => "Processing...".to_string(),
        }),
        TaskPhase::Done => Some("Processing...".to_string()),
        TaskPhase::Failed => None,
    }
}

pub fn download_label(task: &DownloadTask) -> String {
    if task.phase == TaskPhase::Done {
        return "Downloading... done".to_string();
    }
    format!("Downloading... {}", format_rate(task.rate.unwrap_or(0.0)))
}

pub fn upload_row(task: &UploadTask) -> UploadRow {
    UploadRow {
        client_id: task.client_id.clone(),
        name: sanitize_display(&task.name),
        meta: format!("{} | queued", format_bytes(task.size)),
        progress: upload_label(task).map(|label| ProgressView {
            percent: task.percent,
            label,
        }),
    }
}

pub fn file_row(record: &FileRecord, download: Option<&DownloadTask>) -> FileRow {
    let progress = download
        .filter(|task| task.phase != TaskPhase::Failed)
        .map(|task| ProgressView {
            percent: if task.phase == TaskPhase::Done {
                100
            } else {
                task.percent
            },
            label: download_label(task),
        });

    FileRow {
        id: record.id,
        name: sanitize_display(&record.name),
        meta: format!("{} | {}", record.size_human, record.uploaded_at),
        share_label: share_label(record),
        progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(share_token: Option<&str>) -> FileRecord {
        FileRecord {
            id: 9,
            name: "notes.txt".to_string(),
            size_bytes: 2048,
            size_human: "2.0 KB".to_string(),
            uploaded_at: "2024-05-01 12:00:00".to_string(),
            share_token: share_token.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_states() {
        assert_eq!(empty_state(0, 0), Some(EmptyState::NoUploads));
        assert_eq!(empty_state(3, 0), Some(EmptyState::NoMatches));
        assert_eq!(empty_state(3, 1), None);
        assert_eq!(EmptyState::NoUploads.message(), "No uploads yet.");
        assert_eq!(EmptyState::NoMatches.message(), "No matching files.");
    }

    #[test]
    fn test_share_label_follows_token() {
        assert_eq!(share_label(&record(None)), "Share");
        assert_eq!(share_label(&record(Some(""))), "Share");
        assert_eq!(share_label(&record(Some("tok"))), "Revoke");
    }

    #[test]
    fn test_file_row_meta_and_hidden_progress() {
        let row = file_row(&record(None), None);
        assert_eq!(row.meta, "2.0 KB | 2024-05-01 12:00:00");
        assert!(row.progress.is_none());
    }

    #[test]
    fn test_queued_upload_row() {
        let task = UploadTask::new("c1".to_string(), "clip.mp4".to_string(), 2048);
        let row = upload_row(&task);
        assert_eq!(row.meta, "2.0 KB | queued");
        let progress = row.progress.unwrap();
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.label, "Preparing...");
    }

    #[test]
    fn test_upload_labels_through_phases() {
        let mut task = UploadTask::new("c1".to_string(), "a".to_string(), 10);

        task.phase = TaskPhase::Sending;
        assert_eq!(upload_label(&task).unwrap(), "Uploading to server...");
        task.rate = Some(2048.0);
        assert_eq!(upload_label(&task).unwrap(), "Uploading to server... 2.0 KB/s");

        task.phase = TaskPhase::Polling;
        task.rate = None;
        assert_eq!(upload_label(&task).unwrap(), "Processing...");
        task.rate = Some(1024.0 * 1024.0);
        assert_eq!(upload_label(&task).unwrap(), "Uploading to Telegram... 1.0 MB/s");

        task.phase = TaskPhase::Failed;
        assert!(upload_label(&task).is_none());
        assert!(upload_row(&task).progress.is_none());
    }

    #[test]
    fn test_download_progress() {
        let mut task = DownloadTask::new(9);
        let row = file_row(&record(None), Some(&task));
        let progress = row.progress.unwrap();
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.label, "Downloading... 0 KB/s");

        task.phase = TaskPhase::Polling;
        task.percent = 40;
        task.rate = Some(512.0);
        let progress = file_row(&record(None), Some(&task)).progress.unwrap();
        assert_eq!(progress.label, "Downloading... 512.0 B/s");

        task.phase = TaskPhase::Done;
        let progress = file_row(&record(None), Some(&task)).progress.unwrap();
        assert_eq!(progress.percent, 100);
        assert_eq!(progress.label, "Downloading... done");
    }

    #[test]
    fn test_sanitized_names() {
        let mut rec = record(None);
        rec.name = "bad\u{7}name".to_string();
        assert_eq!(file_row(&rec, None).name, "bad\u{fffd}name");
    }
}
