//! Transfers Model
//!
//! In-flight uploads (keyed by client id) and downloads (keyed by file id).
//! Only one progress indicator exists per key.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use super::types::{DownloadTask, TaskPhase, UploadTask};

/// How long a finished download keeps its full bar before it is reset
pub const DOWNLOAD_RESET_DELAY: Duration = Duration::from_millis(400);

#[derive(Clone, Debug, Default)]
pub struct TransfersModel {
    /// Newest first, matching the order rows are shown in
    pub uploads: Vec<UploadTask>,

    pub downloads: HashMap<i64, DownloadTask>,

    /// Files still being written to disk. Outlives the download row, which
    /// is reset shortly after the server-side task is done.
    pub saving: HashSet<i64>,
}

impl TransfersModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_upload(&mut self, task: UploadTask) {
        self.uploads.insert(0, task);
    }

    pub fn upload_mut(&mut self, client_id: &str) -> Option<&mut UploadTask> {
        self.uploads.iter_mut().find(|t| t.client_id == client_id)
    }

    pub fn remove_upload(&mut self, client_id: &str) -> Option<UploadTask> {
        let idx = self.uploads.iter().position(|t| t.client_id == client_id)?;
        Some(self.uploads.remove(idx))
    }

    /// Rows of failed uploads stay visible (without progress) until the list
    /// is next refreshed.
    pub fn clear_failed_uploads(&mut self) {
        self.uploads.retain(|t| t.phase != TaskPhase::Failed);
    }

    /// Register a download; refuses while one is running or saving for the file
    pub fn begin_download(&mut self, file_id: i64) -> bool {
        if self.downloads.contains_key(&file_id) || self.saving.contains(&file_id) {
            return false;
        }
        self.downloads.insert(file_id, DownloadTask::new(file_id));
        true
    }

    pub fn download_mut(&mut self, file_id: i64) -> Option<&mut DownloadTask> {
        self.downloads.get_mut(&file_id)
    }

    pub fn download(&self, file_id: i64) -> Option<&DownloadTask> {
        self.downloads.get(&file_id)
    }

    pub fn remove_download(&mut self, file_id: i64) -> Option<DownloadTask> {
        self.downloads.remove(&file_id)
    }

    pub fn begin_saving(&mut self, file_id: i64) {
        self.saving.insert(file_id);
    }

    pub fn finish_saving(&mut self, file_id: i64) {
        self.saving.remove(&file_id);
    }

    /// Drop finished downloads whose reset delay has passed
    ///
    /// Returns how many rows were reset.
    pub fn expire_downloads(&mut self, now: Instant) -> usize {
        let before = self.downloads.len();
        self.downloads.retain(|_, task| match task.finished_at {
            Some(finished) => now.saturating_duration_since(finished) < DOWNLOAD_RESET_DELAY,
            None => true,
        });
        before - self.downloads.len()
    }

    pub fn active_count(&self) -> usize {
        self.uploads.iter().filter(|t| !t.phase.is_terminal()).count()
            + self.downloads.values().filter(|t| !t.phase.is_terminal()).count()
            + self.saving.len()
    }
}
