//! Shared types used across sub-models

use std::path::PathBuf;
use std::time::Instant;

use crate::logic::errors::ErrorType;

/// Lifecycle of an upload or download
///
/// `Queued → Sending/Preparing → Polling → Done | Failed`. The last two are
/// terminal; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Queued,
    /// Upload: the client is streaming bytes to the server
    Sending,
    /// Download: the server has been asked to prepare the file
    Preparing,
    /// Waiting on the server-side task
    Polling,
    Done,
    Failed,
}

impl TaskPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskPhase::Done | TaskPhase::Failed)
    }
}

/// A local file chosen for upload, with its size already looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub size: u64,
}

impl LocalFile {
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadTask {
    pub client_id: String,
    pub name: String,
    pub size: u64,
    pub phase: TaskPhase,
    pub percent: u8,
    /// Last sampled rate in bytes/second for the current phase
    pub rate: Option<f64>,
}

impl UploadTask {
    pub fn new(client_id: String, name: String, size: u64) -> Self {
        Self {
            client_id,
            name,
            size,
            phase: TaskPhase::Queued,
            percent: 0,
            rate: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadTask {
    pub file_id: i64,
    pub phase: TaskPhase,
    pub percent: u8,
    pub rate: Option<f64>,
    /// Set when the task reaches `Done`; the bar is reset shortly after
    pub finished_at: Option<Instant>,
}

impl DownloadTask {
    pub fn new(file_id: i64) -> Self {
        Self {
            file_id,
            phase: TaskPhase::Preparing,
            percent: 0,
            rate: None,
            finished_at: None,
        }
    }
}

/// Confirmation dialog state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete { file_id: i64, name: String },
}

/// What keystrokes are currently feeding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the search box
    Search,
    /// Typing a local path to upload
    PickPath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub is_error: bool,
    pub shown_at: Instant,
}

/// Result of the last list fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unknown,
    Connected,
    Disconnected {
        error_type: ErrorType,
        message: String,
    },
}
