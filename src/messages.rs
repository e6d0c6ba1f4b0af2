//! Message types for the Elm Architecture pattern
//!
//! Every state change flows through a `Msg` into `handlers::update`, which
//! mutates the model and returns the `Command`s the runtime must execute.
//!
//! Message sources:
//! - User input (keys mapped by the binary, pasted text)
//! - API responses (from the background API worker)
//! - Transfer events (from upload/download orchestrators)
//! - Timers (periodic ticks)

use std::path::PathBuf;
use std::time::Instant;

use crate::clipboard::CopyOutcome;
use crate::model::LocalFile;
use crate::services::api::ApiResponse;
use crate::services::transfers::TransferEvent;
use crate::{SortDirection, SortField};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    // ============================================
    // UPLOAD SOURCES
    // ============================================
    /// Raw text pasted into the terminal (a file drop arrives this way)
    Pasted(String),

    /// Local files resolved from dropped/typed paths
    FilesPicked(Vec<LocalFile>),

    /// A dropped/typed path could not be used
    PickFailed { path: PathBuf, message: String },

    OpenPathPrompt,
    PathInputChanged(String),
    PathSubmitted,

    // ============================================
    // SORT & SEARCH
    // ============================================
    SortSelected(SortField, SortDirection),
    SortReversed,
    OpenSearch,
    SearchChanged(String),
    /// Leave the search box, keeping the filter
    SearchSubmitted,
    /// Leave the search box or path prompt, clearing its text
    InputCancelled,
    Refresh,

    // ============================================
    // LIST
    // ============================================
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,

    // ============================================
    // ROW ACTIONS
    // ============================================
    DownloadSelected,
    ShareToggleSelected,
    DeleteSelected,
    DeleteConfirmed,
    DeleteCancelled,
    LinkCopied(CopyOutcome),

    // ============================================
    // SESSION
    // ============================================
    Logout,
    Quit,

    // ============================================
    // BACKGROUND
    // ============================================
    Api(ApiResponse),
    Transfer(TransferEvent),
    Tick(Instant),
}

/// Side effects requested by `update`, executed by the runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchFiles {
        sort: SortField,
        direction: SortDirection,
    },
    /// Stat the paths and come back with `FilesPicked`/`PickFailed`
    ResolvePaths(Vec<PathBuf>),
    StartUpload {
        client_id: String,
        file: LocalFile,
    },
    StartDownload {
        file_id: i64,
        name: String,
        size: u64,
    },
    Delete {
        file_id: i64,
    },
    Share {
        file_id: i64,
    },
    Revoke {
        file_id: i64,
    },
    CopyLink(String),
    Logout,
}
