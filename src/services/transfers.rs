//! Upload and download orchestrators
//!
//! Every transfer runs as its own tokio task with its own poll interval and
//! a child `CancellationToken`. Tasks never touch the model: they report
//! through `TransferEvent`s, and each one ends with exactly one terminal
//! update (`Done` or `Failed`).

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, DriveClient, TaskStatus};
use crate::logic::formatting::percent_of;
use crate::logic::rate::{
    bytes_at_percent, RateSampler, POLL_SAMPLE_INTERVAL, SEND_SAMPLE_INTERVAL, UPLOAD_SMOOTHING,
};
use crate::model::LocalFile;
use crate::utils::create_unique_file;

/// How often a server-side upload task is polled
pub const UPLOAD_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// How often a download preparation task is polled
pub const DOWNLOAD_POLL_INTERVAL: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransferKey {
    /// Keyed by the client-generated id
    Upload(String),
    /// Keyed by file id
    Download(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransferUpdate {
    /// Upload: bytes are about to be sent. Download: the server accepted the
    /// start request and polling begins.
    Started,
    /// `rate` is `None` when no new sample was due; keep showing the last one
    Progress { percent: u8, rate: Option<f64> },
    /// Upload body accepted; polling the server-side task
    Processing,
    Done,
    Failed(String),
    /// Download written to disk
    Saved(PathBuf),
    SaveFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferEvent {
    pub key: TransferKey,
    pub update: TransferUpdate,
    pub at: Instant,
}

#[derive(Clone)]
struct Reporter {
    key: TransferKey,
    tx: mpsc::UnboundedSender<TransferEvent>,
}

impl Reporter {
    fn send(&self, update: TransferUpdate) {
        let event = TransferEvent {
            key: self.key.clone(),
            update,
            at: Instant::now(),
        };
        // Receiver gone means the app is exiting
        let _ = self.tx.send(event);
    }

    fn fail(&self, error: &ApiError, fallback: &str) {
        tracing::warn!(key = ?self.key, error = %error, "transfer failed");
        self.send(TransferUpdate::Failed(error.toast_message(fallback)));
    }
}

/// Spawns and cancels transfer tasks
pub struct Transfers {
    client: DriveClient,
    download_dir: PathBuf,
    events: mpsc::UnboundedSender<TransferEvent>,
    shutdown: CancellationToken,
    upload_poll: Duration,
    download_poll: Duration,
}

impl Transfers {
    pub fn new(
        client: DriveClient,
        download_dir: PathBuf,
        events: mpsc::UnboundedSender<TransferEvent>,
    ) -> Self {
        Self {
            client,
            download_dir,
            events,
            shutdown: CancellationToken::new(),
            upload_poll: UPLOAD_POLL_INTERVAL,
            download_poll: DOWNLOAD_POLL_INTERVAL,
        }
    }

    /// Override the poll periods (tests use short ones)
    pub fn with_poll_intervals(mut self, upload: Duration, download: Duration) -> Self {
        self.upload_poll = upload;
        self.download_poll = download;
        self
    }

    fn reporter(&self, key: TransferKey) -> Reporter {
        Reporter {
            key,
            tx: self.events.clone(),
        }
    }

    pub fn spawn_upload(&self, client_id: String, file: LocalFile) -> JoinHandle<()> {
        let client = self.client.clone();
        let reporter = self.reporter(TransferKey::Upload(client_id.clone()));
        let cancel = self.shutdown.child_token();
        let poll_every = self.upload_poll;

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(client_id = %client_id, "upload cancelled");
                }
                _ = run_upload(&client, &reporter, &client_id, &file, poll_every) => {}
            }
        })
    }

    pub fn spawn_download(&self, file_id: i64, name: String, size: u64) -> JoinHandle<()> {
        let client = self.client.clone();
        let reporter = self.reporter(TransferKey::Download(file_id));
        let cancel = self.shutdown.child_token();
        let poll_every = self.download_poll;
        let download_dir = self.download_dir.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(file_id, "download cancelled");
                }
                _ = run_download(&client, &reporter, file_id, &name, size, &download_dir, poll_every) => {}
            }
        })
    }

    /// Stop every running transfer
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

async fn run_upload(
    client: &DriveClient,
    reporter: &Reporter,
    client_id: &str,
    file: &LocalFile,
    poll_every: Duration,
) {
    tracing::debug!(client_id, path = %file.path.display(), size = file.size, "upload started");
    reporter.send(TransferUpdate::Started);

    let total = file.size;
    let progress = reporter.clone();
    let mut sampler = RateSampler::new(Instant::now(), SEND_SAMPLE_INTERVAL);
    let mut last_percent: Option<u8> = None;
    let on_progress = move |sent: u64| {
        let percent = percent_of(sent, total);
        let rate = sampler.sample(sent as f64, Instant::now());
        // One event per percent step or rate sample, not per chunk
        if rate.is_some() || last_percent != Some(percent) {
            last_percent = Some(percent);
            progress.send(TransferUpdate::Progress { percent, rate });
        }
    };

    let tasks = match client
        .upload_file(&file.path, file.size, client_id, on_progress)
        .await
    {
        Ok(tasks) => tasks,
        Err(e) => return reporter.fail(&e, "Upload failed"),
    };
    let Some(task) = tasks.into_iter().next() else {
        return reporter.send(TransferUpdate::Failed("Upload failed".to_string()));
    };

    tracing::debug!(client_id, task_id = %task.task_id, "upload accepted, polling");
    reporter.send(TransferUpdate::Processing);

    let task_id = task.task_id.as_str();
    let fetch = move || client.upload_progress(task_id);
    let mut sampler =
        RateSampler::smoothed(Instant::now(), POLL_SAMPLE_INTERVAL, UPLOAD_SMOOTHING);
    let sample_rate = |status: &TaskStatus| {
        (total > 0).then(|| sampler.sample(bytes_at_percent(status.percent, total), Instant::now()))?
    };
    poll_task(reporter, poll_every, "Upload failed", fetch, sample_rate).await;
}

async fn run_download(
    client: &DriveClient,
    reporter: &Reporter,
    file_id: i64,
    name: &str,
    size: u64,
    download_dir: &std::path::Path,
    poll_every: Duration,
) {
    if let Err(e) = client.start_download(file_id).await {
        return reporter.fail(&e, "Download failed");
    }
    reporter.send(TransferUpdate::Started);

    let fetch = move || client.download_status(file_id);
    let mut sampler = RateSampler::new(Instant::now(), POLL_SAMPLE_INTERVAL);
    let sample_rate = |status: &TaskStatus| {
        (size > 0).then(|| sampler.sample(bytes_at_percent(status.percent, size), Instant::now()))?
    };
    let finished = poll_task(reporter, poll_every, "Download failed", fetch, sample_rate).await;

    if finished {
        save_download(client, reporter, file_id, name, download_dir).await;
    }
}

/// Poll a server-side task until it reports `done` or fails
///
/// Returns whether the task finished successfully. The interval is owned by
/// this call and dropped when it returns.
async fn poll_task<F, Fut, R>(
    reporter: &Reporter,
    poll_every: Duration,
    fallback: &str,
    mut fetch: F,
    mut sample_rate: R,
) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<TaskStatus, ApiError>>,
    R: FnMut(&TaskStatus) -> Option<f64>,
{
    let mut ticker = interval(poll_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let status = match fetch().await {
            Ok(status) => status,
            Err(e) => {
                reporter.fail(&e, fallback);
                return false;
            }
        };

        let rate = sample_rate(&status);
        reporter.send(TransferUpdate::Progress {
            percent: status.percent.round() as u8,
            rate,
        });

        if let Some(error) = status.error {
            tracing::warn!(key = ?reporter.key, %error, "server-side task failed");
            reporter.send(TransferUpdate::Failed(error));
            return false;
        }
        if status.done {
            reporter.send(TransferUpdate::Done);
            return true;
        }
    }
}

async fn save_download(
    client: &DriveClient,
    reporter: &Reporter,
    file_id: i64,
    name: &str,
    download_dir: &std::path::Path,
) {
    if let Err(e) = tokio::fs::create_dir_all(download_dir).await {
        tracing::warn!(dir = %download_dir.display(), error = %e, "cannot create download dir");
        return reporter.send(TransferUpdate::SaveFailed(format!(
            "Download failed: {}",
            e
        )));
    }

    let (dest, file) = match create_unique_file(download_dir, name).await {
        Ok(created) => created,
        Err(e) => {
            tracing::warn!(dir = %download_dir.display(), error = %e, "cannot create download file");
            return reporter.send(TransferUpdate::SaveFailed(format!(
                "Download failed: {}",
                e
            )));
        }
    };
    // Declared before `file` so the handle is closed before the removal
    let partial = PartialFile::new(dest.clone());
    let mut file = file;

    match client.save_download(file_id, &mut file).await {
        Ok(bytes) => {
            partial.keep();
            tracing::info!(file_id, bytes, dest = %dest.display(), "download saved");
            reporter.send(TransferUpdate::Saved(dest));
        }
        Err(e) => {
            tracing::warn!(file_id, error = %e, "saving download failed");
            drop(file);
            drop(partial);
            reporter.send(TransferUpdate::SaveFailed(format!("Download failed: {}", e)));
        }
    }
}

/// A download file that is removed unless `keep` is called
///
/// Also covers the task being cancelled mid-stream on quit, where the save
/// future is dropped without returning.
struct PartialFile {
    path: PathBuf,
    keep: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    fn keep(mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed unfinished download"),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot remove unfinished download")
            }
        }
    }
}
