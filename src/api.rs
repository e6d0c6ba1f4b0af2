use std::path::Path;
use std::time::Duration;

use futures_util::{StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{multipart, Body, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::io::ReaderStream;

use crate::{SortDirection, SortField};

/// Everything that can go wrong talking to the backend
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(StatusCode),

    #[error("malformed response: {0}")]
    Malformed(String),

    /// `ok: false` from the backend, with its message when it sent one
    #[error("{}", .0.as_deref().unwrap_or("request rejected by server"))]
    Backend(Option<String>),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Text for an error toast: the backend's own message when there is one,
    /// otherwise the caller's generic fallback ("Upload failed", ...)
    pub fn toast_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Backend(Some(message)) if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub size_human: String,
    #[serde(default)]
    pub uploaded_at: String,
    #[serde(default)]
    pub share_token: Option<String>,
}

impl FileRecord {
    pub fn is_shared(&self) -> bool {
        self.share_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UploadTaskRef {
    pub task_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Progress of a server-side upload or download preparation task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStatus {
    pub percent: f64,
    pub done: bool,
    pub error: Option<String>,
}

/// Helper function to deserialize null as empty vector
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Common `{ok, error?, ...}` wrapper around every JSON response
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Default, Deserialize)]
struct FileListBody {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    files: Vec<FileRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct UploadBody {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    tasks: Vec<UploadTaskRef>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusBody {
    #[serde(default)]
    percent: Option<f64>,
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Default, Deserialize)]
struct StartBody {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ShareBody {
    #[serde(default)]
    link: String,
}

#[derive(Debug, Default, Deserialize)]
struct Empty {}

/// Decode a response body into its envelope, rejecting `ok: false`
///
/// Error responses from the backend still carry a JSON body (404 "File not
/// found" etc.), so the body is parsed before the status is looked at.
pub(crate) fn parse_envelope<T: DeserializeOwned>(
    status: StatusCode,
    text: &str,
) -> Result<Envelope<T>, ApiError> {
    match serde_json::from_str::<Envelope<T>>(text) {
        Ok(envelope) if envelope.ok => Ok(envelope),
        Ok(envelope) => Err(ApiError::Backend(envelope.error)),
        Err(e) if status.is_success() => Err(ApiError::Malformed(e.to_string())),
        Err(_) => Err(ApiError::Status(status)),
    }
}

async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Envelope<T>, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    parse_envelope(status, &text)
}

fn task_status(envelope: Envelope<StatusBody>) -> TaskStatus {
    TaskStatus {
        percent: envelope.body.percent.unwrap_or(0.0).clamp(0.0, 100.0),
        done: envelope.body.done,
        error: envelope.error.filter(|e| !e.is_empty()),
    }
}

#[derive(Clone)]
pub struct DriveClient {
    base_url: String,
    /// Short JSON calls, bounded by the configured timeout
    client: Client,
    /// Upload and download bodies, which may run for minutes
    transfer_client: Client,
}

impl DriveClient {
    pub fn new(base_url: String, session_cookie: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if !session_cookie.is_empty() {
            let value = HeaderValue::from_str(session_cookie)
                .map_err(|_| ApiError::Config("session_cookie is not a valid header value".to_string()))?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .default_headers(headers.clone())
            .timeout(timeout)
            .build()?;
        let transfer_client = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            transfer_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_files(
        &self,
        sort: SortField,
        direction: SortDirection,
        limit: usize,
    ) -> Result<Vec<FileRecord>, ApiError> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(self.url("/api/files"))
            .query(&[
                ("sort", sort.as_param()),
                ("dir", direction.as_param()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let envelope: Envelope<FileListBody> = read_envelope(response).await?;
        Ok(envelope.body.files)
    }

    /// Stream a local file to `/upload` as multipart form data
    ///
    /// `on_progress` is called with the running total of bytes handed to the
    /// connection, once per chunk read from disk.
    pub async fn upload_file<F>(
        &self,
        path: &Path,
        size: u64,
        client_id: &str,
        mut on_progress: F,
    ) -> Result<Vec<UploadTaskRef>, ApiError>
    where
        F: FnMut(u64) + Send + Sync + 'static,
    {
        let file = tokio::fs::File::open(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());

        let mut sent: u64 = 0;
        let stream = ReaderStream::new(file).inspect_ok(move |chunk| {
            sent += chunk.len() as u64;
            on_progress(sent);
        });

        let part = multipart::Part::stream_with_length(Body::wrap_stream(stream), size)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new()
            .part("files", part)
            .text("client_id", client_id.to_string());

        let response = self
            .transfer_client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;

        let envelope: Envelope<UploadBody> = read_envelope(response).await?;
        if envelope.body.tasks.is_empty() {
            return Err(ApiError::Malformed("no upload task returned".to_string()));
        }
        Ok(envelope.body.tasks)
    }

    pub async fn upload_progress(&self, task_id: &str) -> Result<TaskStatus, ApiError> {
        let url = self.url(&format!("/api/progress/{}", urlencoding::encode(task_id)));
        let response = self.client.get(url).send().await?;
        let envelope: Envelope<StatusBody> = read_envelope(response).await?;
        Ok(task_status(envelope))
    }

    /// Ask the server to prepare a file. `started`, `in_progress` and
    /// `cached` answers are all followed by status polling.
    pub async fn start_download(&self, file_id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/download/{}/start", file_id));
        let response = self.client.post(url).send().await?;
        let envelope: Envelope<StartBody> = read_envelope(response).await?;

        tracing::debug!(
            file_id,
            status = envelope.body.status.as_deref().unwrap_or("started"),
            "download preparation started"
        );
        Ok(())
    }

    pub async fn download_status(&self, file_id: i64) -> Result<TaskStatus, ApiError> {
        let url = self.url(&format!("/api/download/{}/status", file_id));
        let response = self.client.get(url).send().await?;
        let envelope: Envelope<StatusBody> = read_envelope(response).await?;
        Ok(task_status(envelope))
    }

    /// Fetch the prepared file into `out`, returning bytes written
    pub async fn save_download<W>(&self, file_id: i64, out: &mut W) -> Result<u64, ApiError>
    where
        W: AsyncWrite + Unpin,
    {
        let url = self.url(&format!("/download/{}", file_id));
        let response = self.transfer_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let mut written: u64 = 0;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            out.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        out.flush().await?;

        Ok(written)
    }

    pub async fn delete_file(&self, file_id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/delete/{}", file_id));
        let response = self.client.post(url).send().await?;
        read_envelope::<Empty>(response).await?;
        Ok(())
    }

    /// Create (or fetch) the public share link for a file
    pub async fn share(&self, file_id: i64) -> Result<String, ApiError> {
        let url = self.url(&format!("/api/share/{}", file_id));
        let response = self.client.post(url).send().await?;
        let envelope: Envelope<ShareBody> = read_envelope(response).await?;
        if envelope.body.link.is_empty() {
            return Err(ApiError::Malformed("missing share link".to_string()));
        }
        Ok(envelope.body.link)
    }

    pub async fn revoke_share(&self, file_id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/share/{}/revoke", file_id));
        let response = self.client.post(url).send().await?;
        read_envelope::<Empty>(response).await?;
        Ok(())
    }

    /// End the server session. The endpoint answers with a redirect to the
    /// login page, so any non-error status counts as success.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self.client.get(self.url("/logout")).send().await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ApiError::Status(status));
        }
        Ok(())
    }
}
