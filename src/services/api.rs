use std::collections::{HashSet, VecDeque};

use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

use crate::api::{DriveClient, FileRecord};
use crate::logic::errors::RequestFailure;
use crate::{SortDirection, SortField};

/// Priority level for API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,   // User-initiated writes (delete, share, revoke, logout)
    Medium, // List refreshes
}

/// Identifies requests that must not run twice at once
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum RequestKey {
    List,
    File(i64),
    Logout,
}

/// API request types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    ListFiles {
        sort: SortField,
        direction: SortDirection,
    },
    DeleteFile { file_id: i64 },
    Share { file_id: i64 },
    RevokeShare { file_id: i64 },
    Logout,
}

impl ApiRequest {
    fn priority(&self) -> Priority {
        match self {
            ApiRequest::ListFiles { .. } => Priority::Medium,
            _ => Priority::High,
        }
    }

    fn key(&self) -> RequestKey {
        match self {
            ApiRequest::ListFiles { .. } => RequestKey::List,
            ApiRequest::DeleteFile { file_id }
            | ApiRequest::Share { file_id }
            | ApiRequest::RevokeShare { file_id } => RequestKey::File(*file_id),
            ApiRequest::Logout => RequestKey::Logout,
        }
    }
}

/// API response types
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    FilesLoaded {
        sort: SortField,
        direction: SortDirection,
        files: Result<Vec<FileRecord>, RequestFailure>,
    },

    Deleted {
        file_id: i64,
        result: Result<(), RequestFailure>,
    },

    Shared {
        file_id: i64,
        link: Result<String, RequestFailure>,
    },

    Revoked {
        file_id: i64,
        result: Result<(), RequestFailure>,
    },

    LoggedOut {
        result: Result<(), RequestFailure>,
    },
}

pub(crate) enum InternalMessage {
    Completed(RequestKey),
}

/// API service worker that processes requests in the background
pub struct ApiService {
    client: DriveClient,
    list_limit: usize,
    request_queue: VecDeque<(ApiRequest, Priority)>,
    in_flight: HashSet<RequestKey>,
    response_tx: mpsc::UnboundedSender<ApiResponse>,
    completion_tx: mpsc::UnboundedSender<InternalMessage>,
}

impl ApiService {
    pub(crate) fn new(
        client: DriveClient,
        list_limit: usize,
        response_tx: mpsc::UnboundedSender<ApiResponse>,
        completion_tx: mpsc::UnboundedSender<InternalMessage>,
    ) -> Self {
        Self {
            client,
            list_limit,
            request_queue: VecDeque::new(),
            in_flight: HashSet::new(),
            response_tx,
            completion_tx,
        }
    }

    /// Add a request to the queue
    ///
    /// A queued list refresh is replaced by a newer one; only the latest sort
    /// matters.
    fn enqueue(&mut self, request: ApiRequest) {
        if matches!(request, ApiRequest::ListFiles { .. }) {
            self.request_queue
                .retain(|(queued, _)| !matches!(queued, ApiRequest::ListFiles { .. }));
        }

        let priority = request.priority();
        let insert_pos = self
            .request_queue
            .iter()
            .position(|(_, p)| *p > priority)
            .unwrap_or(self.request_queue.len());

        self.request_queue.insert(insert_pos, (request, priority));
    }

    /// Start the first queued request whose key is not already in flight
    fn process_next(&mut self) {
        let Some(pos) = self
            .request_queue
            .iter()
            .position(|(request, _)| !self.in_flight.contains(&request.key()))
        else {
            return;
        };
        let Some((request, _)) = self.request_queue.remove(pos) else {
            return;
        };

        let key = request.key();
        self.in_flight.insert(key.clone());

        let client = self.client.clone();
        let list_limit = self.list_limit;
        let response_tx = self.response_tx.clone();
        let completion_tx = self.completion_tx.clone();

        // No per-request retries
        tokio::spawn(async move {
            let response = Self::execute_request(&client, list_limit, request).await;
            let _ = response_tx.send(response);
            let _ = completion_tx.send(InternalMessage::Completed(key));
        });
    }

    async fn execute_request(
        client: &DriveClient,
        list_limit: usize,
        request: ApiRequest,
    ) -> ApiResponse {
        tracing::debug!(?request, "executing api request");

        match request {
            ApiRequest::ListFiles { sort, direction } => {
                let files = client
                    .list_files(sort, direction, list_limit)
                    .await
                    .map_err(|e| {
                        tracing::warn!(error = %e, "listing files failed");
                        RequestFailure::from(e)
                    });
                ApiResponse::FilesLoaded {
                    sort,
                    direction,
                    files,
                }
            }

            ApiRequest::DeleteFile { file_id } => {
                let result = client.delete_file(file_id).await.map_err(|e| {
                    tracing::warn!(file_id, error = %e, "delete failed");
                    RequestFailure::from(e)
                });
                ApiResponse::Deleted { file_id, result }
            }

            ApiRequest::Share { file_id } => {
                let link = client.share(file_id).await.map_err(|e| {
                    tracing::warn!(file_id, error = %e, "share failed");
                    RequestFailure::from(e)
                });
                ApiResponse::Shared { file_id, link }
            }

            ApiRequest::RevokeShare { file_id } => {
                let result = client.revoke_share(file_id).await.map_err(|e| {
                    tracing::warn!(file_id, error = %e, "revoke failed");
                    RequestFailure::from(e)
                });
                ApiResponse::Revoked { file_id, result }
            }

            ApiRequest::Logout => {
                let result = client.logout().await.map_err(RequestFailure::from);
                ApiResponse::LoggedOut { result }
            }
        }
    }
}

/// Spawn the API service worker
pub fn spawn_api_service(
    client: DriveClient,
    list_limit: usize,
) -> (
    mpsc::UnboundedSender<ApiRequest>,
    mpsc::UnboundedReceiver<ApiResponse>,
) {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ApiRequest>();
    let (response_tx, response_rx) = mpsc::unbounded_channel::<ApiResponse>();
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<InternalMessage>();

    tokio::spawn(async move {
        let mut service = ApiService::new(client, list_limit, response_tx, completion_tx);

        // Ticker for processing queue
        let mut tick = interval(Duration::from_millis(10));

        loop {
            tokio::select! {
                request = request_rx.recv() => {
                    match request {
                        Some(request) => service.enqueue(request),
                        // Every sender is gone: the app is shutting down
                        None => break,
                    }
                }

                Some(InternalMessage::Completed(key)) = completion_rx.recv() => {
                    service.in_flight.remove(&key);
                }

                _ = tick.tick() => {
                    for _ in 0..5 {
                        if service.request_queue.is_empty() {
                            break;
                        }
                        service.process_next();
                    }
                }
            }
        }
    });

    (request_tx, response_rx)
}
