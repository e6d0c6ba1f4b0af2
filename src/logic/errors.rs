use std::error::Error as StdError;

use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    ConnectionRefused,
    Timeout,
    Unauthorized, // HTTP 401/403, usually an expired session cookie
    NotFound,     // HTTP 404
    ServerError,  // HTTP 500+
    NetworkError, // DNS, routing, etc.
    Rejected,     // ok: false
    Other,
}

/// A failed request, reduced to what the UI needs
///
/// `ApiError` wraps non-cloneable sources, so the workers convert to this
/// before posting results back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub kind: ErrorType,
    /// Message sent by the backend in its `error` field
    pub backend_message: Option<String>,
    /// Raw description for logs and the status bar
    pub detail: String,
}

impl RequestFailure {
    pub fn from_error(error: &ApiError) -> Self {
        let backend_message = match error {
            ApiError::Backend(Some(message)) if !message.is_empty() => Some(message.clone()),
            _ => None,
        };
        Self {
            kind: classify_error(error),
            backend_message,
            detail: format_error_message(error),
        }
    }

    /// Backend's message when present, otherwise `fallback`
    pub fn toast_message(&self, fallback: &str) -> String {
        self.backend_message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<ApiError> for RequestFailure {
    fn from(error: ApiError) -> Self {
        Self::from_error(&error)
    }
}

fn classify_status(status: u16) -> ErrorType {
    match status {
        401 | 403 => ErrorType::Unauthorized,
        404 => ErrorType::NotFound,
        500..=599 => ErrorType::ServerError,
        _ => ErrorType::Other,
    }
}

/// Classify an error based on its variant and source chain
pub fn classify_error(error: &ApiError) -> ErrorType {
    match error {
        ApiError::Status(status) => classify_status(status.as_u16()),
        ApiError::Backend(_) => ErrorType::Rejected,
        ApiError::Network(e) => {
            if e.is_timeout() {
                return ErrorType::Timeout;
            }
            if let Some(status) = e.status() {
                return classify_status(status.as_u16());
            }
            classify_message(&format_error_message(error))
        }
        ApiError::Io(_) | ApiError::Malformed(_) | ApiError::Config(_) => ErrorType::Other,
    }
}

fn classify_message(message: &str) -> ErrorType {
    let message = message.to_lowercase();

    if message.contains("connection refused") {
        return ErrorType::ConnectionRefused;
    }
    if message.contains("timeout") || message.contains("timed out") {
        return ErrorType::Timeout;
    }
    if message.contains("dns") || message.contains("network") || message.contains("connect") {
        return ErrorType::NetworkError;
    }

    ErrorType::Other
}

/// Raw error details, down to the root cause
pub fn format_error_message(error: &ApiError) -> String {
    let mut deepest = error.to_string();
    let mut source = error.source();

    while let Some(err) = source {
        deepest = err.to_string();
        source = err.source();
    }

    deepest
}

/// Short hint for the status bar
pub fn describe(kind: ErrorType) -> &'static str {
    match kind {
        ErrorType::ConnectionRefused => "Connection refused",
        ErrorType::Timeout => "Timed out",
        ErrorType::Unauthorized => "Session rejected, check session_cookie",
        ErrorType::NotFound => "Not found",
        ErrorType::ServerError => "Server error",
        ErrorType::NetworkError => "Network error",
        ErrorType::Rejected => "Request rejected",
        ErrorType::Other => "Error",
    }
}
