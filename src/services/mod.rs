//! External Services
//!
//! Background tasks that talk to the backend:
//! - api: Queued list/delete/share/revoke/logout requests
//! - transfers: Upload and download orchestrators

pub mod api;
pub mod transfers;

// Re-export commonly used types for convenience
pub use api::{ApiRequest, ApiResponse, Priority};
pub use transfers::{TransferEvent, TransferKey, TransferUpdate, Transfers};
