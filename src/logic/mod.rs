//! Business Logic
//!
//! Pure functions that can be unit tested without a terminal or a server:
//! - errors: Classification of failed requests
//! - file_list: Row description for the file list
//! - formatting: Human-readable sizes and rates
//! - navigation: Selection movement and restoration
//! - paths: Parsing of dropped/typed paths
//! - rate: Throttled transfer-rate sampling
//! - search: Name filtering
//! - ui: Toast timing and sort presets

pub mod errors;
pub mod file_list;
pub mod formatting;
pub mod navigation;
pub mod paths;
pub mod rate;
pub mod search;
pub mod ui;
