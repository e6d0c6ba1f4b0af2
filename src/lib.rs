//! tgdrive library
//!
//! Everything except terminal drawing and key mapping lives here so it can be
//! exercised from tests without a terminal.

pub mod api;
pub mod clipboard;
pub mod config;
pub mod handlers;
pub mod logging;
pub mod logic;
pub mod messages;
pub mod model;
pub mod services;
pub mod utils;

/// Server-side sort field for the file listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    Size,
    Name,
}

impl SortField {
    /// Value sent in the `sort` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Size => "size",
            SortField::Name => "name",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Date => "Date",
            SortField::Size => "Size",
            SortField::Name => "Alphabetic",
        }
    }
}

/// Sort direction for the file listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}
