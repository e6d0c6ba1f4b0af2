//! File List Model
//!
//! The cached listing plus the sort/search state that shapes it. The cache is
//! only ever replaced wholesale by a fresh fetch.

use crate::api::FileRecord;
use crate::logic::search;
use crate::{SortDirection, SortField};

#[derive(Clone, Debug)]
pub struct FilesModel {
    /// Records in server order, as returned by the last fetch
    pub records: Vec<FileRecord>,

    /// Sort requested from the server
    pub sort: SortField,
    pub direction: SortDirection,

    /// Raw search text as typed
    pub query: String,

    /// Whether at least one fetch has completed
    pub loaded: bool,
}

impl FilesModel {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            sort: SortField::Date,
            direction: SortDirection::Desc,
            query: String::new(),
            loaded: false,
        }
    }

    pub fn replace(&mut self, records: Vec<FileRecord>) {
        self.records = records;
        self.loaded = true;
    }

    pub fn normalized_query(&self) -> String {
        search::normalize_query(&self.query)
    }

    /// Records passing the current search filter
    pub fn visible(&self) -> Vec<&FileRecord> {
        search::filter_records(&self.records, &self.normalized_query())
    }
}

impl Default for FilesModel {
    fn default() -> Self {
        Self::new()
    }
}
