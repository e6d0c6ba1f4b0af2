//! Search Logic
//!
//! Client-side filtering of the cached file list. The query is matched as a
//! plain case-insensitive substring of the file name; no wildcards.

use crate::api::FileRecord;

/// Lower-case and trim a raw query as typed by the user
///
/// # Examples
/// ```
/// use tgdrive::logic::search::normalize_query;
///
/// assert_eq!(normalize_query("  Report "), "report");
/// assert_eq!(normalize_query("   "), "");
/// ```
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether a file name matches an already-normalised query
pub fn name_matches(name: &str, normalized_query: &str) -> bool {
    normalized_query.is_empty() || name.to_lowercase().contains(normalized_query)
}

/// Records visible for a normalised query, in cache order
pub fn filter_records<'a>(records: &'a [FileRecord], normalized_query: &str) -> Vec<&'a FileRecord> {
    records
        .iter()
        .filter(|record| name_matches(&record.name, normalized_query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str) -> FileRecord {
        FileRecord {
            id,
            name: name.to_string(),
            size_bytes: 10,
            size_human: "10 B".to_string(),
            uploaded_at: "2024-05-01 12:00:00".to_string(),
            share_token: None,
        }
    }

    #[test]
    fn test_empty_query_matches_all() {
        let records = vec![record(1, "a.txt"), record(2, "b.txt")];
        assert_eq!(filter_records(&records, "").len(), 2);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let records = vec![
            record(1, "Holiday-Photos.zip"),
            record(2, "notes.md"),
            record(3, "photo.png"),
        ];
        let visible = filter_records(&records, &normalize_query("PHOTO"));
        let ids: Vec<i64> = visible.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_wildcards_are_literal() {
        let records = vec![record(1, "a.txt"), record(2, "*.txt")];
        let visible = filter_records(&records, "*.txt");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
    }

    #[test]
    fn test_no_match() {
        let records = vec![record(1, "a.txt")];
        assert!(filter_records(&records, "zzz").is_empty());
    }

    #[test]
    fn test_preserves_server_order() {
        let records = vec![record(9, "x-1"), record(3, "x-2"), record(5, "x-3")];
        let ids: Vec<i64> = filter_records(&records, "x").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![9, 3, 5]);
    }
}
