//! Selection logic for the file list
//!
//! Pure functions for moving and restoring the selected row. The list can be
//! replaced or re-filtered under the cursor at any time, so every change goes
//! through one of these.

use crate::api::FileRecord;

/// Next row, wrapping to the top
///
/// # Examples
/// ```
/// use tgdrive::logic::navigation::next_selection;
///
/// assert_eq!(next_selection(None, 0), None);
/// assert_eq!(next_selection(None, 3), Some(0));
/// assert_eq!(next_selection(Some(1), 3), Some(2));
/// assert_eq!(next_selection(Some(2), 3), Some(0));
/// ```
pub fn next_selection(current: Option<usize>, list_len: usize) -> Option<usize> {
    if list_len == 0 {
        return None;
    }

    Some(match current {
        Some(i) if i + 1 >= list_len => 0,
        Some(i) => i + 1,
        None => 0,
    })
}

/// Previous row, wrapping to the bottom
///
/// # Examples
/// ```
/// use tgdrive::logic::navigation::prev_selection;
///
/// assert_eq!(prev_selection(None, 0), None);
/// assert_eq!(prev_selection(Some(1), 3), Some(0));
/// assert_eq!(prev_selection(Some(0), 3), Some(2));
/// assert_eq!(prev_selection(None, 3), Some(2));
/// ```
pub fn prev_selection(current: Option<usize>, list_len: usize) -> Option<usize> {
    if list_len == 0 {
        return None;
    }

    Some(match current {
        Some(0) | None => list_len - 1,
        Some(i) if i >= list_len => list_len - 1,
        Some(i) => i - 1,
    })
}

/// Keep the selection on the same file after the visible rows change
///
/// Falls back to the old index clamped into range, then to the first row.
pub fn restore_selection(
    visible: &[&FileRecord],
    previous_id: Option<i64>,
    previous_index: Option<usize>,
) -> Option<usize> {
    if visible.is_empty() {
        return None;
    }

    if let Some(id) = previous_id {
        if let Some(idx) = visible.iter().position(|r| r.id == id) {
            return Some(idx);
        }
    }

    Some(previous_index.unwrap_or(0).min(visible.len() - 1))
}
