//! UI state transition logic
//!
//! Pure functions for toast timing and sort preset cycling.

use crate::{SortDirection, SortField};

/// Toasts stay up for this long
pub const TOAST_DURATION_MS: u128 = 3200;

/// Whether a toast shown `elapsed_ms` ago should be taken down
///
/// # Examples
/// ```
/// use tgdrive::logic::ui::should_dismiss_toast;
///
/// assert!(!should_dismiss_toast(0));
/// assert!(!should_dismiss_toast(3199));
/// assert!(should_dismiss_toast(3200));
/// ```
pub fn should_dismiss_toast(elapsed_ms: u128) -> bool {
    elapsed_ms >= TOAST_DURATION_MS
}

/// The sort bar presets: Date (newest first), Size (smallest first),
/// Alphabetic (A-Z)
pub const SORT_PRESETS: [(SortField, SortDirection); 3] = [
    (SortField::Date, SortDirection::Desc),
    (SortField::Size, SortDirection::Asc),
    (SortField::Name, SortDirection::Asc),
];

/// Preset for a 1-based slot number, as bound to the number keys
pub fn sort_preset(slot: usize) -> Option<(SortField, SortDirection)> {
    slot.checked_sub(1).and_then(|idx| SORT_PRESETS.get(idx).copied())
}

/// Next preset after the one whose field is `current`
///
/// # Examples
/// ```
/// use tgdrive::{SortDirection, SortField};
/// use tgdrive::logic::ui::cycle_sort_preset;
///
/// assert_eq!(cycle_sort_preset(SortField::Date), (SortField::Size, SortDirection::Asc));
/// assert_eq!(cycle_sort_preset(SortField::Name), (SortField::Date, SortDirection::Desc));
/// ```
pub fn cycle_sort_preset(current: SortField) -> (SortField, SortDirection) {
    let idx = SORT_PRESETS
        .iter()
        .position(|(field, _)| *field == current)
        .unwrap_or(0);
    SORT_PRESETS[(idx + 1) % SORT_PRESETS.len()]
}
