//! Formatting and display logic
//!
//! Pure functions for formatting data for human-readable display.

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const RATE_UNITS: [&str; 4] = ["B/s", "KB/s", "MB/s", "GB/s"];

/// Divide by 1024 until the value drops below one unit step or the largest
/// unit is reached. Returns the scaled value and the unit index.
fn scale(value: f64, unit_count: usize) -> (f64, usize) {
    let mut value = value;
    let mut unit = 0;
    while value >= 1024.0 && unit < unit_count - 1 {
        value /= 1024.0;
        unit += 1;
    }
    (value, unit)
}

/// Format a byte count for display
///
/// Whole bytes are printed without decimals, every larger unit with one.
///
/// # Examples
/// ```
/// use tgdrive::logic::formatting::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 B");
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(2048), "2.0 KB");
/// assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    let (value, unit) = scale(bytes as f64, BYTE_UNITS.len());
    if unit == 0 {
        format!("{} {}", bytes, BYTE_UNITS[0])
    } else {
        format!("{:.1} {}", value, BYTE_UNITS[unit])
    }
}

/// Format a transfer rate in bytes per second
///
/// Zero, negative and non-finite rates all read "0 KB/s" so an idle transfer
/// never flickers between units.
///
/// # Examples
/// ```
/// use tgdrive::logic::formatting::format_rate;
///
/// assert_eq!(format_rate(0.0), "0 KB/s");
/// assert_eq!(format_rate(-3.0), "0 KB/s");
/// assert_eq!(format_rate(512.0), "512.0 B/s");
/// assert_eq!(format_rate(1536.0), "1.5 KB/s");
/// ```
pub fn format_rate(bytes_per_second: f64) -> String {
    if !bytes_per_second.is_finite() || bytes_per_second <= 0.0 {
        return "0 KB/s".to_string();
    }
    let (value, unit) = scale(bytes_per_second, RATE_UNITS.len());
    format!("{:.1} {}", value, RATE_UNITS[unit])
}

/// Bar fill for a byte-level upload, rounded and capped at 100
pub fn percent_of(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (sent as f64 / total as f64 * 100.0).round();
    percent.min(100.0) as u8
}
