//! Human-readable formatting helpers for presentation layers.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const STEP: u64 = 1024;

/// Formats a byte count with binary (1024) steps and up to two decimals.
///
/// Trailing zeros are trimmed: `1536 -> "1.5 KB"`, `1048576 -> "1 MB"`.
/// Values beyond the TB range stay in TB.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit + 1 < UNITS.len() && bytes / divisor >= STEP {
        divisor *= STEP;
        unit += 1;
    }

    let scaled = bytes as f64 / divisor as f64;
    let fixed = format!("{scaled:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}
