//! Human-readable file sizes.

/// Units in ascending order of magnitude.
pub const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Index into [`SIZE_UNITS`] for a byte count.
///
/// Derived from the bit length: `(bit_length - 1) / 10`, floored and clamped
/// to `0..=4`. This differs from `log1024` just below each power of 1024,
/// e.g. `1048575` selects `KB` and renders as `1024.00KB`.
pub fn unit_index(bytes: u64) -> usize {
    let bit_length = u64::BITS - bytes.leading_zeros();
    let index = bit_length.saturating_sub(1) / 10;
    (index as usize).min(SIZE_UNITS.len() - 1)
}

/// Format a byte count with two decimals and a unit suffix, e.g. `1.50KB`.
pub fn format_size(bytes: u64) -> String {
    let index = unit_index(bytes);
    let value = bytes as f64 / 1024f64.powi(index as i32);
    format!("{:.2}{}", value, SIZE_UNITS[index])
}
