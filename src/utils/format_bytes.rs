/// Formats a byte count for humans.
///
/// Uses binary multiples (1 KB = 1,024 bytes) with two decimals, and raw
/// bytes below 1 KB.
///
/// # Examples
/// ```
/// use r_pickle::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 bytes");
/// assert_eq!(format_bytes(2048), "2.00 KB");
/// assert_eq!(format_bytes(5_242_880), "5.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [(&str, u64); 3] = [("GB", 1 << 30), ("MB", 1 << 20), ("KB", 1 << 10)];

    UNITS
        .iter()
        .find(|(_, scale)| bytes >= *scale)
        .map(|(unit, scale)| format!("{:.2} {}", bytes as f64 / *scale as f64, unit))
        .unwrap_or_else(|| format!("{} bytes", bytes))
}
