/// Parses a size such as `4096`, `64k`, `16mb` or `1g` into bytes.
///
/// Units are binary multiples and case-insensitive.
///
/// # Errors
/// Returns a readable message for unknown units, non-numeric input, or a
/// product that does not fit in a `usize`.
pub fn parse_buffer_size(size_str: &str) -> Result<usize, String> {
    let size_str = size_str.trim().to_lowercase();

    // Find the position where the numeric part ends
    let num_end = size_str
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(size_str.len());

    let (num_part, unit_part) = size_str.split_at(num_end);

    let multiplier: usize = match unit_part.trim() {
        "" | "b" => 1,
        "k" | "kb" => 1024,
        "m" | "mb" => 1024 * 1024,
        "g" | "gb" => 1024 * 1024 * 1024,
        _ => return Err(format!("Invalid buffer size unit: {}", unit_part)),
    };

    let count = num_part
        .parse::<usize>()
        .map_err(|_| format!("Failed to parse buffer size: {}", size_str))?;

    count
        .checked_mul(multiplier)
        .ok_or_else(|| format!("Buffer size too large: {}", size_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units() {
        assert_eq!(parse_buffer_size("4096"), Ok(4096));
        assert_eq!(parse_buffer_size("64k"), Ok(64 * 1024));
        assert_eq!(parse_buffer_size("16MB"), Ok(16 * 1024 * 1024));
        assert_eq!(parse_buffer_size(" 2 kb "), Ok(2048));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_buffer_size("12q").is_err());
        assert!(parse_buffer_size("mb").is_err());
        assert!(parse_buffer_size(&format!("{}g", usize::MAX)).is_err());
    }
}
