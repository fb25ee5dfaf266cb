//! Human-friendly number formatting.

/// Formats a click count for display.
///
/// Counts below 1000 are printed as-is; larger ones use one decimal and a
/// `K`, `M` or `B` suffix.
///
/// # Examples
///
/// ```
/// use shortcode::utils::format::format_click_count;
///
/// assert_eq!(format_click_count(999), "999");
/// assert_eq!(format_click_count(1_234), "1.2K");
/// assert_eq!(format_click_count(3_400_000), "3.4M");
/// ```
pub fn format_click_count(count: i64) -> String {
    let value = count as f64;
    match count {
        c if c < 1_000 => c.to_string(),
        c if c < 1_000_000 => format!("{:.1}K", value / 1_000.0),
        c if c < 1_000_000_000 => format!("{:.1}M", value / 1_000_000.0),
        _ => format!("{:.1}B", value / 1_000_000_000.0),
    }
}
