//! Canonical text for numeric results.

/// Format a number for display.
pub fn format_number(n: f64) -> String {
    trim_decimal(&n.to_string())
}

/// Strip a trailing decimal point together with the zeros after it
/// (`3.0` -> `3`, `-8.50` -> `-8.5`). Text without a `.` is returned as is.
fn trim_decimal(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    let trimmed = text.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}
