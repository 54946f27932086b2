/// Digit grouping separator used for vote counts.
pub const THOUSANDS_SEPARATOR: char = '.';

/// Shown in place of a share that is missing from the source document.
pub const MISSING_SHARE: &str = "n/a";

/// Formats an integer with a separator every three digits, e.g. `1.234.567`.
pub fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(digit);
    }
    out
}

/// Formats a percentage value with two decimals and a `%` suffix.
///
/// Values are not clamped: `-1.5` renders as `-1.50%` and `120` as `120.00%`.
pub fn format_percent(x: f64) -> String {
    format!("{x:.2}%")
}

pub fn format_share(share: Option<f64>) -> String {
    share.map_or_else(|| MISSING_SHARE.to_string(), format_percent)
}
