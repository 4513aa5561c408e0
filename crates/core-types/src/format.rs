// In crates/core-types/src/format.rs

//! Small text helpers shared by the report renderers.

pub const REPORT_WIDTH: usize = 80;

/// A horizontal rule made of `ch`.
pub fn rule(ch: char) -> String {
    std::iter::repeat_n(ch, REPORT_WIDTH).collect()
}

/// A framed report title:
///
/// ```text
/// ====...
/// TITLE
/// ====...
/// ```
pub fn banner(title: &str) -> String {
    format!("{}\n{}\n{}", rule('='), title, rule('='))
}

/// Formats a currency amount with two decimals and thousands separators.
pub fn money(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // "-0.00" reads badly, so only sign values that survive rounding.
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Formats a percentage value (already scaled to 0-100) with two decimals.
pub fn pct(value: f64) -> String {
    format!("{value:.2}%")
}

/// Formats a ratio, spelling out infinity.
pub fn ratio(value: f64) -> String {
    if value.is_infinite() && value > 0.0 {
        "inf".to_string()
    } else {
        format!("{value:.2}")
    }
}
