//! Number formatting used by report templates and tables
//!
//! Every formatter takes an `Option<f64>` and renders `N/A` for `None` or a
//! non-finite value.

/// Placeholder for a missing value
pub const NOT_AVAILABLE: &str = "N/A";

/// Dollar amount scaled to trillions, billions or millions
///
/// ```
/// use geyser_template::format::currency;
/// assert_eq!(currency(Some(3.2e12)), "$3.20T");
/// assert_eq!(currency(Some(45_678.0)), "$45,678");
/// ```
pub fn currency(value: Option<f64>) -> String {
    let Some(v) = finite(value) else {
        return NOT_AVAILABLE.to_string();
    };
    let magnitude = v.abs();
    if magnitude >= 1e12 {
        format!("${:.2}T", v / 1e12)
    } else if magnitude >= 1e9 {
        format!("${:.2}B", v / 1e9)
    } else if magnitude >= 1e6 {
        format!("${:.2}M", v / 1e6)
    } else {
        format!("${}", group_thousands(&format!("{v:.0}")))
    }
}

/// Fraction rendered as a percentage with one decimal (`0.153` -> `15.3%`)
pub fn percent(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Multiple with two decimals and an `x` suffix
pub fn ratio(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{v:.2}x"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Plain number with thousands separators and two decimals
pub fn number(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => group_thousands(&format!("{v:.2}")),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Dollar amount in billions with one decimal, as used in comparison tables
pub fn billions(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("${:.1}B", v / 1e9),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Decimal with a fixed number of places
pub fn fixed(value: Option<f64>, places: usize) -> String {
    match finite(value) {
        Some(v) => format!("{v:.places$}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Integer count with thousands separators
pub fn count(value: Option<u64>) -> String {
    match value {
        Some(v) => group_thousands(&v.to_string()),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Insert commas into the integer part of an already formatted number
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
