//! Helpers for reading settings from environment variables

/// Interpret a flag value the way shell users expect
///
/// `true`, `1`, `yes` and `on` (any case) are true; everything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Look up a variable in the process environment
///
/// Usable anywhere an `Fn(&str) -> Option<String>` lookup is expected.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
