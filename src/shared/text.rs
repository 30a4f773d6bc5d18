use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Replace every run of whitespace with a single space. Ends are left alone.
pub fn collapse_whitespace(input: &str) -> String {
    WHITESPACE_RUN_PATTERN.replace_all(input, " ").to_string()
}
