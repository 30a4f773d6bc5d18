// ============================================================
// VALUE CLEANER
// ============================================================
// Turn raw cells into typed values; anything unusable becomes null

use crate::domain::product::{CleanedValue, ValueKind};
use crate::shared::text::collapse_whitespace;

/// Clean one raw cell for the given kind. Never fails: bad input yields `None`.
pub fn clean_value(raw: Option<&str>, kind: ValueKind) -> Option<CleanedValue> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || is_not_available(trimmed) {
        return None;
    }

    let value = strip_enclosing_quotes(trimmed);

    match kind {
        ValueKind::Number => clean_number(value).map(CleanedValue::Number),
        ValueKind::Identifier => clean_identifier(value).map(CleanedValue::Text),
        ValueKind::Text => clean_text(value).map(CleanedValue::Text),
    }
}

fn is_not_available(value: &str) -> bool {
    value.eq_ignore_ascii_case("n/a") || value.eq_ignore_ascii_case("na")
}

/// Remove one layer of matching straight quotes
fn strip_enclosing_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Keep digits, '.' and '-', then parse
fn clean_number(value: &str) -> Option<f64> {
    let digits: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if digits.is_empty() || digits == "-" {
        return None;
    }

    digits.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Uppercase A-Z / 0-9 only
fn clean_identifier(value: &str) -> Option<String> {
    let id: String = value
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect();

    (!id.is_empty()).then_some(id)
}

fn clean_text(value: &str) -> Option<String> {
    let text = collapse_whitespace(value).trim().to_string();
    (!text.is_empty()).then_some(text)
}
