//! Cell normalization service
//!
//! Turns the loosely formatted text cells of the quote backend into numbers
//! and compares server names across sources. Nothing here fails: text that
//! does not look like a number becomes 0.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Leading decimal literal, the way a lenient float parser reads it
static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid regex")
});

/// First run of digits anywhere in the text
static FIRST_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Render a JSON cell as text. Missing and null cells are empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Parse the longest leading decimal literal (after leading whitespace).
/// Returns None when the text does not start with a number.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let literal = LEADING_FLOAT.find(trimmed)?.as_str();
    literal.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a gold price cell.
///
/// The first comma is read as a decimal separator. Malformed, non-finite
/// and negative values all become 0.
///
/// # Examples
/// ```
/// use undermine::services::normalizer::parse_gold;
///
/// assert_eq!(parse_gold("12,5"), 12.5);
/// assert_eq!(parse_gold("301.25g"), 301.25);
/// assert_eq!(parse_gold("n/a"), 0.0);
/// ```
pub fn parse_gold(text: &str) -> f64 {
    let normalized = text.replacen(',', ".", 1);
    match parse_leading_float(&normalized) {
        Some(v) if v > 0.0 => v,
        _ => 0.0,
    }
}

/// Parse a quantity cell: the first run of digits, or 0.
pub fn parse_qty(text: &str) -> u64 {
    FIRST_DIGITS
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Case-insensitive substring match in either direction.
/// Empty names never match.
pub fn names_match(candidate: &str, server: &str) -> bool {
    let candidate = candidate.trim().to_lowercase();
    let server = server.trim().to_lowercase();
    if candidate.is_empty() || server.is_empty() {
        return false;
    }
    candidate.contains(&server) || server.contains(&candidate)
}

/// Population display text: "260k+" for thousands, raw number below, "N/A" when unknown
pub fn format_population_text(population: Option<u32>) -> String {
    match population {
        None => "N/A".to_string(),
        Some(n) if n >= 1000 => format!("{}k+", n / 1000),
        Some(n) => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ========== cell_text ==========

    #[test]
    fn test_cell_text_variants() {
        assert_eq!(cell_text(&json!("Draenor")), "Draenor");
        assert_eq!(cell_text(&json!(12.5)), "12.5");
        assert_eq!(cell_text(&json!(7)), "7");
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!({"a": 1})), "");
    }

    // ========== parse_gold ==========

    #[test]
    fn test_parse_gold_plain() {
        assert_eq!(parse_gold("150"), 150.0);
        assert_eq!(parse_gold("  99.125"), 99.125);
    }

    #[test]
    fn test_parse_gold_comma_decimal() {
        assert_eq!(parse_gold("12,5"), 12.5);
    }

    #[test]
    fn test_parse_gold_only_first_comma_replaced() {
        // "1,234,5" → "1.234,5" → leading literal "1.234"
        assert_eq!(parse_gold("1,234,5"), 1.234);
    }

    #[test]
    fn test_parse_gold_trailing_garbage() {
        assert_eq!(parse_gold("301.25g"), 301.25);
        assert_eq!(parse_gold("5.gold"), 5.0);
    }

    #[test]
    fn test_parse_gold_malformed_is_zero() {
        assert_eq!(parse_gold(""), 0.0);
        assert_eq!(parse_gold("abc"), 0.0);
        assert_eq!(parse_gold("g150"), 0.0);
        assert_eq!(parse_gold("."), 0.0);
    }

    #[test]
    fn test_parse_gold_negative_is_zero() {
        assert_eq!(parse_gold("-25"), 0.0);
        assert_eq!(parse_gold("-0.5"), 0.0);
    }

    #[test]
    fn test_parse_gold_exponent() {
        assert_eq!(parse_gold("1e3"), 1000.0);
        assert_eq!(parse_gold("2e"), 2.0);
    }

    #[test]
    fn test_parse_gold_overflow_is_zero() {
        assert_eq!(parse_gold("1e999"), 0.0);
    }

    // ========== parse_qty ==========

    #[test]
    fn test_parse_qty_first_digit_run() {
        assert_eq!(parse_qty("12"), 12);
        assert_eq!(parse_qty("x 34 available, 5 more"), 34);
        assert_eq!(parse_qty("1.5k"), 1);
    }

    #[test]
    fn test_parse_qty_no_digits() {
        assert_eq!(parse_qty(""), 0);
        assert_eq!(parse_qty("none"), 0);
    }

    // ========== names_match ==========

    #[test]
    fn test_names_match_either_direction() {
        assert!(names_match("EU-Draenor", "Draenor"));
        assert!(names_match("draenor", "Draenor"));
        assert!(names_match("Tarren", "Tarren Mill"));
        assert!(!names_match("Kazzak", "Draenor"));
    }

    #[test]
    fn test_names_match_empty_never_matches() {
        assert!(!names_match("", "Draenor"));
        assert!(!names_match("   ", "Draenor"));
    }

    // ========== format_population_text ==========

    #[test]
    fn test_format_population_text() {
        assert_eq!(format_population_text(Some(260_000)), "260k+");
        assert_eq!(format_population_text(Some(1_999)), "1k+");
        assert_eq!(format_population_text(Some(999)), "999");
        assert_eq!(format_population_text(None), "N/A");
    }
}
