//! Shape-tolerant decoders for provider JSON.
//!
//! Knowledge-graph providers return the same logical field in several
//! shapes (a bare string, an object with a `name`, an object with a
//! `value`). Each category below checks the possible shapes in one fixed
//! priority order and is applied uniformly to every field of that
//! category, never per-field.

use serde_json::Value;

/// String-like fields. Priority: bare string → object `name` → object
/// `value`.
pub fn string_like(v: &Value) -> Option<String> {
    if let Some(s) = v.as_str() {
        return Some(s.to_string());
    }
    if let Some(s) = v.get("name").and_then(Value::as_str) {
        return Some(s.to_string());
    }
    v.get("value").and_then(Value::as_str).map(str::to_string)
}

/// Numeric-like fields. Priority: bare number → numeric string → object
/// `value`.
pub fn numeric_like(v: &Value) -> Option<f64> {
    if let Some(n) = v.as_f64() {
        return Some(n);
    }
    if let Some(n) = v.as_str().and_then(|s| s.trim().parse().ok()) {
        return Some(n);
    }
    v.get("value").and_then(numeric_like)
}

/// Date-like fields, reduced to a year. Priority: bare number → object
/// `year` → leading year digits of a string (handles `"2004-02-04"` and
/// Diffbot's `"d2004-02-04"`).
pub fn date_like(v: &Value) -> Option<i32> {
    if let Some(n) = v.as_i64() {
        return i32::try_from(n).ok();
    }
    if let Some(y) = v.get("year").and_then(Value::as_i64) {
        return i32::try_from(y).ok();
    }
    let s = v.as_str().or_else(|| v.get("str").and_then(Value::as_str))?;
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (digits.len() == 4).then(|| digits.parse().ok()).flatten()
}

/// Money-like fields, rendered as a display string. Priority: bare string
/// → bare number → object `value` (+ optional `currency`).
pub fn money_like(v: &Value) -> Option<String> {
    if let Some(s) = v.as_str() {
        return Some(s.to_string());
    }
    if let Some(n) = v.as_f64() {
        return Some(format_amount(n));
    }
    let value = v.get("value").and_then(Value::as_f64)?;
    let amount = format_amount(value);
    match v.get("currency").and_then(Value::as_str) {
        Some(cur) => Some(format!("{amount} {cur}")),
        None => Some(amount),
    }
}

fn format_amount(n: f64) -> String {
    if n >= 1e9 {
        format!("{:.1}B", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.1}M", n / 1e6)
    } else {
        format!("{n:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_like_priority_order() {
        assert_eq!(string_like(&json!("acme")), Some("acme".to_string()));
        assert_eq!(
            string_like(&json!({"name": "acme", "value": "other"})),
            Some("acme".to_string())
        );
        assert_eq!(
            string_like(&json!({"value": "acme"})),
            Some("acme".to_string())
        );
        assert_eq!(string_like(&json!(42)), None);
    }

    #[test]
    fn test_numeric_like_shapes() {
        assert_eq!(numeric_like(&json!(12.5)), Some(12.5));
        assert_eq!(numeric_like(&json!("12.5")), Some(12.5));
        assert_eq!(numeric_like(&json!({"value": 12.5})), Some(12.5));
        assert_eq!(numeric_like(&json!({"value": "12.5"})), Some(12.5));
        assert_eq!(numeric_like(&json!("not a number")), None);
    }

    #[test]
    fn test_date_like_shapes() {
        assert_eq!(date_like(&json!(2004)), Some(2004));
        assert_eq!(date_like(&json!({"year": 2004})), Some(2004));
        assert_eq!(date_like(&json!("2004-02-04")), Some(2004));
        assert_eq!(date_like(&json!({"str": "d2004-02-04"})), Some(2004));
        assert_eq!(date_like(&json!("no year here")), None);
    }

    #[test]
    fn test_money_like_shapes() {
        assert_eq!(money_like(&json!("$1.2B")), Some("$1.2B".to_string()));
        assert_eq!(money_like(&json!(1_500_000_000.0)), Some("1.5B".to_string()));
        assert_eq!(
            money_like(&json!({"value": 2_000_000.0, "currency": "USD"})),
            Some("2.0M USD".to_string())
        );
        assert_eq!(money_like(&json!({"value": 950.0})), Some("950".to_string()));
        assert_eq!(money_like(&json!({"other": true})), None);
    }
}
