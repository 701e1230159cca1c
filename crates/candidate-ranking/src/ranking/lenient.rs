//! Forgiving scalar readers for self-reported JSON.
//!
//! Profiles and criteria are typed by hand in a web form, so a number may arrive as `"30"`
//! and a name may arrive as `42`. These helpers accept both spellings and reject anything
//! structural (arrays, objects) or non-finite.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub(crate) fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|parsed| parsed.is_finite())
}

pub(crate) fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate)),
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

pub(crate) fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Value::Number(number) => number.as_i64().map(|value| value != 0),
        _ => None,
    }
}

fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    text(&value).ok_or_else(|| de::Error::custom("expected a string or number"))
}

pub(crate) fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    number(&value).ok_or_else(|| de::Error::custom("expected a finite number"))
}

pub(crate) fn deserialize_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    integer(&value).ok_or_else(|| de::Error::custom("expected an integer"))
}

pub(crate) fn deserialize_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    values
        .iter()
        .map(|value| text(value).ok_or_else(|| de::Error::custom("expected a list of strings")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_accept_numeric_strings() {
        assert_eq!(number(&json!("1500.5")), Some(1500.5));
        assert_eq!(number(&json!(" 42 ")), Some(42.0));
        assert_eq!(number(&json!("NaN")), None);
        assert_eq!(number(&json!([1])), None);
    }

    #[test]
    fn integers_truncate_fractions() {
        assert_eq!(integer(&json!(30)), Some(30));
        assert_eq!(integer(&json!(30.9)), Some(30));
        assert_eq!(integer(&json!("28")), Some(28));
        assert_eq!(integer(&json!("twenty")), None);
    }

    #[test]
    fn text_renders_scalars_only() {
        assert_eq!(text(&json!("Hanoi")), Some("Hanoi".to_string()));
        assert_eq!(text(&json!(5)), Some("5".to_string()));
        assert_eq!(text(&json!({ "city": "Hanoi" })), None);
        assert_eq!(text(&Value::Null), None);
    }

    #[test]
    fn flags_understand_common_spellings() {
        assert_eq!(flag(&json!(true)), Some(true));
        assert_eq!(flag(&json!("No")), Some(false));
        assert_eq!(flag(&json!(1)), Some(true));
        assert_eq!(flag(&json!("maybe")), None);
    }
}
