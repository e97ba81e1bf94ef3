//! Raw record → typed record: blanks to null, numeric text to numbers.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::config::TableRules;
use crate::models::Record;

/// Optional sign, ASCII digits, at most one decimal point.
static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)$").unwrap());

/// Clean every value of `record`, dropping internal (`_`-prefixed) keys.
pub fn clean_record(record: &Record, rules: &TableRules) -> Record {
    record
        .iter()
        .filter(|(key, _)| !key.starts_with(rules.private_key_prefix))
        .map(|(key, value)| (key.clone(), clean_value(value)))
        .collect()
}

/// Coerce one value.
///
/// - `""` and null become null
/// - numeric-looking text (after normalization) becomes an integer, or a
///   float when it carries a decimal point
/// - any other text is kept exactly as given
/// - non-string values pass through
pub fn clean_value(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(text) if text.is_empty() => Value::Null,
        Value::String(text) => parse_number(&normalize(text)).unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

/// Strip one leading apostrophe, then percent signs, commas and spaces.
pub fn normalize(text: &str) -> String {
    let text = text.strip_prefix('\'').unwrap_or(text);
    text.chars()
        .filter(|c| !matches!(c, '%' | ',' | ' '))
        .collect::<String>()
        .trim()
        .to_string()
}

fn parse_number(normalized: &str) -> Option<Value> {
    if !NUMERIC.is_match(normalized) {
        return None;
    }

    let number = if normalized.contains('.') {
        normalized.parse::<f64>().ok().and_then(Number::from_f64)
    } else {
        normalized.parse::<i64>().ok().map(Number::from)
    };

    if number.is_none() {
        tracing::debug!(value = normalized, "Numeric text did not parse, keeping original");
    }
    number.map(Value::Number)
}
