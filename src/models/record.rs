use serde_json::{Map, Value};

/// Field name to value. Raw records hold one string per mapped column;
/// cleaned records hold strings, numbers or null.
pub type Record = Map<String, Value>;
