use crate::interpreter::Value;

pub fn serialize_value(value: &Value) -> Result<String, serde_json::Error> { serde_json::to_string(value) }

pub fn deserialize_value(json: &str) -> Result<Value, serde_json::Error> { serde_json::from_str(json) }
