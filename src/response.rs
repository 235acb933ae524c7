use crate::error::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a response body.
/// An empty body carries no value; anything else must be JSON.
pub fn decode_body(body: &[u8]) -> Result<Option<Value>> {
    if body.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(body)?))
}

/// Convert a decoded response into the provided type.
/// An absent value is treated as JSON `null`, so `Option<T>` targets map it to `None`.
pub fn decode_into<T>(value: Option<Value>) -> Result<T>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(value.unwrap_or(Value::Null))?)
}

/// Get a value by a slash-separated path.
/// For example, "Sender/Name" would access the "Name" field inside the "Sender" object,
/// and "0/BarCode" the "BarCode" field of the first array element.
pub fn value_at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for part in path.split('/').filter(|s| !s.is_empty()) {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(arr) => {
                let index: usize = part.parse().ok()?;
                arr.get(index)?
            }
            _ => return None,
        };
    }

    Some(current)
}
