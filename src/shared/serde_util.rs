//! Custom serde helpers for the feed's loosely typed wire format.
//!
//! Entries in `historical_prices` are produced by a third party and are not
//! validated upstream. A field of the wrong JSON type must drop that one
//! entry, not fail the whole response, so these helpers map anything
//! unexpected to `None`.

/// Deserializes a JSON string into `Some(String)`; any other JSON value
/// (null, number, object, ...) becomes `None`.
pub mod lenient_string {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }
}

/// Deserializes a finite JSON number into `Some(f64)`; anything else becomes
/// `None`.
pub mod lenient_f64 {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            _ => None,
        })
    }
}
