// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parameter value type with typed accessors.
//!
//! Parameters are loaded from JSON documents, so a value may be a string, a
//! boolean, a number, null, an array or a nested object. `ParamValue` keeps the
//! JSON value as loaded and offers typed accessors that report conversion errors
//! against the key being read.

use crate::domain::errors::{PliteError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A JSON-like configuration parameter value.
///
/// Equality is strict: the string `"1"` and the number `1` are different values.
///
/// # Examples
///
/// ```
/// use plite::domain::ParamValue;
///
/// let value = ParamValue::from("local");
/// assert_eq!(value.as_str(), Some("local"));
///
/// let value = ParamValue::from(5432);
/// assert_eq!(value.as_u64("db_port_local").unwrap(), 5432);
/// assert_ne!(value, ParamValue::from("5432"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamValue(Value);

impl ParamValue {
    /// Creates a new `ParamValue` from a JSON value.
    pub fn new(value: Value) -> Self {
        ParamValue(value)
    }

    /// Returns the JSON null value.
    pub fn null() -> Self {
        ParamValue(Value::Null)
    }

    /// Returns `true` if the stored value is JSON null.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Returns the value as a string slice if it is a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Renders scalar values as text.
    ///
    /// Strings are returned as-is, numbers and booleans in their JSON form.
    /// Null, arrays and objects are conversion errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use plite::domain::ParamValue;
    ///
    /// assert_eq!(ParamValue::from(5432).to_plain_string("port").unwrap(), "5432");
    /// assert_eq!(ParamValue::from("db").to_plain_string("host").unwrap(), "db");
    /// ```
    pub fn to_plain_string(&self, key: &str) -> Result<String> {
        match &self.0 {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(PliteError::wrong_type(key, "string", other)),
        }
    }

    /// Converts the value to a boolean.
    ///
    /// JSON booleans convert directly. Strings are accepted case-insensitively
    /// as `true`/`yes`/`1`/`on` and `false`/`no`/`0`/`off`, and the numbers
    /// `0` and `1` map to `false` and `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// use plite::domain::ParamValue;
    ///
    /// assert!(ParamValue::from(true).as_bool("debug").unwrap());
    /// assert!(!ParamValue::from("Off").as_bool("debug").unwrap());
    /// ```
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match &self.0 {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(true),
                "false" | "no" | "0" | "off" => Ok(false),
                _ => s.parse::<bool>().map_err(|e| PliteError::TypeConversion {
                    key: key.to_string(),
                    target_type: "boolean".to_string(),
                    source: Box::new(e),
                }),
            },
            Value::Number(n) if n.as_u64() == Some(0) => Ok(false),
            Value::Number(n) if n.as_u64() == Some(1) => Ok(true),
            other => Err(PliteError::wrong_type(key, "boolean", other)),
        }
    }

    /// Converts the value to an `i64`, parsing strings when needed.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        match &self.0 {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| PliteError::wrong_type(key, "i64", &self.0)),
            Value::String(s) => s.trim().parse::<i64>().map_err(|e| PliteError::TypeConversion {
                key: key.to_string(),
                target_type: "integer".to_string(),
                source: Box::new(e),
            }),
            other => Err(PliteError::wrong_type(key, "integer", other)),
        }
    }

    /// Converts the value to a `u64`, parsing strings when needed.
    pub fn as_u64(&self, key: &str) -> Result<u64> {
        match &self.0 {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| PliteError::wrong_type(key, "u64", &self.0)),
            Value::String(s) => s.trim().parse::<u64>().map_err(|e| PliteError::TypeConversion {
                key: key.to_string(),
                target_type: "integer".to_string(),
                source: Box::new(e),
            }),
            other => Err(PliteError::wrong_type(key, "integer", other)),
        }
    }

    /// Converts the value to an `f64`, parsing strings when needed.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        match &self.0 {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| PliteError::wrong_type(key, "float", &self.0)),
            Value::String(s) => s.trim().parse::<f64>().map_err(|e| PliteError::TypeConversion {
                key: key.to_string(),
                target_type: "float".to_string(),
                source: Box::new(e),
            }),
            other => Err(PliteError::wrong_type(key, "float", other)),
        }
    }

    /// Deserializes the value into any type that implements `DeserializeOwned`.
    ///
    /// # Examples
    ///
    /// ```
    /// use plite::domain::ParamValue;
    /// use serde_json::json;
    ///
    /// let value = ParamValue::new(json!(["a", "b"]));
    /// let list: Vec<String> = value.parse("hosts").unwrap();
    /// assert_eq!(list, vec!["a", "b"]);
    /// ```
    pub fn parse<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        serde_json::from_value(self.0.clone()).map_err(|e| PliteError::TypeConversion {
            key: key.to_string(),
            target_type: std::any::type_name::<T>().to_string(),
            source: Box::new(e),
        })
    }

    /// Returns a reference to the underlying JSON value.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consumes the value and returns the underlying JSON value.
    pub fn into_json(self) -> Value {
        self.0
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        ParamValue(value)
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        value.0
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue(Value::String(s))
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue(Value::String(s.to_string()))
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue(Value::Bool(b))
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue(Value::from(n))
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue(Value::from(n))
    }
}

impl From<u64> for ParamValue {
    fn from(n: u64) -> Self {
        ParamValue(Value::from(n))
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue(Value::from(n))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_value_as_str() {
        let value = ParamValue::from("local");
        assert_eq!(value.as_str(), Some("local"));

        let value = ParamValue::from(1);
        assert_eq!(value.as_str(), None);
    }

    #[test]
    fn test_strict_equality() {
        assert_ne!(ParamValue::from("1"), ParamValue::from(1));
        assert_ne!(ParamValue::from("true"), ParamValue::from(true));
        assert_eq!(ParamValue::from("x"), ParamValue::from("x".to_string()));
    }

    #[test]
    fn test_null() {
        let value = ParamValue::null();
        assert!(value.is_null());
        assert_eq!(value.as_json(), &Value::Null);
    }

    #[test]
    fn test_as_bool_variants() {
        for val in ["true", "True", "YES", "1", "on"] {
            assert!(ParamValue::from(val).as_bool("k").unwrap(), "Failed for value: {}", val);
        }
        for val in ["false", "No", "0", "OFF"] {
            assert!(!ParamValue::from(val).as_bool("k").unwrap(), "Failed for value: {}", val);
        }
        assert!(ParamValue::from(1).as_bool("k").unwrap());
        assert!(!ParamValue::from(0).as_bool("k").unwrap());
    }

    #[test]
    fn test_as_bool_invalid() {
        assert!(ParamValue::from("maybe").as_bool("k").is_err());
        assert!(ParamValue::from(7).as_bool("k").is_err());
        assert!(ParamValue::new(json!({})).as_bool("k").is_err());
    }

    #[test]
    fn test_numbers_from_json_and_strings() {
        assert_eq!(ParamValue::from(-42).as_i64("k").unwrap(), -42);
        assert_eq!(ParamValue::from("-42").as_i64("k").unwrap(), -42);
        assert_eq!(ParamValue::from(5432).as_u64("k").unwrap(), 5432);
        assert_eq!(ParamValue::from(" 5432 ").as_u64("k").unwrap(), 5432);
        assert_eq!(ParamValue::from(2.5).as_f64("k").unwrap(), 2.5);
        assert_eq!(ParamValue::from("2.5").as_f64("k").unwrap(), 2.5);
    }

    #[test]
    fn test_numbers_invalid() {
        assert!(ParamValue::from(-1).as_u64("k").is_err());
        assert!(ParamValue::from(2.5).as_i64("k").is_err());
        assert!(ParamValue::from("abc").as_i64("k").is_err());
        assert!(ParamValue::from(true).as_f64("k").is_err());
    }

    #[test]
    fn test_to_plain_string() {
        assert_eq!(ParamValue::from("x").to_plain_string("k").unwrap(), "x");
        assert_eq!(ParamValue::from(3).to_plain_string("k").unwrap(), "3");
        assert_eq!(ParamValue::from(false).to_plain_string("k").unwrap(), "false");
        assert!(ParamValue::null().to_plain_string("k").is_err());
        assert!(ParamValue::new(json!([1])).to_plain_string("k").is_err());
    }

    #[test]
    fn test_parse_struct() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Endpoint {
            host: String,
            port: u16,
        }

        let value = ParamValue::new(json!({"host": "db", "port": 5432}));
        let endpoint: Endpoint = value.parse("endpoint").unwrap();
        assert_eq!(
            endpoint,
            Endpoint {
                host: "db".to_string(),
                port: 5432
            }
        );

        let result: Result<Endpoint> = ParamValue::from("nope").parse("endpoint");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ParamValue::from("plain")), "plain");
        assert_eq!(format!("{}", ParamValue::from(3)), "3");
        assert_eq!(format!("{}", ParamValue::new(json!({"a": 1}))), "{\"a\":1}");
    }

    #[test]
    fn test_json_roundtrip_is_transparent() {
        let value: ParamValue = serde_json::from_str("{\"k\":\"v\"}").unwrap();
        assert_eq!(value.as_json(), &json!({"k": "v"}));
        assert_eq!(serde_json::to_string(&value).unwrap(), "{\"k\":\"v\"}");
    }
}
