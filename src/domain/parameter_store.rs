// SPDX-License-Identifier: MIT OR Apache-2.0

//! The resolved, ordered key-value parameter mapping.

use crate::domain::errors::{PliteError, Result};
use crate::domain::param_value::ParamValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered, read-only mapping from parameter names to values.
///
/// A `ParameterStore` is the output of configuration resolution and the input to
/// every provider factory. It preserves the order in which keys were loaded, and
/// offers no mutation once built: combining stores produces a new store.
///
/// # Examples
///
/// ```
/// use plite::domain::{ParamValue, ParameterStore};
///
/// let store = ParameterStore::from_pairs([
///     ("file", ParamValue::from("file")),
///     ("file_provider", ParamValue::from("local")),
/// ]);
///
/// assert!(store.has("file_provider"));
/// assert!(store.matches("file_provider", "local"));
/// assert_eq!(store.get_with_prefix("FILE_").len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterStore {
    values: IndexMap<String, ParamValue>,
}

impl ParameterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from key-value pairs. Later duplicates replace earlier ones.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Builds a store from a JSON value, which must be an object.
    ///
    /// # Examples
    ///
    /// ```
    /// use plite::domain::ParameterStore;
    /// use serde_json::json;
    ///
    /// let store = ParameterStore::from_json_object(json!({"app": "demo"})).unwrap();
    /// assert!(store.matches("app", "demo"));
    ///
    /// assert!(ParameterStore::from_json_object(json!(["app"])).is_err());
    /// ```
    pub fn from_json_object(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                values: map.into_iter().map(|(k, v)| (k, ParamValue::new(v))).collect(),
            }),
            other => Err(PliteError::Parse {
                message: format!(
                    "expected a JSON object of parameters, found {}",
                    crate::domain::errors::json_type_name(&other)
                ),
                source: None,
            }),
        }
    }

    /// Returns `true` if the key is present (even when its value is null).
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the value for the key, if present.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    /// Returns the value for the key as a string slice, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    /// Returns the string value for the key, or a `MissingParameter` error.
    ///
    /// Empty and whitespace-only strings count as missing.
    pub fn require_str(&self, key: &str) -> Result<&str> {
        match self.get_str(key).map(str::trim) {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(PliteError::MissingParameter {
                key: key.to_string(),
            }),
        }
    }

    /// Returns a new store holding only the keys that start with `prefix`,
    /// compared ASCII case-insensitively. Keys keep their original spelling and
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use plite::domain::ParameterStore;
    ///
    /// let store = ParameterStore::from_pairs([("DB_host", "a"), ("db_port", "b"), ("file", "c")]);
    /// let db = store.get_with_prefix("db_");
    /// assert_eq!(db.keys().collect::<Vec<_>>(), vec!["DB_host", "db_port"]);
    /// ```
    pub fn get_with_prefix(&self, prefix: &str) -> ParameterStore {
        let values = self
            .values
            .iter()
            .filter(|(key, _)| starts_with_ignore_ascii_case(key, prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        ParameterStore { values }
    }

    /// Returns `true` if the key exists and its value strictly equals `expected`.
    pub fn matches(&self, key: &str, expected: impl Into<ParamValue>) -> bool {
        let expected = expected.into();
        self.get(key).is_some_and(|value| *value == expected)
    }

    /// Returns a new store with `over` shallow-merged on top of `self`.
    ///
    /// Keys from `self` keep their position; keys present in both take the
    /// value from `over`; keys only in `over` are appended.
    pub fn merged(&self, over: &ParameterStore) -> ParameterStore {
        let mut values = self.values.clone();
        for (key, value) in &over.values {
            values.insert(key.clone(), value.clone());
        }
        ParameterStore { values }
    }

    /// Returns an iterator over the keys in load order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns an iterator over the entries in load order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the store holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Converts the store into a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.as_json().clone()))
                .collect(),
        )
    }
}

fn starts_with_ignore_ascii_case(key: &str, prefix: &str) -> bool {
    key.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
