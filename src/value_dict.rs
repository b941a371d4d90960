//! Named configuration values with a fallback entry.
//!
//! A [`ValueDict`] maps string keys to values. A lookup for a key that isn't present falls
//! back to the entry stored under the default key, which is [`DEFAULT_KEY`] unless the
//! dictionary was given another one. The encoder doesn't know about this convention: values
//! pulled out of a dictionary are appended like any other.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Key whose value is used when the requested key is absent.
pub const DEFAULT_KEY: &str = "__default__";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValueDict<T> {
    #[serde(skip)]
    name: Option<String>,
    #[serde(skip)]
    default_key: String,
    dict: HashMap<String, T>,
}

impl<T> Default for ValueDict<T> {
    fn default() -> Self {
        Self {
            name: None,
            default_key: DEFAULT_KEY.to_string(),
            dict: HashMap::new(),
        }
    }
}

impl<T> ValueDict<T> {
    /// Create a dictionary. The name only shows up in error messages.
    pub fn new(name: impl Into<String>, dict: HashMap<String, T>) -> Self {
        Self {
            name: Some(name.into()),
            default_key: DEFAULT_KEY.to_string(),
            dict,
        }
    }

    /// Use a different key for the fallback entry.
    pub fn with_default_key(mut self, default_key: impl Into<String>) -> Self {
        self.default_key = default_key.into();
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn has_value(&self, key: &str) -> bool {
        self.dict.contains_key(key)
    }

    pub fn has_default_value(&self) -> bool {
        self.has_value(&self.default_key)
    }

    fn no_value(&self, key: &str) -> Error {
        Error::NoValue {
            key: key.to_string(),
            name: self.name.clone(),
        }
    }

    pub fn get_default(&self) -> Result<&T> {
        self.dict
            .get(&self.default_key)
            .ok_or_else(|| self.no_value(&self.default_key))
    }

    /// Value for `key`, or the default entry if `key` is absent.
    pub fn get(&self, key: &str) -> Result<&T> {
        self.get_optional(key).ok_or_else(|| self.no_value(key))
    }

    pub fn get_optional(&self, key: &str) -> Option<&T> {
        self.dict
            .get(key)
            .or_else(|| self.dict.get(&self.default_key))
    }

    /// Look up `key` if there is one, otherwise go straight to the default entry.
    pub fn get_or_default(&self, key: Option<&str>) -> Result<&T> {
        match key {
            Some(key) => self.get(key),
            None => self.get_default(),
        }
    }

    pub fn len(&self) -> usize {
        self.dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.dict.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ValueDict<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dict = HashMap::deserialize(deserializer)?;
        Ok(Self {
            dict,
            ..Self::default()
        })
    }
}
