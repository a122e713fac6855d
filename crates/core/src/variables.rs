//! Persistent key/value variables shared across tests of a run

use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Flat string-keyed store of arbitrary JSON values.
///
/// Every operation is total; a missing key reads as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    values: HashMap<String, Value>,
}

impl VariableStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        trace!(key = %key, "Setting variable");
        self.values.insert(key, value.into());
    }

    /// Value stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    /// Whether `key` is present
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove `key`, returning its value if it was present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Copy of every stored variable
    #[must_use]
    pub fn get_all(&self) -> HashMap<String, Value> {
        self.values.clone()
    }

    /// Remove every variable
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of stored variables
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if `value` cannot be represented as JSON.
    pub fn set_as<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| Error::serialization(e.to_string()))?;
        self.set(key, value);
        Ok(())
    }

    /// Read `key` and deserialize it into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the stored value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.values
            .get(key)
            .map(|value| {
                T::deserialize(value).map_err(|e| {
                    Error::serialization(format!("variable '{key}' has an unexpected shape: {e}"))
                })
            })
            .transpose()
    }
}

/// Shared handle to a session's [`VariableStore`]
///
/// Cloning the handle shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    store: Arc<Mutex<VariableStore>>,
}

impl Variables {
    fn lock(&self) -> MutexGuard<'_, VariableStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set `key` to `value`
    pub fn add(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.lock().set(key, value);
    }

    /// Value stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key)
    }

    /// Whether `key` is present
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.lock().has(key)
    }

    /// Remove `key`, returning its value if it was present
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.lock().remove(key)
    }

    /// Copy of every stored variable
    #[must_use]
    pub fn get_all(&self) -> HashMap<String, Value> {
        self.lock().get_all()
    }

    /// Remove every variable
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// See [`VariableStore::set_as`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if `value` cannot be represented as JSON.
    pub fn set_as<T: Serialize>(&self, key: impl Into<String>, value: &T) -> Result<()> {
        self.lock().set_as(key, value)
    }

    /// See [`VariableStore::get_as`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the stored value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.lock().get_as(key)
    }
}
