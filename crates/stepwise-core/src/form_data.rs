//! Shared form data.
//!
//! [`FormData`] is the answer sheet shared by all steps of a form. Steps write
//! to it from their field handlers; the form engine only ever reads it, to
//! decide which steps are visible.
//!
//! [`FormDataStore`] pairs the data with its change notification, so step
//! content can be handed one explicit dependency instead of capturing ad-hoc
//! shared state.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::logging::targets;
use crate::signal::Signal;

/// An insertion-ordered map of field names to JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    values: IndexMap<String, Value>,
}

impl FormData {
    /// Create empty form data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value using builder pattern.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a string value. Non-string values yield `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Get a boolean value. Non-boolean values yield `None`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    /// Check whether `key` holds exactly `true`.
    pub fn is_true(&self, key: &str) -> bool {
        self.get_bool(key) == Some(true)
    }

    /// Insert a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Remove a value, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// Check whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether no fields are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse form data from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize form data to a JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A single change applied to a [`FormDataStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormDataChange {
    /// The field that changed.
    pub key: String,
    /// The new value, or `None` if the field was removed.
    pub value: Option<Value>,
}

/// Form data plus its change notification.
///
/// The store is shared (`Arc`) between the form engine and the step content
/// that edits it.
///
/// # Signals
///
/// - `changed(FormDataChange)`: Emitted after every write that alters a value
pub struct FormDataStore {
    data: RwLock<FormData>,
    /// Signal emitted after a field is written or removed.
    pub changed: Signal<FormDataChange>,
}

impl FormDataStore {
    /// Create an empty store.
    pub fn new() -> Arc<Self> {
        Self::with_data(FormData::new())
    }

    /// Create a store seeded with `data`.
    pub fn with_data(data: FormData) -> Arc<Self> {
        Arc::new(Self {
            data: RwLock::new(data),
            changed: Signal::new(),
        })
    }

    /// Get a copy of the current data.
    pub fn snapshot(&self) -> FormData {
        self.data.read().clone()
    }

    /// Read the current data without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&FormData) -> R) -> R {
        f(&self.data.read())
    }

    /// Write a field, emitting `changed` if the value differs.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        let value = value.into();
        {
            let mut data = self.data.write();
            if data.get(&key) == Some(&value) {
                return false;
            }
            data.insert(key.clone(), value.clone());
        }
        tracing::trace!(target: targets::FORM_DATA, field = %key, "form data changed");
        self.changed.emit(FormDataChange {
            key,
            value: Some(value),
        });
        true
    }

    /// Remove a field, emitting `changed` if it was present.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let removed = self.data.write().remove(key);
        if removed.is_some() {
            tracing::trace!(target: targets::FORM_DATA, field = %key, "form data removed");
            self.changed.emit(FormDataChange {
                key: key.to_string(),
                value: None,
            });
        }
        removed
    }
}

impl std::fmt::Debug for FormDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormDataStore")
            .field("data", &*self.data.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_form_data_accessors() {
        let data = FormData::new()
            .with("email", "ada@example.com")
            .with("wantsExtra", true)
            .with("cohort", 3);

        assert_eq!(data.get_str("email"), Some("ada@example.com"));
        assert_eq!(data.get_bool("wantsExtra"), Some(true));
        assert!(data.is_true("wantsExtra"));
        assert!(!data.is_true("cohort"));
        assert_eq!(data.get_str("cohort"), None);
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_form_data_json_preserves_order() {
        let data = FormData::from_json(r#"{"zeta":1,"alpha":"a"}"#).unwrap();
        let keys: Vec<&str> = data.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(data.to_json().unwrap(), r#"{"zeta":1,"alpha":"a"}"#);
    }

    #[test]
    fn test_form_data_rejects_non_object() {
        assert!(FormData::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_store_emits_on_change_only() {
        let store = FormDataStore::new();
        let changes = Arc::new(Mutex::new(Vec::new()));

        let changes_clone = changes.clone();
        store.changed.connect(move |change| {
            changes_clone.lock().push(change.key.clone());
        });

        assert!(store.set("name", "Ada"));
        assert!(!store.set("name", "Ada"));
        assert!(store.set("name", "Grace"));
        assert_eq!(store.remove("name"), Some(Value::from("Grace")));
        assert_eq!(store.remove("name"), None);

        assert_eq!(*changes.lock(), vec!["name", "name", "name"]);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_store_read_without_copy() {
        let store = FormDataStore::with_data(FormData::new().with("wantsExtra", false));
        assert!(!store.read(|data| data.is_true("wantsExtra")));
    }
}
