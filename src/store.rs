//! Persistent cells: in-memory state mirrored to one storage key.
//!
//! A cell reads its key once when opened and falls back to the caller's
//! default when the key is absent or unreadable. Every write updates memory
//! first and then serializes the whole value back under the same key. The
//! in-memory value stays authoritative when the medium rejects a write; the
//! rejected write is reported to the caller and lost on the next cold start.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::storage::{KeyValueStorage, StorageError};

pub type SharedStorage = Arc<dyn KeyValueStorage>;

/// A replacement value or a function of the previous value.
pub enum SetAction<T> {
    Replace(T),
    Update(Box<dyn FnOnce(&T) -> T>),
}

impl<T> SetAction<T> {
    pub fn update(f: impl FnOnce(&T) -> T + 'static) -> Self {
        SetAction::Update(Box::new(f))
    }
}

impl<T> From<T> for SetAction<T> {
    fn from(value: T) -> Self {
        SetAction::Replace(value)
    }
}

pub struct PersistentCell<T> {
    storage: SharedStorage,
    key: String,
    default: T,
    value: T,
}

impl<T> PersistentCell<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn open(storage: SharedStorage, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let value = load(storage.as_ref(), &key).unwrap_or_else(|| default.clone());
        Self {
            storage,
            key,
            default,
            value,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set_value(&mut self, action: SetAction<T>) -> Result<(), StorageError> {
        self.value = match action {
            SetAction::Replace(value) => value,
            SetAction::Update(f) => f(&self.value),
        };
        self.persist()
    }

    pub fn set(&mut self, value: T) -> Result<(), StorageError> {
        self.set_value(SetAction::Replace(value))
    }

    /// Apply `f` to the current value. Unlike [`SetAction::Update`] the
    /// closure may borrow from the caller.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) -> Result<(), StorageError> {
        self.value = f(&self.value);
        self.persist()
    }

    /// Mutate the current value in place and persist it.
    pub fn modify<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R, StorageError> {
        let out = f(&mut self.value);
        self.persist()?;
        Ok(out)
    }

    /// Discard the in-memory value and re-read the key, as a new session would.
    pub fn reload(&mut self) {
        self.value = load(self.storage.as_ref(), &self.key).unwrap_or_else(|| self.default.clone());
    }

    /// Drop the stored key and go back to the default.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.value = self.default.clone();
        match self.storage.remove_item(&self.key) {
            Ok(()) => {
                debug!(key = %self.key, "removed cell");
                Ok(())
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "remove dropped, keeping in-memory value");
                Err(err)
            }
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(&self.value)?;
        match self.storage.set_item(&self.key, &serialized) {
            Ok(()) => {
                debug!(key = %self.key, bytes = serialized.len(), "persisted cell");
                Ok(())
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "write dropped, keeping in-memory value");
                Err(err)
            }
        }
    }
}

fn load<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(key, error = %err, "failed to read key, using default");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "stored value is not valid, using default");
            None
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentCell")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn memory() -> (Arc<MemoryStorage>, SharedStorage) {
        let storage = Arc::new(MemoryStorage::new());
        let shared: SharedStorage = storage.clone();
        (storage, shared)
    }

    #[test]
    fn test_unset_key_yields_default_without_write_back() {
        let (raw, shared) = memory();
        let cell = PersistentCell::open(shared, "projects", vec![1, 2]);
        assert_eq!(cell.get(), &vec![1, 2]);
        assert!(raw.get_item("projects").unwrap().is_none());
    }

    #[test]
    fn test_round_trip_through_reopen() {
        let (_, shared) = memory();
        let mut cell = PersistentCell::open(shared.clone(), "names", Vec::<String>::new());
        cell.set(vec!["a".into(), "b".into()]).unwrap();

        let reopened = PersistentCell::open(shared, "names", Vec::<String>::new());
        assert_eq!(reopened.get(), &vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_sequential_updaters_compose() {
        let (_, shared) = memory();
        let mut cell = PersistentCell::open(shared, "letters", Vec::<char>::new());
        let append = |c: char| {
            SetAction::update(move |prev: &Vec<char>| {
                let mut next = prev.clone();
                next.push(c);
                next
            })
        };
        cell.set_value(append('A')).unwrap();
        cell.set_value(append('B')).unwrap();
        assert_eq!(cell.get(), &vec!['A', 'B']);
    }

    #[test]
    fn test_corrupt_value_falls_back_to_default() {
        let (raw, shared) = memory();
        raw.set_item("companyPrep", "{not json").unwrap();
        let cell = PersistentCell::open(shared, "companyPrep", vec![7u8]);
        assert_eq!(cell.get(), &vec![7u8]);
        // The corrupt document is left alone until the next write.
        assert_eq!(raw.get_item("companyPrep").unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_failed_write_keeps_memory_and_last_durable_value() {
        let (raw, shared) = memory();
        let mut cell = PersistentCell::open(shared, "count", 0u32);
        cell.set(1).unwrap();
        raw.set_read_only(true);

        assert!(cell.set_value(SetAction::from(2)).is_err());
        assert_eq!(*cell.get(), 2);

        cell.reload();
        assert_eq!(*cell.get(), 1);
    }

    #[test]
    fn test_null_scalar_round_trip() {
        let (raw, shared) = memory();
        let mut cell = PersistentCell::open(shared.clone(), "primaryResumeId", None::<String>);
        cell.set(Some("01J".to_string())).unwrap();
        cell.set(None).unwrap();
        assert_eq!(raw.get_item("primaryResumeId").unwrap().as_deref(), Some("null"));
        let reopened = PersistentCell::open(shared, "primaryResumeId", Some("x".to_string()));
        assert_eq!(reopened.get(), &None);
    }

    #[test]
    fn test_reset_removes_key_and_restores_default() {
        let (raw, shared) = memory();
        let mut cell = PersistentCell::open(shared.clone(), "primaryResumeId", None::<String>);
        cell.set(Some("01J".to_string())).unwrap();
        cell.reset().unwrap();
        assert_eq!(cell.get(), &None);
        assert!(raw.get_item("primaryResumeId").unwrap().is_none());

        cell.set(Some("01K".to_string())).unwrap();
        raw.set_read_only(true);
        assert!(cell.reset().is_err());
        assert_eq!(cell.get(), &None);
        cell.reload();
        assert_eq!(cell.get().as_deref(), Some("01K"));
    }
}
