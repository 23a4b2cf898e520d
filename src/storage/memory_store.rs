use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::codec::{decode_log, encode_log};
use super::traits::MessageStore;
use crate::session::Message;
use crate::utils::WidgetError;

/// In-process key-value store holding raw JSON per key
///
/// Clones share the same backing map, so several sessions can point at one
/// store the way widgets on one page share browser storage.
#[derive(Debug, Clone)]
pub struct MemoryMessageStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    key: String,
}

impl MemoryMessageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            key: key.into(),
        }
    }

    /// A store for another key over the same backing map
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw stored value for this key
    pub fn raw(&self) -> Option<String> {
        self.entries.lock().get(&self.key).cloned()
    }

    /// Overwrite the stored value for this key without validation
    pub fn insert_raw(&self, raw: impl Into<String>) {
        self.entries.lock().insert(self.key.clone(), raw.into());
    }
}

impl MessageStore for MemoryMessageStore {
    fn load(&self) -> Option<Vec<Message>> {
        let raw = self.raw()?;
        decode_log(&raw)
    }

    fn save(&self, messages: &[Message]) -> Result<(), WidgetError> {
        let json = encode_log(messages)?;
        self.insert_raw(json);
        Ok(())
    }

    fn clear(&self) -> Result<(), WidgetError> {
        self.entries.lock().remove(&self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MessageIdGenerator, Sender};

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryMessageStore::new("shared");
        let other_handle = store.clone();
        store.save(&[Message::greeting("Hi")]).unwrap();

        assert_eq!(other_handle.load().unwrap().len(), 1);
    }

    #[test]
    fn test_distinct_keys_do_not_collide() {
        let first = MemoryMessageStore::new("first");
        let second = first.with_key("second");
        let mut ids = MessageIdGenerator::new();

        first.save(&[ids.message(Sender::User, "one")]).unwrap();

        assert!(first.load().is_some());
        assert!(second.load().is_none());
        assert_eq!(second.key(), "second");
    }

    #[test]
    fn test_corrupt_raw_value_loads_as_absent() {
        let store = MemoryMessageStore::new("k");
        store.insert_raw("not json at all");
        assert!(store.load().is_none());
        // The raw value is left alone until the next save
        assert_eq!(store.raw().as_deref(), Some("not json at all"));
    }

    #[test]
    fn test_clear_removes_entry() {
        let store = MemoryMessageStore::new("k");
        store.save(&[Message::greeting("Hi")]).unwrap();
        store.clear().unwrap();
        assert!(store.raw().is_none());
    }
}
