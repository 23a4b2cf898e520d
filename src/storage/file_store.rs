use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::codec::{decode_log, encode_log};
use super::traits::MessageStore;
use crate::app::{get_data_dir, WidgetConfig};
use crate::session::Message;
use crate::utils::WidgetError;

/// Stores one log as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileMessageStore {
    path: PathBuf,
}

impl FileMessageStore {
    /// Create a store for `key` inside `dir`
    ///
    /// The directory is created on first save. Keys that could escape the
    /// directory are rejected.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Result<Self, WidgetError> {
        validate_key(key)?;
        let path = dir.as_ref().join(format!("{}.json", key));
        Ok(Self { path })
    }

    /// The store a configuration points at: `storage_dir` (or the platform
    /// data directory) and `storage_key`
    pub fn for_config(config: &WidgetConfig) -> anyhow::Result<Self> {
        let dir = match &config.storage_dir {
            Some(dir) => dir.clone(),
            None => get_data_dir()?,
        };
        Ok(Self::new(dir, &config.storage_key)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn validate_key(key: &str) -> Result<(), WidgetError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(WidgetError::StorageError("storage key is empty".to_string()));
    }
    if key.contains('/') || key.contains('\\') || key.contains("..") {
        return Err(WidgetError::StorageError(format!(
            "storage key '{}' must not contain path separators",
            key
        )));
    }
    Ok(())
}

impl MessageStore for FileMessageStore {
    fn load(&self) -> Option<Vec<Message>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode_log(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read stored messages");
                None
            }
        }
    }

    fn save(&self, messages: &[Message]) -> Result<(), WidgetError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = encode_log(messages)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), count = messages.len(), "saved messages");
        Ok(())
    }

    fn clear(&self) -> Result<(), WidgetError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MessageIdGenerator, Sender};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = FileMessageStore::new(dir.path().join("nested"), "widget-a").unwrap();
        let mut ids = MessageIdGenerator::new();
        let log = vec![Message::greeting("Hi!"), ids.message(Sender::User, "Hello")];

        assert!(store.load().is_none());
        store.save(&log).unwrap();

        assert!(store.path().ends_with("nested/widget-a.json"));
        assert_eq!(store.load().unwrap(), log);
    }

    #[test]
    fn test_corrupt_file_loads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = FileMessageStore::new(dir.path(), "widget").unwrap();
        fs::write(store.path(), "]]garbage[[").unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn test_keys_are_isolated() {
        let dir = TempDir::new().unwrap();
        let a = FileMessageStore::new(dir.path(), "a").unwrap();
        let b = FileMessageStore::new(dir.path(), "b").unwrap();

        a.save(&[Message::greeting("only in a")]).unwrap();

        assert!(a.load().is_some());
        assert!(b.load().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileMessageStore::new(dir.path(), "widget").unwrap();
        store.save(&[Message::greeting("Hi")]).unwrap();

        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_for_config_uses_storage_settings() {
        let dir = TempDir::new().unwrap();
        let config = WidgetConfig {
            storage_dir: Some(dir.path().to_path_buf()),
            storage_key: "support".to_string(),
            ..WidgetConfig::default()
        };

        let store = FileMessageStore::for_config(&config).unwrap();
        assert_eq!(store.path(), dir.path().join("support.json"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        assert!(FileMessageStore::new(dir.path(), "../escape").is_err());
        assert!(FileMessageStore::new(dir.path(), "a/b").is_err());
        assert!(FileMessageStore::new(dir.path(), "").is_err());
    }
}
