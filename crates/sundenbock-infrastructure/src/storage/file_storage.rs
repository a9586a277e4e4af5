//! File-backed storage for native hosts.
//!
//! The durable scope is a JSON object persisted through [`AtomicJsonFile`];
//! the session scope lives in memory and ends with the process.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;

use tokio::sync::broadcast;
use uuid::Uuid;

use sundenbock_core::storage::{
    KeyValueStorage, StorageEvent, StorageScope, StorageSubscription, TabId,
};
use sundenbock_core::Result;

use super::atomic_json::AtomicJsonFile;

/// Storage with an on-disk durable scope.
pub struct FileBackedStorage {
    file: AtomicJsonFile<BTreeMap<String, String>>,
    durable: Mutex<BTreeMap<String, String>>,
    session: Mutex<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
    tab_id: TabId,
}

impl FileBackedStorage {
    /// Opens the storage file, loading any existing durable values.
    pub fn open(path: PathBuf) -> Result<Self> {
        let file = AtomicJsonFile::<BTreeMap<String, String>>::new(path);
        let durable: BTreeMap<String, String> = file.load()?.unwrap_or_default();
        tracing::debug!(
            path = %file.path().display(),
            keys = durable.len(),
            "Opened file-backed storage"
        );
        let (events, _) = broadcast::channel(16);
        Ok(Self {
            file,
            durable: Mutex::new(durable),
            session: Mutex::new(HashMap::new()),
            events,
            tab_id: Uuid::new_v4(),
        })
    }

    /// Applies `change` to a copy of the durable map, persists it, then commits.
    fn update_durable<F>(&self, key: &str, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut durable = self.durable.lock().unwrap_or_else(|e| e.into_inner());
        let old_value = durable.get(key).cloned();

        let mut next = durable.clone();
        change(&mut next);
        let new_value = next.get(key).cloned();
        if old_value == new_value {
            return Ok(());
        }

        self.file.save(&next)?;
        *durable = next;
        drop(durable);

        let _ = self.events.send(StorageEvent {
            key: Some(key.to_string()),
            scope: StorageScope::Durable,
            old_value,
            new_value,
            source: self.tab_id,
        });
        Ok(())
    }
}

impl KeyValueStorage for FileBackedStorage {
    fn tab_id(&self) -> TabId {
        self.tab_id
    }

    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>> {
        let value = match scope {
            StorageScope::Session => self
                .session
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(key)
                .cloned(),
            StorageScope::Durable => self
                .durable
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(key)
                .cloned(),
        };
        Ok(value)
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<()> {
        match scope {
            StorageScope::Session => {
                self.session
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(key.to_string(), value.to_string());
                Ok(())
            }
            StorageScope::Durable => self.update_durable(key, |map| {
                map.insert(key.to_string(), value.to_string());
            }),
        }
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<()> {
        match scope {
            StorageScope::Session => {
                self.session
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .remove(key);
                Ok(())
            }
            StorageScope::Durable => self.update_durable(key, |map| {
                map.remove(key);
            }),
        }
    }

    fn subscribe(&self) -> StorageSubscription {
        StorageSubscription::new(self.events.subscribe(), self.tab_id)
    }
}
