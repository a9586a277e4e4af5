//! In-memory model of a browser origin's web storage.
//!
//! All tabs of one [`BrowserOrigin`] share the durable map; each
//! [`BrowserTab`] owns its session map. Durable writes are announced to every
//! other tab, mirroring the DOM `storage` event.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use uuid::Uuid;

use sundenbock_core::storage::{
    KeyValueStorage, StorageEvent, StorageScope, StorageSubscription, TabId,
};
use sundenbock_core::Result;

const EVENT_CAPACITY: usize = 64;

struct OriginInner {
    durable: Mutex<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

/// One origin (scheme + host + port) and its durable storage.
#[derive(Clone)]
pub struct BrowserOrigin {
    inner: Arc<OriginInner>,
}

impl Default for BrowserOrigin {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserOrigin {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(OriginInner {
                durable: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    /// Opens a new tab with an empty session scope.
    pub fn open_tab(&self) -> BrowserTab {
        let tab = BrowserTab {
            origin: self.clone(),
            tab_id: Uuid::new_v4(),
            session: Arc::new(Mutex::new(HashMap::new())),
        };
        tracing::debug!(tab_id = %tab.tab_id, "Tab opened");
        tab
    }

    /// Reads the durable scope directly, as a developer console would.
    pub fn durable_value(&self, key: &str) -> Option<String> {
        self.inner
            .durable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

/// One tab of an origin. Clones refer to the same tab.
#[derive(Clone)]
pub struct BrowserTab {
    origin: BrowserOrigin,
    tab_id: TabId,
    session: Arc<Mutex<HashMap<String, String>>>,
}

impl BrowserTab {
    pub fn origin(&self) -> &BrowserOrigin {
        &self.origin
    }

    fn map_for(&self, scope: StorageScope) -> &Mutex<HashMap<String, String>> {
        match scope {
            StorageScope::Session => &self.session,
            StorageScope::Durable => &self.origin.inner.durable,
        }
    }

    fn announce(&self, key: &str, old_value: Option<String>, new_value: Option<String>) {
        if old_value == new_value {
            return;
        }
        let event = StorageEvent {
            key: Some(key.to_string()),
            scope: StorageScope::Durable,
            old_value,
            new_value,
            source: self.tab_id,
        };
        // No receivers is not an error: no other tab is listening.
        let _ = self.origin.inner.events.send(event);
    }
}

impl KeyValueStorage for BrowserTab {
    fn tab_id(&self) -> TabId {
        self.tab_id
    }

    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>> {
        Ok(self
            .map_for(scope)
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<()> {
        let old_value = self
            .map_for(scope)
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        if scope == StorageScope::Durable {
            self.announce(key, old_value, Some(value.to_string()));
        }
        Ok(())
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<()> {
        let old_value = self
            .map_for(scope)
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        if scope == StorageScope::Durable {
            self.announce(key, old_value, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> StorageSubscription {
        StorageSubscription::new(self.origin.inner.events.subscribe(), self.tab_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durable_is_shared_session_is_not() {
        let origin = BrowserOrigin::new();
        let a = origin.open_tab();
        let b = origin.open_tab();

        a.set(StorageScope::Durable, "theme", "dark").unwrap();
        a.set(StorageScope::Session, "draft", "hello").unwrap();

        assert_eq!(
            b.get(StorageScope::Durable, "theme").unwrap().as_deref(),
            Some("dark")
        );
        assert_eq!(b.get(StorageScope::Session, "draft").unwrap(), None);
        assert_eq!(origin.durable_value("theme").as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_durable_writes_reach_other_tabs_only() {
        let origin = BrowserOrigin::new();
        let a = origin.open_tab();
        let b = origin.open_tab();
        let mut a_events = a.subscribe();
        let mut b_events = b.subscribe();

        a.set(StorageScope::Durable, "jwt_token", "t1").unwrap();
        a.set(StorageScope::Session, "jwt_token", "t2").unwrap();
        a.remove(StorageScope::Durable, "jwt_token").unwrap();

        let first = b_events.recv().await.unwrap();
        assert_eq!(first.new_value.as_deref(), Some("t1"));
        assert_eq!(first.source, a.tab_id());

        let second = b_events.recv().await.unwrap();
        assert_eq!(second.old_value.as_deref(), Some("t1"));
        assert_eq!(second.new_value, None);

        assert!(b_events.try_recv().is_none());
        assert!(a_events.try_recv().is_none());
    }

    #[test]
    fn test_unchanged_values_are_not_announced() {
        let origin = BrowserOrigin::new();
        let a = origin.open_tab();
        let b = origin.open_tab();
        let mut b_events = b.subscribe();

        a.remove(StorageScope::Durable, "missing").unwrap();
        a.set(StorageScope::Durable, "k", "v").unwrap();
        a.set(StorageScope::Durable, "k", "v").unwrap();

        assert!(b_events.try_recv().is_some());
        assert!(b_events.try_recv().is_none());
    }
}
