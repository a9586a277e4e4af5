//! Persistence substrate contract.
//!
//! Key-value string storage with two scopes of differing lifetime, plus a
//! change notification for writes made by other tabs of the same origin.
//! Implementations live in the infrastructure crate.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::Result;

/// Lifetime of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageScope {
    /// Cleared when the tab (browser session) ends.
    Session,
    /// Survives restarts ("remember me").
    Durable,
}

impl StorageScope {
    /// The other scope.
    pub fn other(self) -> Self {
        match self {
            StorageScope::Session => StorageScope::Durable,
            StorageScope::Durable => StorageScope::Session,
        }
    }
}

/// Identity of one tab (one storage client) within an origin.
pub type TabId = Uuid;

/// A change made to storage by some tab.
///
/// `key` is `None` when the change could not be attributed to a single key
/// (a wholesale clear, or missed notifications); listeners must then re-read
/// everything they care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: Option<String>,
    pub scope: StorageScope,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub source: TabId,
}

impl StorageEvent {
    /// Keyless event from no particular tab, telling listeners to re-read
    /// everything after notifications were missed.
    pub fn resync() -> Self {
        Self {
            key: None,
            scope: StorageScope::Durable,
            old_value: None,
            new_value: None,
            source: Uuid::nil(),
        }
    }

    /// Returns true if listeners interested in `key` must react.
    pub fn concerns(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|k| k == key)
    }
}

/// Key-value storage with a tab-lifetime and a durable scope.
///
/// Writes are synchronous and atomic per key.
pub trait KeyValueStorage: Send + Sync {
    /// Identity of the tab this handle belongs to.
    fn tab_id(&self) -> TabId;

    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>>;

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<()>;

    fn remove(&self, scope: StorageScope, key: &str) -> Result<()>;

    /// Subscribes to changes made by *other* tabs.
    fn subscribe(&self) -> StorageSubscription;
}

/// Receiving end of storage change notifications for one tab.
pub struct StorageSubscription {
    receiver: broadcast::Receiver<StorageEvent>,
    tab_id: TabId,
}

impl StorageSubscription {
    pub fn new(receiver: broadcast::Receiver<StorageEvent>, tab_id: TabId) -> Self {
        Self { receiver, tab_id }
    }

    /// Waits for the next change made by another tab.
    ///
    /// Returns `None` once the storage is gone. Missed notifications are
    /// reported as a single event without a key.
    pub async fn recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.source == self.tab_id => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Storage notifications lagged, forcing resync");
                    return Some(StorageEvent::resync());
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next pending change made by another tab without waiting.
    pub fn try_recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if event.source == self.tab_id => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => {
                    return Some(StorageEvent::resync());
                }
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(source: TabId, key: &str) -> StorageEvent {
        StorageEvent {
            key: Some(key.to_string()),
            scope: StorageScope::Durable,
            old_value: None,
            new_value: Some("v".to_string()),
            source,
        }
    }

    #[test]
    fn test_other_scope() {
        assert_eq!(StorageScope::Session.other(), StorageScope::Durable);
        assert_eq!(StorageScope::Durable.other(), StorageScope::Session);
    }

    #[test]
    fn test_keyless_event_concerns_every_key() {
        let mut e = event(Uuid::new_v4(), "jwt_token");
        assert!(e.concerns("jwt_token"));
        assert!(!e.concerns("theme"));
        e.key = None;
        assert!(e.concerns("theme"));
    }

    #[tokio::test]
    async fn test_subscription_skips_own_events() {
        let (sender, receiver) = broadcast::channel(8);
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut subscription = StorageSubscription::new(receiver, me);

        sender.send(event(me, "a")).unwrap();
        sender.send(event(other, "b")).unwrap();

        let received = subscription.recv().await.unwrap();
        assert_eq!(received.key.as_deref(), Some("b"));
        assert!(subscription.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscription_reports_resync() {
        let (sender, receiver) = broadcast::channel(2);
        let mut subscription = StorageSubscription::new(receiver, Uuid::new_v4());
        let other = Uuid::new_v4();

        for key in ["a", "b", "c", "d"] {
            sender.send(event(other, key)).unwrap();
        }
        let resync = subscription.try_recv().unwrap();
        assert_eq!(resync, StorageEvent::resync());
        assert!(resync.concerns("jwt_token"));
        assert_eq!(subscription.try_recv().unwrap().key.as_deref(), Some("c"));

        for key in ["e", "f", "g"] {
            sender.send(event(other, key)).unwrap();
        }
        assert_eq!(subscription.recv().await.unwrap(), StorageEvent::resync());
        assert_eq!(subscription.recv().await.unwrap().key.as_deref(), Some("f"));
    }
}
