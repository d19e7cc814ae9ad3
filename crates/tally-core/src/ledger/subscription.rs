//! Change-notification subscriptions for ledger snapshots.
//!
//! Each notification carries a full replacement snapshot, never a delta.
//! Dispatch happens under the registry lock, so callbacks for one subject
//! are serialized.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use uuid::Uuid;

use crate::model::{ActivitySnapshot, SubjectId};

type Callback = Box<dyn Fn(&ActivitySnapshot) + Send + Sync>;
type Registry = Mutex<HashMap<SubjectId, HashMap<Uuid, Callback>>>;

/// Registry shared between the ledger and live subscription handles.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    inner: Arc<Registry>,
}

impl SubscriberRegistry {
    pub(crate) fn add(&self, subject: SubjectId, callback: Callback) -> Subscription {
        let id = Uuid::new_v4();
        self.inner
            .lock()
            .unwrap()
            .entry(subject.clone())
            .or_default()
            .insert(id, callback);
        Subscription {
            id,
            subject,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver one snapshot to every subscriber of `subject`. The registry
    /// lock is held for the whole dispatch, so no two callbacks run at the
    /// same time.
    pub(crate) fn dispatch(&self, subject: &SubjectId, snapshot: &ActivitySnapshot) {
        let guard = self.inner.lock().unwrap();
        if let Some(subscribers) = guard.get(subject) {
            for callback in subscribers.values() {
                callback(snapshot);
            }
        }
    }

    pub(crate) fn has_subscribers(&self, subject: &SubjectId) -> bool {
        self.inner
            .lock()
            .unwrap()
            .get(subject)
            .is_some_and(|subs| !subs.is_empty())
    }
}

/// Handle for an active ledger subscription.
///
/// Dropping the handle unsubscribes; [`Subscription::unsubscribe`] does the
/// same explicitly.
pub struct Subscription {
    id: Uuid,
    subject: SubjectId,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Stop receiving notifications.
    pub fn unsubscribe(self) {
        // Drop does the removal.
    }

    fn remove(&self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut guard = registry.lock().unwrap();
            if let Some(subscribers) = guard.get_mut(&self.subject) {
                subscribers.remove(&self.id);
                if subscribers.is_empty() {
                    guard.remove(&self.subject);
                }
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}
