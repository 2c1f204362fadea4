//! Test support: an observer that records everything it receives.

use crate::core::{NotificationObserver, NotificationValue, ObserverHandle};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::ThreadId;

#[derive(Debug, Clone)]
struct ReceivedNotification {
    name: String,
    payload: Vec<NotificationValue>,
    thread_id: ThreadId,
}

#[derive(Default)]
struct Recorder {
    received: Mutex<Vec<ReceivedNotification>>,
}

impl Recorder {
    fn received(&self) -> MutexGuard<'_, Vec<ReceivedNotification>> {
        self.received.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationObserver for Recorder {
    fn received_notification(&self, name: &str, payload: &[NotificationValue]) {
        self.received().push(ReceivedNotification {
            name: name.to_string(),
            payload: payload.to_vec(),
            thread_id: std::thread::current().id(),
        });
    }
}

/// Records every notification delivered to it.
///
/// Clones share the same recording, and [`handle`](Self::handle) always returns
/// a handle to the same observer, so it can be used for unsubscribing too.
#[derive(Clone, Default)]
pub struct NotificationTestHelper {
    recorder: Arc<Recorder>,
}

impl NotificationTestHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to subscribe (or unsubscribe) this helper.
    pub fn handle(&self) -> ObserverHandle {
        ObserverHandle::from(self.recorder.clone())
    }

    pub fn number_of_received_notifications(&self) -> usize {
        self.recorder.received().len()
    }

    /// All received `(name, payload)` pairs in delivery order.
    pub fn received(&self) -> Vec<(String, Vec<NotificationValue>)> {
        self.recorder
            .received()
            .iter()
            .map(|n| (n.name.clone(), n.payload.clone()))
            .collect()
    }

    pub fn last(&self) -> Option<(String, Vec<NotificationValue>)> {
        self.recorder
            .received()
            .last()
            .map(|n| (n.name.clone(), n.payload.clone()))
    }

    /// Whether at least one notification was received and all of them ran on `thread_id`.
    pub fn received_on_thread(&self, thread_id: ThreadId) -> bool {
        let received = self.recorder.received();
        !received.is_empty() && received.iter().all(|n| n.thread_id == thread_id)
    }

    pub fn clear(&self) {
        self.recorder.received().clear();
    }
}
