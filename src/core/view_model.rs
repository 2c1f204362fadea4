//! Owner scope a ViewModel embeds to publish and subscribe under its own identity.

use crate::core::center::NotificationCenter;
use crate::core::error::Result;
use crate::core::observer::ObserverHandle;
use crate::core::owner::OwnerId;
use crate::core::value::NotificationValue;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Subscriptions and publications of one ViewModel.
///
/// Everything subscribed through the scope is registered under its
/// [`OwnerId`]. Call [`close`](Self::close) from the ViewModel's teardown to
/// release all of them at once; dropping the scope closes it as well.
pub struct ViewModelScope {
    owner: OwnerId,
    center: Arc<dyn NotificationCenter>,
    closed: AtomicBool,
}

impl ViewModelScope {
    pub fn new(center: Arc<dyn NotificationCenter>) -> Self {
        Self {
            owner: OwnerId::new(),
            center,
            closed: AtomicBool::new(false),
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn center(&self) -> &Arc<dyn NotificationCenter> {
        &self.center
    }

    pub fn subscribe(&self, name: &str, observer: ObserverHandle) -> Result<()> {
        if self.is_closed() {
            log::warn!("Subscribing to '{}' through closed scope {}", name, self.owner);
        }
        self.center.subscribe_scoped(self.owner, name, observer)
    }

    pub fn unsubscribe(&self, name: &str, observer: &ObserverHandle) {
        self.center.unsubscribe_scoped(self.owner, name, observer);
    }

    pub fn publish(&self, name: &str, payload: Vec<NotificationValue>) -> Result<()> {
        self.center.publish_scoped(self.owner, name, payload)
    }

    /// Release every subscription made through this scope. Idempotent.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            log::debug!("Closing view model scope {}", self.owner);
            self.center.unsubscribe_owner(self.owner);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Drop for ViewModelScope {
    fn drop(&mut self) {
        self.close();
    }
}
