//! Notification center: the publish/subscribe contract and its default implementation.

use crate::core::dispatcher::{panic_message, UiDispatcher};
use crate::core::error::{NotificationError, Result};
use crate::core::observer::ObserverHandle;
use crate::core::owner::OwnerId;
use crate::core::registry::Registry;
use crate::core::value::NotificationValue;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Publish/subscribe contract between ViewModels and Views.
///
/// Subscriptions are additive: subscribing the same observer twice to one name
/// creates two records, and each publish invokes it twice. Removing something
/// that was never subscribed is a no-op.
pub trait NotificationCenter: Send + Sync {
    /// Subscribe `observer` to `name`.
    fn subscribe(&self, name: &str, observer: ObserverHandle) -> Result<()>;

    /// Subscribe `observer` to `name` on behalf of `owner`, so the subscription
    /// is removed by [`unsubscribe_owner`](Self::unsubscribe_owner).
    fn subscribe_scoped(&self, owner: OwnerId, name: &str, observer: ObserverHandle)
        -> Result<()>;

    /// Remove every subscription of `observer`, under any name.
    fn unsubscribe(&self, observer: &ObserverHandle);

    /// Remove every subscription of `observer` to `name`.
    fn unsubscribe_from(&self, name: &str, observer: &ObserverHandle);

    /// Remove the subscriptions of `observer` to `name` made on behalf of `owner`.
    fn unsubscribe_scoped(&self, owner: OwnerId, name: &str, observer: &ObserverHandle);

    /// Remove every subscription made on behalf of `owner`.
    fn unsubscribe_owner(&self, owner: OwnerId);

    /// Notify every observer currently subscribed to `name`.
    ///
    /// Delivery happens on the UI thread. From the UI thread it completes before
    /// this returns; from any other thread this returns without waiting.
    ///
    /// Each subscription record is dispatched separately. If the dispatcher
    /// rejects one (for example [`NotificationError::DispatcherClosed`]), the
    /// error is returned and later records are skipped, but deliveries queued
    /// before the failure still run. Retrying the publish can therefore notify
    /// those earlier observers a second time.
    fn publish(&self, name: &str, payload: Vec<NotificationValue>) -> Result<()>;

    /// Publish on behalf of `owner`.
    ///
    /// Owner-scoped and global subscriptions share one list per name, so this
    /// reaches the same observers as [`publish`](Self::publish).
    fn publish_scoped(
        &self,
        owner: OwnerId,
        name: &str,
        payload: Vec<NotificationValue>,
    ) -> Result<()>;

    /// Publish `name` without a payload.
    fn signal(&self, name: &str) -> Result<()> {
        self.publish(name, Vec::new())
    }
}

/// Default [`NotificationCenter`]: a mutex-guarded registry plus a UI dispatcher.
pub struct DefaultNotificationCenter {
    registry: Mutex<Registry>,
    dispatcher: Arc<dyn UiDispatcher>,
}

impl DefaultNotificationCenter {
    pub fn new(dispatcher: Arc<dyn UiDispatcher>) -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
            dispatcher,
        }
    }

    /// The dispatcher deliveries are routed through.
    pub fn dispatcher(&self) -> &Arc<dyn UiDispatcher> {
        &self.dispatcher
    }

    /// Number of subscription records for `name`.
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.registry().subscriber_count(name)
    }

    /// Number of subscription records made on behalf of `owner`.
    pub fn owned_subscription_count(&self, owner: OwnerId) -> usize {
        self.registry().owned_count(owner)
    }

    /// Names with at least one subscriber, sorted.
    pub fn notification_names(&self) -> Vec<String> {
        self.registry().names()
    }

    pub fn has_subscriptions(&self) -> bool {
        !self.registry().is_empty()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, owner: Option<OwnerId>, name: &str, observer: ObserverHandle) -> Result<()> {
        if name.is_empty() {
            return Err(NotificationError::EmptyName);
        }
        let count = {
            let mut registry = self.registry();
            registry.insert(name, observer, owner);
            registry.subscriber_count(name)
        };
        log::debug!(
            "Subscribed observer to '{}' ({} subscriptions){}",
            name,
            count,
            owner.map(|o| format!(" for {}", o)).unwrap_or_default()
        );
        Ok(())
    }

    fn deliver(&self, name: &str, payload: Vec<NotificationValue>) -> Result<()> {
        if name.is_empty() {
            return Err(NotificationError::EmptyName);
        }

        let observers = self.registry().snapshot(name);
        log::trace!("Publishing '{}' to {} observers", name, observers.len());
        if observers.is_empty() {
            return Ok(());
        }

        let name: Arc<str> = Arc::from(name);
        let payload: Arc<[NotificationValue]> = payload.into();

        for (i, observer) in observers.into_iter().enumerate() {
            let name = name.clone();
            let payload = payload.clone();
            self.dispatcher.run_on_ui_thread(Box::new(move || {
                log::trace!("Delivering '{}' to observer {}", name, i);
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    observer.notify(&name, &payload);
                }));
                if let Err(panic) = result {
                    log::error!(
                        "Observer {} panicked while handling '{}': {}",
                        i,
                        name,
                        panic_message(&panic)
                    );
                }
            }))?;
        }
        Ok(())
    }
}

impl NotificationCenter for DefaultNotificationCenter {
    fn subscribe(&self, name: &str, observer: ObserverHandle) -> Result<()> {
        self.insert(None, name, observer)
    }

    fn subscribe_scoped(
        &self,
        owner: OwnerId,
        name: &str,
        observer: ObserverHandle,
    ) -> Result<()> {
        self.insert(Some(owner), name, observer)
    }

    fn unsubscribe(&self, observer: &ObserverHandle) {
        let removed = self.registry().remove_observer(observer);
        log::debug!("Unsubscribed observer from all names ({} removed)", removed.len());
    }

    fn unsubscribe_from(&self, name: &str, observer: &ObserverHandle) {
        let removed = self.registry().remove_named(name, observer);
        log::debug!("Unsubscribed observer from '{}' ({} removed)", name, removed.len());
    }

    fn unsubscribe_scoped(&self, owner: OwnerId, name: &str, observer: &ObserverHandle) {
        let removed = self.registry().remove_owned(owner, name, observer);
        log::debug!(
            "Unsubscribed observer from '{}' for {} ({} removed)",
            name,
            owner,
            removed.len()
        );
    }

    fn unsubscribe_owner(&self, owner: OwnerId) {
        let removed = self.registry().remove_owner(owner);
        log::debug!("Released {} subscriptions of {}", removed.len(), owner);
    }

    fn publish(&self, name: &str, payload: Vec<NotificationValue>) -> Result<()> {
        self.deliver(name, payload)
    }

    fn publish_scoped(
        &self,
        owner: OwnerId,
        name: &str,
        payload: Vec<NotificationValue>,
    ) -> Result<()> {
        log::trace!("Publishing '{}' for {}", name, owner);
        self.deliver(name, payload)
    }
}
