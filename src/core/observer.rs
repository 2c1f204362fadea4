//! Observer capability and the shared handle the center stores.

use crate::core::value::NotificationValue;
use std::fmt;
use std::sync::Arc;

/// Trait for receiving notifications.
///
/// Implementors are invoked on the UI thread, once per matching subscription.
/// Closures with the signature `Fn(&str, &[NotificationValue])` implement it too.
pub trait NotificationObserver: Send + Sync {
    /// Handle a delivered notification.
    ///
    /// # Arguments
    /// * `name` - The notification name the observer subscribed to
    /// * `payload` - The values passed to `publish`, possibly empty
    fn received_notification(&self, name: &str, payload: &[NotificationValue]);
}

impl<F> NotificationObserver for F
where
    F: Fn(&str, &[NotificationValue]) + Send + Sync,
{
    fn received_notification(&self, name: &str, payload: &[NotificationValue]) {
        self(name, payload)
    }
}

/// Shared reference to an observer.
///
/// Two handles are equal when they point at the same observer instance,
/// so cloning a handle and subscribing twice yields two records for one observer.
#[derive(Clone)]
pub struct ObserverHandle(Arc<dyn NotificationObserver>);

impl ObserverHandle {
    pub fn new<O: NotificationObserver + 'static>(observer: O) -> Self {
        Self(Arc::new(observer))
    }

    /// Create a handle from a closure.
    pub fn from_fn<F>(callback: F) -> Self
    where
        F: Fn(&str, &[NotificationValue]) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    pub fn from_arc(observer: Arc<dyn NotificationObserver>) -> Self {
        Self(observer)
    }

    pub(crate) fn notify(&self, name: &str, payload: &[NotificationValue]) {
        self.0.received_notification(name, payload);
    }

    /// Whether both handles refer to the same observer.
    pub fn same_observer(&self, other: &ObserverHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<O: NotificationObserver + 'static> From<Arc<O>> for ObserverHandle {
    fn from(observer: Arc<O>) -> Self {
        Self(observer)
    }
}

impl PartialEq for ObserverHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_observer(other)
    }
}

impl Eq for ObserverHandle {}

impl fmt::Debug for ObserverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObserverHandle({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}
