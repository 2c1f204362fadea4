//! Core module for notification-based communication
//!
//! ViewModels publish named notifications; Views subscribe observers to them.
//! The center never holds references between the two sides, and every
//! observer callback runs on the UI thread through a [`UiDispatcher`].

pub mod center;
pub mod dispatcher;
pub mod error;
pub mod observer;
pub mod owner;
mod registry;
pub mod value;
pub mod view_model;

// Re-exports for convenience
pub use center::{DefaultNotificationCenter, NotificationCenter};
pub use dispatcher::{CurrentThreadDispatcher, UiDispatcher, UiTask, UiThread};
pub use error::{NotificationError, Result};
pub use observer::{NotificationObserver, ObserverHandle};
pub use owner::OwnerId;
pub use value::NotificationValue;
pub use view_model::ViewModelScope;
