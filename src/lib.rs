//! viewmodel-notify - notification center for MVVM applications
//!
//! ViewModels and Views communicate through named notifications instead of
//! direct references. Observer callbacks always run on the UI thread, no matter
//! which thread published.
//!
//! ```
//! use std::sync::Arc;
//! use viewmodel_notify::{
//!     payload, CurrentThreadDispatcher, DefaultNotificationCenter, NotificationCenter,
//!     ObserverHandle,
//! };
//!
//! let center = DefaultNotificationCenter::new(Arc::new(CurrentThreadDispatcher::new()));
//! let observer = ObserverHandle::from_fn(|name, payload| {
//!     println!("{} -> {:?}", name, payload);
//! });
//!
//! center.subscribe("contact_added", observer.clone()).unwrap();
//! center.publish("contact_added", payload!["Ada", 1]).unwrap();
//! center.unsubscribe(&observer);
//! ```

pub mod config;
pub mod core;
pub mod testing;

// 公開API
pub use crate::config::UiThreadConfig;
pub use crate::core::*;
pub use crate::testing::NotificationTestHelper;
