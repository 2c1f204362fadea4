//! Error type shared by the notification center and the UI dispatchers.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification name must not be empty")]
    EmptyName,
    #[error("UI dispatcher is closed")]
    DispatcherClosed,
    #[error("operation must be called from the UI thread")]
    NotUiThread,
    #[error("UI thread did not become idle within {0:?}")]
    Timeout(Duration),
    #[error("failed to start UI thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NotificationError>;
