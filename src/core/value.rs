//! Payload values carried by notifications.
//!
//! A notification payload is an ordered, possibly empty sequence of
//! [`NotificationValue`]s. The notification center never looks inside a
//! payload; it only hands the same sequence to every observer.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A single payload entry.
///
/// Common scalar types get their own variant so observers can match on them
/// directly. Anything else travels as [`NotificationValue::Opaque`].
#[derive(Clone)]
pub enum NotificationValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Arbitrary shared value; compared by reference identity.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl NotificationValue {
    /// Wrap an arbitrary value as an opaque payload entry.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        NotificationValue::Opaque(Arc::new(value))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NotificationValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            NotificationValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            NotificationValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NotificationValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow an opaque entry as `T`, if it holds one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            NotificationValue::Opaque(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NotificationValue::Null)
    }
}

impl PartialEq for NotificationValue {
    fn eq(&self, other: &Self) -> bool {
        use NotificationValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Opaque(a), Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for NotificationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationValue::Null => write!(f, "Null"),
            NotificationValue::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            NotificationValue::Int(value) => f.debug_tuple("Int").field(value).finish(),
            NotificationValue::Float(value) => f.debug_tuple("Float").field(value).finish(),
            NotificationValue::Text(value) => f.debug_tuple("Text").field(value).finish(),
            NotificationValue::Opaque(_) => write!(f, "Opaque(..)"),
        }
    }
}

impl From<bool> for NotificationValue {
    fn from(value: bool) -> Self {
        NotificationValue::Bool(value)
    }
}

impl From<i32> for NotificationValue {
    fn from(value: i32) -> Self {
        NotificationValue::Int(value.into())
    }
}

impl From<i64> for NotificationValue {
    fn from(value: i64) -> Self {
        NotificationValue::Int(value)
    }
}

impl From<u32> for NotificationValue {
    fn from(value: u32) -> Self {
        NotificationValue::Int(value.into())
    }
}

impl From<f64> for NotificationValue {
    fn from(value: f64) -> Self {
        NotificationValue::Float(value)
    }
}

impl From<&str> for NotificationValue {
    fn from(value: &str) -> Self {
        NotificationValue::Text(value.to_string())
    }
}

impl From<String> for NotificationValue {
    fn from(value: String) -> Self {
        NotificationValue::Text(value)
    }
}

impl<T: Into<NotificationValue>> From<Option<T>> for NotificationValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(NotificationValue::Null, Into::into)
    }
}

/// Build a payload vector from heterogeneous values.
///
/// ```
/// use viewmodel_notify::{payload, NotificationValue};
///
/// let values = payload!["alice", 42, true];
/// assert_eq!(values[1], NotificationValue::Int(42));
/// ```
#[macro_export]
macro_rules! payload {
    () => {
        ::std::vec::Vec::<$crate::NotificationValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::NotificationValue::from($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Contact {
        id: u32,
        name: String,
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(NotificationValue::from(true).as_bool(), Some(true));
        assert_eq!(NotificationValue::from(7i32).as_int(), Some(7));
        assert_eq!(NotificationValue::from(2.5).as_float(), Some(2.5));
        assert_eq!(NotificationValue::from("test").as_text(), Some("test"));
        assert!(NotificationValue::from(None::<i64>).is_null());
        assert_eq!(NotificationValue::from(Some(3i64)), NotificationValue::Int(3));
    }

    #[test]
    fn test_accessors_reject_other_variants() {
        let value = NotificationValue::Text("42".to_string());
        assert_eq!(value.as_int(), None);
        assert_eq!(value.as_bool(), None);
        assert!(value.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_opaque_downcast_and_identity() {
        let contact = NotificationValue::opaque(Contact {
            id: 1,
            name: "Ada".to_string(),
        });
        let same = contact.clone();
        let other = NotificationValue::opaque(Contact {
            id: 1,
            name: "Ada".to_string(),
        });

        assert_eq!(contact.downcast_ref::<Contact>().map(|c| c.id), Some(1));
        assert!(contact.downcast_ref::<u32>().is_none());
        assert_eq!(contact, same);
        assert_ne!(contact, other);
        assert_eq!(format!("{:?}", contact), "Opaque(..)");
    }

    #[test]
    fn test_payload_macro() {
        let empty = payload![];
        assert!(empty.is_empty());

        let values = payload!["test", 1, false];
        assert_eq!(
            values,
            vec![
                NotificationValue::Text("test".to_string()),
                NotificationValue::Int(1),
                NotificationValue::Bool(false),
            ]
        );
    }
}
