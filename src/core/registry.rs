//! Subscription registry.
//!
//! Records are kept per notification name in insertion order, with a secondary
//! index from owner to the records it created. The registry itself is not
//! synchronised; [`DefaultNotificationCenter`](crate::core::DefaultNotificationCenter)
//! keeps it behind a mutex.
//!
//! Removal methods hand the removed records back to the caller so observers are
//! dropped after the lock is released.

use crate::core::observer::ObserverHandle;
use crate::core::owner::OwnerId;
use std::collections::HashMap;
use std::sync::Arc;

type SubscriptionId = u64;

/// One subscription of an observer to a name.
#[derive(Debug, Clone)]
pub(crate) struct Subscription {
    id: SubscriptionId,
    observer: ObserverHandle,
    owner: Option<OwnerId>,
}

impl Subscription {
    fn matches(&self, observer: &ObserverHandle) -> bool {
        self.observer.same_observer(observer)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    next_id: SubscriptionId,
    by_name: HashMap<Arc<str>, Vec<Subscription>>,
    by_owner: HashMap<OwnerId, Vec<(Arc<str>, SubscriptionId)>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record for `observer` under `name`.
    pub fn insert(&mut self, name: &str, observer: ObserverHandle, owner: Option<OwnerId>) {
        let id = self.next_id;
        self.next_id += 1;

        let key = match self.by_name.get_key_value(name) {
            Some((key, _)) => key.clone(),
            None => Arc::from(name),
        };

        if let Some(owner) = owner {
            self.by_owner
                .entry(owner)
                .or_default()
                .push((key.clone(), id));
        }

        self.by_name
            .entry(key)
            .or_default()
            .push(Subscription { id, observer, owner });
    }

    /// Observers currently subscribed to `name`, in subscription order.
    pub fn snapshot(&self, name: &str) -> Vec<ObserverHandle> {
        self.by_name
            .get(name)
            .map(|records| records.iter().map(|r| r.observer.clone()).collect())
            .unwrap_or_default()
    }

    /// Remove every record of `observer`, under any name.
    pub fn remove_observer(&mut self, observer: &ObserverHandle) -> Vec<Subscription> {
        let names: Vec<Arc<str>> = self.by_name.keys().cloned().collect();
        let mut removed = Vec::new();
        for name in names {
            removed.extend(self.remove_matching(&name, |r| r.matches(observer)));
        }
        self.forget_owned(&removed);
        removed
    }

    /// Remove every record of `observer` under `name`.
    pub fn remove_named(&mut self, name: &str, observer: &ObserverHandle) -> Vec<Subscription> {
        let removed = self.remove_matching(name, |r| r.matches(observer));
        self.forget_owned(&removed);
        removed
    }

    /// Remove the records of `observer` under `name` that `owner` created.
    pub fn remove_owned(
        &mut self,
        owner: OwnerId,
        name: &str,
        observer: &ObserverHandle,
    ) -> Vec<Subscription> {
        let removed = self.remove_matching(name, |r| r.owner == Some(owner) && r.matches(observer));
        self.forget_owned(&removed);
        removed
    }

    /// Remove every record `owner` created.
    pub fn remove_owner(&mut self, owner: OwnerId) -> Vec<Subscription> {
        let Some(entries) = self.by_owner.remove(&owner) else {
            return Vec::new();
        };

        let mut removed = Vec::with_capacity(entries.len());
        for (name, id) in entries {
            removed.extend(self.remove_matching(&name, |r| r.id == id));
        }
        removed
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.by_name.get(name).map_or(0, Vec::len)
    }

    pub fn owned_count(&self, owner: OwnerId) -> usize {
        self.by_owner.get(&owner).map_or(0, Vec::len)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().map(|k| k.to_string()).collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn remove_matching<P>(&mut self, name: &str, predicate: P) -> Vec<Subscription>
    where
        P: Fn(&Subscription) -> bool,
    {
        let Some(records) = self.by_name.get_mut(name) else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(records.len());
        for record in records.drain(..) {
            if predicate(&record) {
                removed.push(record);
            } else {
                kept.push(record);
            }
        }
        *records = kept;

        if records.is_empty() {
            self.by_name.remove(name);
        }
        removed
    }

    /// Drop owner index entries that point at removed records.
    fn forget_owned(&mut self, removed: &[Subscription]) {
        for record in removed {
            let Some(owner) = record.owner else {
                continue;
            };
            if let Some(entries) = self.by_owner.get_mut(&owner) {
                entries.retain(|(_, id)| *id != record.id);
                if entries.is_empty() {
                    self.by_owner.remove(&owner);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observer() -> ObserverHandle {
        ObserverHandle::from_fn(|_, _| {})
    }

    #[test]
    fn test_insert_is_additive_and_ordered() {
        let mut registry = Registry::new();
        let a = observer();
        let b = observer();

        registry.insert("test", a.clone(), None);
        registry.insert("test", b.clone(), None);
        registry.insert("test", a.clone(), None);

        assert_eq!(registry.subscriber_count("test"), 3);
        assert_eq!(registry.snapshot("test"), vec![a.clone(), b, a]);
        assert!(registry.snapshot("other").is_empty());
    }

    #[test]
    fn test_remove_observer_across_names() {
        let mut registry = Registry::new();
        let a = observer();
        let b = observer();
        registry.insert("one", a.clone(), None);
        registry.insert("two", a.clone(), None);
        registry.insert("two", b.clone(), None);

        let removed = registry.remove_observer(&a);

        assert_eq!(removed.len(), 2);
        assert_eq!(registry.subscriber_count("one"), 0);
        assert_eq!(registry.snapshot("two"), vec![b]);
        assert_eq!(registry.names(), vec!["two".to_string()]);
    }

    #[test]
    fn test_remove_named_removes_all_duplicates() {
        let mut registry = Registry::new();
        let a = observer();
        for _ in 0..3 {
            registry.insert("test", a.clone(), None);
        }
        registry.insert("other", a.clone(), None);

        assert_eq!(registry.remove_named("test", &a).len(), 3);
        assert_eq!(registry.subscriber_count("test"), 0);
        assert_eq!(registry.subscriber_count("other"), 1);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = Registry::new();
        let a = observer();

        assert!(registry.remove_named("test", &a).is_empty());
        assert!(registry.remove_observer(&a).is_empty());
        assert!(registry.remove_owner(OwnerId::new()).is_empty());
        assert!(registry.is_empty());

        registry.insert("test", observer(), None);
        assert!(registry.remove_named("test", &a).is_empty());
        assert_eq!(registry.subscriber_count("test"), 1);
    }

    #[test]
    fn test_remove_owner_only_touches_owned_records() {
        let mut registry = Registry::new();
        let owner = OwnerId::new();
        let other_owner = OwnerId::new();
        let a = observer();
        let b = observer();

        registry.insert("test", a.clone(), Some(owner));
        registry.insert("test", a.clone(), None);
        registry.insert("other", b.clone(), Some(owner));
        registry.insert("other", b.clone(), Some(other_owner));

        assert_eq!(registry.owned_count(owner), 2);
        let removed = registry.remove_owner(owner);

        assert_eq!(removed.len(), 2);
        assert_eq!(registry.owned_count(owner), 0);
        assert_eq!(registry.snapshot("test"), vec![a]);
        assert_eq!(registry.snapshot("other"), vec![b]);
        assert_eq!(registry.owned_count(other_owner), 1);
    }

    #[test]
    fn test_global_removal_cleans_owner_index() {
        let mut registry = Registry::new();
        let owner = OwnerId::new();
        let a = observer();

        registry.insert("test", a.clone(), Some(owner));
        registry.insert("other", a.clone(), Some(owner));
        registry.remove_named("test", &a);
        assert_eq!(registry.owned_count(owner), 1);

        registry.remove_observer(&a);
        assert_eq!(registry.owned_count(owner), 0);
        assert!(registry.remove_owner(owner).is_empty());
    }

    #[test]
    fn test_remove_owned_ignores_other_owners_and_globals() {
        let mut registry = Registry::new();
        let owner = OwnerId::new();
        let a = observer();

        registry.insert("test", a.clone(), Some(owner));
        registry.insert("test", a.clone(), Some(OwnerId::new()));
        registry.insert("test", a.clone(), None);

        assert_eq!(registry.remove_owned(owner, "test", &a).len(), 1);
        assert_eq!(registry.subscriber_count("test"), 2);
        assert_eq!(registry.owned_count(owner), 0);
    }
}
