//! Store Implementation
//!
//! A Store is the property-bag reactive cell: a keyed collection behind one
//! observer list.
//!
//! # Granularity
//!
//! Observers are tracked for the whole bag, not per key. A computation that
//! reads key `a` is re-run when key `b` is written. Reads of the bag's shape
//! ([`Store::keys`], [`Store::len`], [`Store::contains_key`]) subscribe the
//! same way.
//!
//! Writes replace entries in place; the store's identity and key order are
//! stable for its lifetime. New keys are appended at the end.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::{Equivalent, IndexMap};
use parking_lot::RwLock;

use super::observers::ObserverList;
use crate::error::NotifyError;

struct StoreInner<K, V> {
    backing: RwLock<IndexMap<K, V>>,
    observers: ObserverList,
}

/// A reactive property bag mapping keys of type `K` to values of type `V`.
///
/// # Example
///
/// ```rust
/// use rivulet_core::reactive::{Effect, Store};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let profiles = Store::new([("one", "ada"), ("two", "grace")]);
/// let renders = Arc::new(AtomicUsize::new(0));
///
/// let _effect = Effect::new({
///     let profiles = profiles.clone();
///     let renders = renders.clone();
///     move || {
///         profiles.get("one");
///         renders.fetch_add(1, Ordering::SeqCst);
///     }
/// });
///
/// // Writing a different key still re-runs the effect.
/// profiles.set("two", "hopper");
/// assert_eq!(renders.load(Ordering::SeqCst), 2);
/// ```
pub struct Store<K, V> {
    inner: Arc<StoreInner<K, V>>,
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq,
{
    /// Create a store from an initial set of entries.
    pub fn new(initial: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                backing: RwLock::new(initial.into_iter().collect()),
                observers: ObserverList::new(),
            }),
        }
    }

    /// Get the store's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.observers.cell_id()
    }

    /// Borrow the entry for `key`, registering the active computation.
    ///
    /// The bag stays read-locked while `f` runs, so `f` must not write this
    /// store.
    pub fn with<Q, R>(&self, key: &Q, f: impl FnOnce(Option<&V>) -> R) -> R
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.inner.observers.track();
        f(self.inner.backing.read().get(key))
    }

    /// Whether `key` is present. Subscribes like any other read.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.inner.observers.track();
        self.inner.backing.read().contains_key(key)
    }

    /// Number of entries. Subscribes like any other read.
    pub fn len(&self) -> usize {
        self.inner.observers.track();
        self.inner.backing.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write `value` under `key` and notify observers.
    ///
    /// Returns the value previously stored under `key`. Observers are
    /// notified whichever key is written and whether or not it existed.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        let previous = self.insert(key, value);
        self.inner.observers.notify();
        previous
    }

    /// Like [`Store::set`], but every observer is notified and panics are
    /// collected instead of propagated.
    pub fn try_set(&self, key: K, value: V) -> Result<Option<V>, NotifyError> {
        let previous = self.insert(key, value);
        self.inner.observers.notify_isolated().map(|()| previous)
    }

    /// Get the number of observers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.observers.len()
    }

    fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.backing.write().insert(key, value)
    }
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Get the value for `key`.
    ///
    /// If called during a tracked run, this registers the running
    /// computation as an observer of the whole store, whichever key is read.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.with(key, |value| value.cloned())
    }

    /// Get the value for `key` without tracking dependencies.
    pub fn get_untracked<Q>(&self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.inner.backing.read().get(key).cloned()
    }

    /// Apply `f` to the entry for `key` and notify observers.
    ///
    /// `f` works on a copy taken without holding the store's lock, so it may
    /// read this store. The result replaces the entry in place afterwards;
    /// a write to the same key made from inside `f` is overwritten.
    ///
    /// Returns `false`, without notifying, if `key` is absent.
    pub fn update<Q>(&self, key: &Q, f: impl FnOnce(&mut V)) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let Some(mut value) = self.get_untracked(key) else {
            return false;
        };
        f(&mut value);

        if let Some(slot) = self.inner.backing.write().get_mut(key) {
            *slot = value;
        }
        self.inner.observers.notify();
        true
    }
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Keys in insertion order. Subscribes like any other read.
    pub fn keys(&self) -> Vec<K> {
        self.inner.observers.track();
        self.inner.backing.read().keys().cloned().collect()
    }
}

impl<K, V> Clone for Store<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Debug, V: Debug> Debug for Store<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.observers.cell_id())
            .field("backing", &*self.inner.backing.read())
            .field("subscriber_count", &self.inner.observers.len())
            .finish()
    }
}

/// Create a store from an initial set of entries.
pub fn create_store<K, V>(initial: impl IntoIterator<Item = (K, V)>) -> Store<K, V>
where
    K: Hash + Eq,
{
    Store::new(initial)
}
