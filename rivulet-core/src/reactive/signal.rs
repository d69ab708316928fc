//! Signal Implementation
//!
//! A Signal is the single-value reactive cell. It holds a value and tracks
//! which computations read it.
//!
//! # How Signals Work
//!
//! 1. When a signal is read during a tracked run, the running computation
//!    is registered as an observer (once).
//!
//! 2. When the signal is written, the new value is stored first and then
//!    every observer is re-run, in the order they subscribed.
//!
//! 3. Writes are not compared against the old value. Setting the same value
//!    twice notifies twice.
//!
//! # Handles
//!
//! `Signal<T>` is a cheap handle around shared state; clones read and write
//! the same value. [`create_signal`] splits one into a [`ReadSignal`] and a
//! [`WriteSignal`] for callers that want to hand out only one capability.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;

use super::observers::ObserverList;
use crate::error::NotifyError;

struct SignalInner<T> {
    value: RwLock<T>,
    observers: ObserverList,
}

/// A reactive cell holding a value of type `T`.
///
/// # Example
///
/// ```rust
/// use rivulet_core::reactive::{Effect, Signal};
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let count = Signal::new(0);
/// let seen = Arc::new(AtomicI32::new(-1));
///
/// let _effect = Effect::new({
///     let count = count.clone();
///     let seen = seen.clone();
///     move || seen.store(count.get(), Ordering::SeqCst)
/// });
///
/// count.set(5);
/// assert_eq!(seen.load(Ordering::SeqCst), 5);
/// ```
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Signal<T> {
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                value: RwLock::new(value),
                observers: ObserverList::new(),
            }),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.observers.cell_id()
    }

    /// Borrow the current value, registering the active computation.
    ///
    /// The value stays read-locked while `f` runs, so `f` must not write
    /// this signal.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.observers.track();
        f(&*self.inner.value.read())
    }

    /// Borrow the current value without registering a dependency.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.value.read())
    }

    /// Set a new value and notify observers.
    ///
    /// Every observer re-runs before this returns. What happens when one of
    /// them panics depends on the thread's
    /// [`FailurePolicy`](crate::config::FailurePolicy).
    pub fn set(&self, value: T) {
        self.replace(value);
        self.inner.observers.notify();
    }

    /// Set a new value and notify every observer, collecting panics
    /// instead of propagating them.
    pub fn try_set(&self, value: T) -> Result<(), NotifyError> {
        self.replace(value);
        self.inner.observers.notify_isolated()
    }

    /// Update the value using a function of the current value.
    ///
    /// The value stays read-locked while `f` runs, so `f` must not write
    /// this signal. Observers are notified after the lock is released.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = f(&*self.inner.value.read());
        self.set(new_value);
    }

    /// Get the number of observers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// Split into read and write handles over the same state.
    pub fn split(self) -> (ReadSignal<T>, WriteSignal<T>) {
        (
            ReadSignal {
                signal: self.clone(),
            },
            WriteSignal { signal: self },
        )
    }

    fn replace(&self, value: T) {
        *self.inner.value.write() = value;
    }
}

impl<T: Clone> Signal<T> {
    /// Get the current value.
    ///
    /// If called during a tracked run, this also registers the running
    /// computation as an observer.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Get the current value without tracking dependencies.
    pub fn get_untracked(&self) -> T {
        self.inner.value.read().clone()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Debug> Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id())
            .field("value", &*self.inner.value.read())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

/// The read half of a [`Signal`].
pub struct ReadSignal<T> {
    signal: Signal<T>,
}

impl<T> ReadSignal<T> {
    /// Get the underlying signal's unique ID.
    pub fn id(&self) -> u64 {
        self.signal.id()
    }

    /// Tracked borrow of the value. See [`Signal::with`].
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.signal.with(f)
    }

    /// Get the number of observers.
    pub fn subscriber_count(&self) -> usize {
        self.signal.subscriber_count()
    }
}

impl<T: Clone> ReadSignal<T> {
    /// Tracked read. See [`Signal::get`].
    pub fn get(&self) -> T {
        self.signal.get()
    }

    /// Read without registering a dependency.
    pub fn get_untracked(&self) -> T {
        self.signal.get_untracked()
    }
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
        }
    }
}

impl<T: Debug> Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ReadSignal").field(&self.signal).finish()
    }
}

/// The write half of a [`Signal`].
pub struct WriteSignal<T> {
    signal: Signal<T>,
}

impl<T> WriteSignal<T> {
    /// Get the underlying signal's unique ID.
    pub fn id(&self) -> u64 {
        self.signal.id()
    }

    /// Store `value` and notify observers. See [`Signal::set`].
    pub fn set(&self, value: T) {
        self.signal.set(value);
    }

    /// Store `value`, collecting observer panics. See [`Signal::try_set`].
    pub fn try_set(&self, value: T) -> Result<(), NotifyError> {
        self.signal.try_set(value)
    }

    /// Replace the value with `f(current)`. See [`Signal::update`].
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        self.signal.update(f);
    }
}

impl<T> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
        }
    }
}

impl<T: Debug> Debug for WriteSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("WriteSignal").field(&self.signal).finish()
    }
}

/// Create a signal and return its read and write halves.
pub fn create_signal<T>(initial: T) -> (ReadSignal<T>, WriteSignal<T>) {
    Signal::new(initial).split()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
