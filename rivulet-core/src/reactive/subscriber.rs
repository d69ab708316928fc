//! Subscriber types for the reactive system.
//!
//! A [`Computation`] is any unit of work that may read reactive cells:
//! effects, render functions, or plain closures handed to
//! [`Runtime::run_tracked`](super::Runtime::run_tracked).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Unique identifier for a subscriber.
///
/// Each computation gets a unique ID when created. Cells compare observers
/// by this ID, so two clones of the same [`Computation`] count as one
/// observer while two computations wrapping identical closures do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A handle to a zero-argument unit of work.
///
/// The engine never inspects what a computation does; it only stores the
/// handle in observer lists and invokes it. Cloning is cheap and keeps the
/// same [`SubscriberId`].
#[derive(Clone)]
pub struct Computation {
    id: SubscriberId,
    run: Arc<dyn Fn() + Send + Sync>,
}

impl Computation {
    /// Wrap a closure in a new computation with a fresh identity.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            id: SubscriberId::new(),
            run: Arc::new(run),
        }
    }

    /// Get the computation's unique ID.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Invoke the closure directly, outside of any tracking frame.
    ///
    /// Reads performed during this call are attributed to whatever
    /// computation is currently active, if any. Use
    /// [`Runtime::run_tracked`](super::Runtime::run_tracked) to make this
    /// computation the active one.
    pub fn invoke(&self) {
        (self.run)();
    }

    /// Whether two handles refer to the same computation.
    pub fn same(&self, other: &Computation) -> bool {
        self.id == other.id
    }
}

impl PartialEq for Computation {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Computation {}

impl fmt::Debug for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computation").field("id", &self.id).finish()
    }
}
