//! Observer Lists
//!
//! Both cell flavors share one algorithm: subscribe lazily on read, fan out
//! synchronously on write. `ObserverList` implements it once. It is private
//! to the crate: cells are the only way to subscribe or notify.
//!
//! # Subscription
//!
//! On read, the active computation (if any) is appended unless it is already
//! present. Insertion order is the order in which distinct computations
//! first read the cell, and fan-out follows that order.
//!
//! # Fan-out
//!
//! On write, the list is snapshotted and each observer is re-run through
//! [`Runtime::run_tracked`]. No lock is held while observers run, so they
//! are free to read (and write) the cell that notified them. An observer
//! that writes a cell it observes will recurse without bound; nothing here
//! detects that.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::{debug, error, trace, warn};

use super::runtime::Runtime;
use super::subscriber::{Computation, SubscriberId};
use crate::config::FailurePolicy;
use crate::error::{panic_message, NotifyError, ObserverPanic};

/// Counter for generating unique cell IDs.
static CELL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique cell ID.
fn next_cell_id() -> u64 {
    CELL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Most cells have a handful of observers; snapshots stay on the stack.
type Snapshot = SmallVec<[Computation; 4]>;

/// The ordered, de-duplicated set of computations observing one cell.
pub(crate) struct ObserverList {
    /// ID of the owning cell, used in log output.
    cell: u64,
    observers: RwLock<IndexMap<SubscriberId, Computation>>,
}

impl ObserverList {
    /// Create an empty list for a new cell.
    pub(crate) fn new() -> Self {
        Self {
            cell: next_cell_id(),
            observers: RwLock::new(IndexMap::new()),
        }
    }

    /// ID of the owning cell.
    pub(crate) fn cell_id(&self) -> u64 {
        self.cell
    }

    /// Register the active computation, if there is one and it is not
    /// already registered.
    ///
    /// Returns `true` if a new observer was added.
    pub(crate) fn track(&self) -> bool {
        let Some(current) = Runtime::current() else {
            return false;
        };

        let id = current.id();
        if self.observers.read().contains_key(&id) {
            return false;
        }

        let inserted = self.observers.write().insert(id, current).is_none();
        if inserted {
            trace!(cell = self.cell, subscriber = %id, "subscribed");
        }
        inserted
    }

    /// Notify every observer, following the thread's [`FailurePolicy`].
    pub(crate) fn notify(&self) {
        match Runtime::failure_policy() {
            FailurePolicy::Propagate => {
                let observers = self.snapshot();
                debug!(cell = self.cell, observers = observers.len(), "notify");
                for observer in &observers {
                    Runtime::run_tracked(observer);
                }
            }
            FailurePolicy::Isolate => {
                if let Err(err) = self.notify_isolated() {
                    warn!(
                        cell = self.cell,
                        failed = err.failures.len(),
                        "write completed with failed observers"
                    );
                }
            }
        }
    }

    /// Notify every observer, catching panics so a failing observer does
    /// not stop the rest of the fan-out.
    pub(crate) fn notify_isolated(&self) -> Result<(), NotifyError> {
        let observers = self.snapshot();
        debug!(cell = self.cell, observers = observers.len(), "notify (isolated)");

        let mut failures = Vec::new();
        for observer in &observers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| Runtime::run_tracked(observer)));
            if let Err(payload) = outcome {
                let message = panic_message(payload.as_ref());
                error!(
                    cell = self.cell,
                    subscriber = %observer.id(),
                    %message,
                    "observer panicked"
                );
                failures.push(ObserverPanic {
                    subscriber: observer.id(),
                    message,
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(NotifyError { failures })
        }
    }

    /// Registered subscriber IDs in notification order.
    pub(crate) fn subscribers(&self) -> Vec<SubscriberId> {
        self.observers.read().keys().copied().collect()
    }

    /// Get the number of observers.
    pub(crate) fn len(&self) -> usize {
        self.observers.read().len()
    }

    fn snapshot(&self) -> Snapshot {
        self.observers.read().values().cloned().collect()
    }
}

impl Default for ObserverList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("cell", &self.cell)
            .field("subscribers", &self.subscribers())
            .finish()
    }
}
