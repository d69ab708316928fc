//! Effect Implementation
//!
//! An Effect is a computation that runs once immediately under tracking and
//! is re-run by every cell it read whenever that cell is written.
//!
//! # How Effects Work
//!
//! 1. When created, the effect runs its function immediately, so every cell
//!    it reads registers it as an observer.
//!
//! 2. When any of those cells is written, the cell re-runs it synchronously.
//!    Each re-run is itself tracked, so cells first read on a later run
//!    (for example in a branch) subscribe it too.
//!
//! Dependencies are only ever added. An effect stays subscribed to every
//! cell it has read, and dropping the handle does not unsubscribe it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::runtime::Runtime;
use super::subscriber::{Computation, SubscriberId};

/// A side-effecting computation that runs when its dependencies change.
///
/// # Example
///
/// ```rust
/// use rivulet_core::reactive::{Effect, Signal};
///
/// let count = Signal::new(0);
///
/// let effect = Effect::new({
///     let count = count.clone();
///     move || println!("Count is: {}", count.get())
/// });
///
/// count.set(5); // Prints: "Count is: 5"
/// assert_eq!(effect.run_count(), 2);
/// ```
#[derive(Clone)]
pub struct Effect {
    /// The wrapped function, as registered with cells.
    computation: Computation,

    /// Number of times the effect has run.
    run_count: Arc<AtomicUsize>,
}

impl Effect {
    /// Create a new effect and run it immediately to establish its
    /// dependencies.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let run_count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&run_count);

        let computation = Computation::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            run();
        });

        Runtime::run_tracked(&computation);

        Self {
            computation,
            run_count,
        }
    }

    /// Get the subscriber ID for this effect.
    pub fn subscriber_id(&self) -> SubscriberId {
        self.computation.id()
    }

    /// The computation cells hold for this effect.
    pub fn computation(&self) -> &Computation {
        &self.computation
    }

    /// Run the effect again under tracking.
    pub fn execute(&self) {
        Runtime::run_tracked(&self.computation);
    }

    /// Get the number of times the effect has run.
    pub fn run_count(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("subscriber_id", &self.subscriber_id())
            .field("run_count", &self.run_count())
            .finish()
    }
}

/// Run `f` now under tracking, re-running it whenever a cell it read is
/// written.
pub fn create_effect<F>(f: F)
where
    F: Fn() + Send + Sync + 'static,
{
    Effect::new(f);
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Signal;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn effect_runs_on_creation() {
        let run_count = Arc::new(AtomicI32::new(0));
        let run_count_clone = run_count.clone();

        let effect = Effect::new(move || {
            run_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(run_count.load(Ordering::SeqCst), 1);
        assert_eq!(effect.run_count(), 1);
    }

    #[test]
    fn effect_reruns_on_dependency_write() {
        let signal = Signal::new(0);
        let observed = Arc::new(AtomicI32::new(-1));

        let effect = Effect::new({
            let signal = signal.clone();
            let observed = observed.clone();
            move || observed.store(signal.get(), Ordering::SeqCst)
        });

        assert_eq!(observed.load(Ordering::SeqCst), 0);

        signal.set(42);
        assert_eq!(observed.load(Ordering::SeqCst), 42);
        assert_eq!(effect.run_count(), 2);
    }

    #[test]
    fn effect_picks_up_branch_dependencies() {
        let flag = Signal::new(false);
        let detail = Signal::new(1);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _effect = Effect::new({
            let flag = flag.clone();
            let detail = detail.clone();
            let seen = seen.clone();
            move || {
                let value = if flag.get() { detail.get() } else { 0 };
                seen.lock().push(value);
            }
        });

        // Not read yet, so not subscribed.
        detail.set(2);
        assert_eq!(*seen.lock(), vec![0]);

        flag.set(true);
        detail.set(3);
        assert_eq!(*seen.lock(), vec![0, 2, 3]);
    }

    #[test]
    fn execute_reruns_and_counts() {
        let effect = Effect::new(|| {});
        assert_eq!(effect.run_count(), 1);

        effect.execute();
        effect.execute();
        assert_eq!(effect.run_count(), 3);
    }

    #[test]
    fn effect_clone_shares_state() {
        let effect1 = Effect::new(|| {});
        let effect2 = effect1.clone();

        assert_eq!(effect1.subscriber_id(), effect2.subscriber_id());

        effect1.execute();
        assert_eq!(effect2.run_count(), 2);
    }

    #[test]
    fn dropping_handle_keeps_subscription() {
        let signal = Signal::new(0);
        let runs = Arc::new(AtomicI32::new(0));

        create_effect({
            let signal = signal.clone();
            let runs = runs.clone();
            move || {
                signal.get();
                runs.fetch_add(1, Ordering::SeqCst);
            }
        });

        signal.set(1);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(signal.subscriber_count(), 1);
    }
}
