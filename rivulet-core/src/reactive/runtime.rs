//! Reactive Runtime
//!
//! The runtime is the entry point for running computations under tracking.
//!
//! # How It Works
//!
//! 1. [`Runtime::run_tracked`] pushes a computation onto the thread's
//!    context stack and invokes it once.
//!
//! 2. While it runs, every cell it reads registers it as an observer.
//!
//! 3. When one of those cells is written, the cell re-runs each observer
//!    through `run_tracked` again, synchronously, before the write returns.
//!
//! There is no scheduler and no batching. A write that reaches N observers
//! returns only after all N re-runs (and anything they trigger) complete.
//!
//! # Thread Safety
//!
//! The context stack and the [`Config`] are thread-local. Cells can be
//! shared across threads, but attribution only ever sees the computations
//! running on the reading thread.

use std::cell::RefCell;

use tracing::trace;

use super::context::ReactiveContext;
use super::subscriber::{Computation, SubscriberId};
use crate::config::{Config, FailurePolicy};

thread_local! {
    static CONFIG: RefCell<Config> = RefCell::new(Config::default());
}

/// The per-thread reactive runtime.
pub struct Runtime;

impl Runtime {
    /// Run `computation` once with it as the active computation.
    ///
    /// Any cell read during the call registers `computation` as an observer.
    /// The previous active computation (if any) is restored when the call
    /// returns or unwinds.
    pub fn run_tracked(computation: &Computation) {
        let _ctx = ReactiveContext::enter(computation);
        trace!(
            subscriber = %computation.id(),
            depth = ReactiveContext::depth(),
            "tracked run"
        );
        computation.invoke();
    }

    /// Run `f` with tracking suspended and return its result.
    ///
    /// Reads made inside `f` do not register the enclosing computation.
    pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
        let _ctx = ReactiveContext::suspend();
        f()
    }

    /// Get the computation currently being tracked, if any.
    pub fn current() -> Option<Computation> {
        ReactiveContext::current()
    }

    /// Get the ID of the computation currently being tracked, if any.
    pub fn current_subscriber() -> Option<SubscriberId> {
        ReactiveContext::current_subscriber()
    }

    /// Check if we're inside a tracked run.
    pub fn is_tracking() -> bool {
        ReactiveContext::is_active()
    }

    /// The config installed on this thread.
    pub fn config() -> Config {
        CONFIG.with(|config| config.borrow().clone())
    }

    /// Install `config` on this thread, returning the previous one.
    pub fn set_config(config: Config) -> Config {
        CONFIG.with(|current| current.replace(config))
    }

    pub(crate) fn failure_policy() -> FailurePolicy {
        CONFIG.with(|config| config.borrow().failure_policy)
    }
}
