//! Reactive Context
//!
//! The reactive context tracks which computation is currently running.
//! This enables automatic dependency tracking: when a cell is read,
//! it can register the current computation as an observer.
//!
//! # Implementation
//!
//! We use a thread-local stack of frames. Entering a tracked run pushes a
//! frame holding the computation; the guard pops it when dropped, including
//! during unwinding. The active computation is the top frame, so a nested
//! run hands attribution back to the outer computation when it returns.
//!
//! A frame may also be empty. [`Runtime::untracked`](super::Runtime::untracked)
//! pushes one to hide the enclosing computation from reads made inside it.
//!
//! Frames are only pushed by the runtime's scoped operations. Outside the
//! crate the context is read-only.

use std::cell::RefCell;

use super::subscriber::{Computation, SubscriberId};

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<ContextEntry>> = const { RefCell::new(Vec::new()) };
}

/// An entry in the reactive context stack.
#[derive(Debug, Clone)]
struct ContextEntry {
    /// The computation reads should be attributed to, or `None` for a
    /// suspended frame.
    computation: Option<Computation>,
}

impl ContextEntry {
    fn id(&self) -> Option<SubscriberId> {
        self.computation.as_ref().map(Computation::id)
    }
}

/// Guard that pops the context when dropped.
///
/// This keeps the context stack balanced even if the computation panics.
/// Guards cannot be created outside the crate; use
/// [`Runtime::run_tracked`](super::Runtime::run_tracked) instead.
///
/// ```compile_fail
/// use rivulet_core::reactive::{Computation, ReactiveContext};
///
/// let stray = Computation::new(|| {});
/// std::mem::forget(ReactiveContext::enter(&stray));
/// ```
#[must_use = "the context is exited as soon as the guard is dropped"]
pub struct ReactiveContext {
    subscriber_id: Option<SubscriberId>,
}

impl ReactiveContext {
    /// Enter a new reactive context for the given computation.
    ///
    /// While the returned guard is alive, any cell that is read registers
    /// `computation` as an observer.
    pub(crate) fn enter(computation: &Computation) -> Self {
        Self::push(Some(computation.clone()))
    }

    /// Enter a frame in which no computation is active.
    ///
    /// Reads made while the guard is alive register nothing.
    pub(crate) fn suspend() -> Self {
        Self::push(None)
    }

    fn push(computation: Option<Computation>) -> Self {
        let entry = ContextEntry { computation };
        let subscriber_id = entry.id();
        CONTEXT_STACK.with(|stack| stack.borrow_mut().push(entry));
        Self { subscriber_id }
    }

    /// Check if a computation is currently active.
    pub fn is_active() -> bool {
        Self::current_subscriber().is_some()
    }

    /// Get the active computation, if any.
    pub fn current() -> Option<Computation> {
        CONTEXT_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .and_then(|entry| entry.computation.clone())
        })
    }

    /// Get the active computation's ID, if any.
    pub fn current_subscriber() -> Option<SubscriberId> {
        CONTEXT_STACK.with(|stack| stack.borrow().last().and_then(ContextEntry::id))
    }

    /// Number of frames on this thread's stack.
    pub fn depth() -> usize {
        CONTEXT_STACK.with(|stack| stack.borrow().len())
    }
}

impl Drop for ReactiveContext {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();

            // Guards are dropped in reverse order of creation, so the top
            // frame must be ours.
            if let Some(entry) = popped {
                debug_assert_eq!(
                    entry.id(),
                    self.subscriber_id,
                    "ReactiveContext mismatch: expected {:?}, got {:?}",
                    self.subscriber_id,
                    entry.id()
                );
            }
        });
    }
}
