//! Reactive Primitives
//!
//! This module implements the dependency-tracking engine: cells that
//! remember who read them, and computations that re-run when those cells
//! are written.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A [`Signal`] is a container for a single mutable value. When it is read
//! during a tracked run, it registers the running computation as an
//! observer. When it is written, every observer re-runs.
//!
//! ## Stores
//!
//! A [`Store`] is a keyed property bag with the same contract. It keeps one
//! observer list for the whole bag, so a write to any key re-runs every
//! computation that read any key.
//!
//! ## Effects
//!
//! An [`Effect`] is a computation that is run once immediately under
//! tracking. After that, the cells it read keep re-running it.
//!
//! # Implementation Notes
//!
//! The engine uses a thread-local stack to know which computation is
//! running. When a cell is read, it checks the top of the stack and, if a
//! computation is there, adds it to its observer list.
//!
//! Notification is synchronous and unbatched: a write returns only after
//! every observer (and anything those observers write) has run.

mod context;
mod effect;
mod observers;
mod runtime;
mod signal;
mod store;
mod subscriber;

pub use context::ReactiveContext;
pub use effect::{create_effect, Effect};
pub use runtime::Runtime;
pub use signal::{create_signal, ReadSignal, Signal, WriteSignal};
pub use store::{create_store, Store};
pub use subscriber::{Computation, SubscriberId};
