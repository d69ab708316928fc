//! Rivulet Core
//!
//! A small reactive dependency-tracking engine. Computations re-run
//! automatically when the data they read changes, with no explicit
//! subscription wiring by the caller.
//!
//! - Reactive cells: single-value [`Signal`]s and keyed [`Store`]s
//! - Effects: computations run once under tracking, then re-run on writes
//! - A per-thread tracking context with stack discipline, so nested runs
//!   attribute reads correctly
//!
//! # Architecture
//!
//! - `reactive`: cells, effects, and the tracking context
//! - `config`: per-thread runtime settings (observer failure policy)
//! - `error`: failures reported by isolated notification and config parsing
//!
//! # Example
//!
//! ```rust
//! use rivulet_core::{create_effect, create_signal};
//! use parking_lot::Mutex;
//! use std::sync::Arc;
//!
//! let (count, set_count) = create_signal(3);
//! let results = Arc::new(Mutex::new(Vec::new()));
//!
//! create_effect({
//!     let results = results.clone();
//!     move || results.lock().push(count.get())
//! });
//!
//! set_count.set(5);
//! assert_eq!(*results.lock(), vec![3, 5]);
//! ```
//!
//! # Hazards
//!
//! An observer that writes a cell it depends on re-triggers itself without
//! bound. The engine does not detect cycles.

pub mod config;
pub mod error;
pub mod reactive;

pub use config::{Config, FailurePolicy};
pub use error::{ConfigError, NotifyError, ObserverPanic};
pub use reactive::{
    create_effect, create_signal, create_store, Computation, Effect, ReadSignal, Runtime,
    Signal, Store, SubscriberId, WriteSignal,
};
