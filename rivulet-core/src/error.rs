//! Error types.
//!
//! Reads and writes never fail on their own. The only failures the engine
//! reports are observers that panicked during a write's fan-out (when the
//! caller asked for them to be isolated) and malformed configuration.

use thiserror::Error;

use crate::reactive::SubscriberId;

/// An observer that panicked while being notified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("observer {subscriber} panicked: {message}")]
pub struct ObserverPanic {
    /// The computation that failed.
    pub subscriber: SubscriberId,
    /// The panic payload, if it was a string.
    pub message: String,
}

/// One or more observers failed during an isolated fan-out.
///
/// Every observer was still invoked; `failures` lists the ones that
/// panicked, in notification order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} of the notified observers panicked", .failures.len())]
pub struct NotifyError {
    pub failures: Vec<ObserverPanic>,
}

impl NotifyError {
    /// Subscriber IDs of the failed observers.
    pub fn subscribers(&self) -> impl Iterator<Item = SubscriberId> + '_ {
        self.failures.iter().map(|failure| failure.subscriber)
    }
}

/// Errors raised while loading a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Render a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
