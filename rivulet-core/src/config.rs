//! Engine configuration.
//!
//! Configuration is per thread, like the tracking context. Install it with
//! [`Runtime::set_config`](crate::reactive::Runtime::set_config).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a write does when one of its observers panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The panic unwinds through the write. Observers later in the list are
    /// not notified.
    #[default]
    Propagate,
    /// The panic is caught and logged, and fan-out continues with the next
    /// observer.
    Isolate,
}

/// Runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub failure_policy: FailurePolicy,
}

impl Config {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}
