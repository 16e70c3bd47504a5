//! Configuration for the router node

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::NodeError;

/// Configuration for a [`crate::Router`].
///
/// Loadable from a TOML file; missing fields fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Seconds between periodic advertisement broadcasts.
    #[serde(default = "default_advertise_interval")]
    pub advertise_interval_secs: u64,

    /// Seconds between timeout sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Seconds a learned route may go unrefreshed before it expires.
    #[serde(default = "default_route_timeout")]
    pub route_timeout_secs: u64,

    /// Entry ceiling applied to each table. Exceeding it is fatal.
    #[serde(default = "default_table_capacity")]
    pub table_capacity: usize,
}

fn default_advertise_interval() -> u64 {
    10
}
fn default_sweep_interval() -> u64 {
    5
}
fn default_route_timeout() -> u64 {
    30
}
fn default_table_capacity() -> usize {
    256
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            advertise_interval_secs: default_advertise_interval(),
            sweep_interval_secs: default_sweep_interval(),
            route_timeout_secs: default_route_timeout(),
            table_capacity: default_table_capacity(),
        }
    }
}

impl RouterConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, NodeError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the advertisement interval.
    pub fn with_advertise_interval(mut self, interval: Duration) -> Self {
        self.advertise_interval_secs = interval.as_secs();
        self
    }

    /// Set the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval_secs = interval.as_secs();
        self
    }

    /// Set the route timeout.
    pub fn with_route_timeout(mut self, timeout: Duration) -> Self {
        self.route_timeout_secs = timeout.as_secs();
        self
    }

    /// Set the per-table capacity ceiling.
    pub fn with_table_capacity(mut self, capacity: usize) -> Self {
        self.table_capacity = capacity;
        self
    }

    pub fn advertise_interval(&self) -> Duration {
        Duration::from_secs(self.advertise_interval_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn route_timeout(&self) -> Duration {
        Duration::from_secs(self.route_timeout_secs)
    }
}
