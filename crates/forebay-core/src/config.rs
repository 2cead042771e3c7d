//! Bootstrap configuration
//!
//! The mechanism itself has no tunable semantics; configuration covers
//! allocation and observability knobs only.

use serde::{Deserialize, Serialize};

/// Configuration for the bootstrap's event queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Pre-allocated capacity of the early-event queue
    pub initial_queue_capacity: usize,
    /// Backlog size at which a single warning is logged while initialization
    /// is still pending; `None` disables the warning. The queue itself stays
    /// unbounded either way.
    pub backlog_warn_threshold: Option<usize>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            initial_queue_capacity: 16,
            backlog_warn_threshold: Some(1024),
        }
    }
}

impl BootstrapConfig {
    /// Configuration tuned for browser workers, where module initialization
    /// (fetch + compile of the heavyweight module) can take long enough for
    /// a real backlog to build up.
    pub fn browser_tuned() -> Self {
        Self {
            initial_queue_capacity: 64,
            backlog_warn_threshold: Some(4096),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BootstrapConfig::default();
        assert_eq!(config.initial_queue_capacity, 16);
        assert_eq!(config.backlog_warn_threshold, Some(1024));
    }

    #[test]
    fn test_browser_tuned_allocates_more() {
        let config = BootstrapConfig::browser_tuned();
        assert!(config.initial_queue_capacity > BootstrapConfig::default().initial_queue_capacity);
    }
}
