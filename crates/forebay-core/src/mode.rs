//! Worker execution mode
//!
//! A worker either serves multiple independent clients (shared) or exactly
//! one implicit client (dedicated). The variant is classified once at
//! startup by the ambient scope and threaded explicitly through the rest of
//! the bootstrap instead of being re-inspected ad hoc.

use core::fmt;
use serde::{Deserialize, Serialize};

/// The two worker variants an ambient execution context can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Multi-client worker, notified via connection-establishment events
    Shared,
    /// Single-client worker, notified via message-delivery events
    Dedicated,
}

impl ExecutionMode {
    pub fn is_shared(&self) -> bool {
        matches!(self, ExecutionMode::Shared)
    }

    pub fn is_dedicated(&self) -> bool {
        matches!(self, ExecutionMode::Dedicated)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Shared => write!(f, "shared"),
            ExecutionMode::Dedicated => write!(f, "dedicated"),
        }
    }
}
