//! Ambient execution context
//!
//! The scope a worker runs in: it knows which worker variant it is, and it
//! is the single registration point for the provisional intake. Keeping
//! registration behind one method (instead of relying on the host's
//! last-registration-wins semantics) makes the "at most one active intake"
//! invariant explicit and checkable.

use crate::{ExecutionMode, Intake, Result};

/// The ambient execution context a worker bootstrap runs inside
pub trait WorkerScope {
    /// Opaque event unit delivered by the scope (a connection event in
    /// shared mode, a message event in dedicated mode)
    type Event;

    /// Classify the ambient context
    ///
    /// Pure and infallible: every scope is one of the two variants. The
    /// bootstrap calls this exactly once at startup and threads the result
    /// explicitly through the remaining steps.
    fn execution_mode(&self) -> ExecutionMode;

    /// Install the provisional intake appropriate to the mode
    ///
    /// Shared mode registers a connection intake, dedicated mode a message
    /// intake; either way every incoming event is appended to the queue
    /// verbatim. Fails with [`crate::BootstrapError::IntakeAlreadyInstalled`]
    /// if an intake is already active on this scope.
    fn register_intake(&mut self, mode: ExecutionMode, intake: Intake<Self::Event>) -> Result<()>;
}
