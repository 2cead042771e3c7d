//! Forebay Worker Bootstrap Bridge
//!
//! This crate provides the platform-agnostic mechanism that lets a background
//! worker accept client events arriving *before* its processing module has
//! finished asynchronous initialization, and hand them off, in order and
//! exactly once, to that module once it is ready.
//!
//! The ambient execution context and the processing module are both external
//! collaborators, abstracted behind the [`WorkerScope`] and
//! [`ProcessingModule`] traits. The `forebay-web` crate binds them to the
//! real browser worker globals; the `forebay-harness` crate provides
//! deterministic in-memory doubles for tests.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod bootstrap;
pub mod config;
pub mod mode;
pub mod module;
pub mod queue;
pub mod scope;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use bootstrap::{Bootstrap, BootstrapPhase, BootstrapReport, PhaseObserver};
pub use config::BootstrapConfig;
pub use mode::ExecutionMode;
pub use module::ProcessingModule;
pub use queue::{EventQueue, Intake, QueueClosedError, QueueObserver};
pub use scope::WorkerScope;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Fatal failures of the bootstrap sequence
///
/// None of these are recovered locally: a worker whose bootstrap fails stays
/// permanently inert and the failure surfaces on the hosting environment's
/// unhandled-failure channel.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("processing module initialization failed: {reason}")]
    InitializationFailed { reason: String },

    #[error("the event queue's intake handle was already taken")]
    IntakeAlreadyTaken,

    #[error("a provisional intake is already installed on this scope")]
    IntakeAlreadyInstalled,
}

pub type Result<T> = core::result::Result<T, BootstrapError>;
