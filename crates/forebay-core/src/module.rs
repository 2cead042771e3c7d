//! Processing module contract
//!
//! The heavyweight collaborator the bootstrap exists to bridge into. The
//! bootstrap treats it as opaque: one asynchronous initialization operation
//! producing a ready handle, and one batch-start operation that replays the
//! queued backlog and takes over all future event handling.

use core::fmt;

use async_trait::async_trait;

/// The opaque processing module behind the bootstrap
///
/// The scheduling model is single-threaded and cooperative, so the futures
/// involved need not be `Send`.
#[async_trait(?Send)]
pub trait ProcessingModule {
    /// Event unit handed over at batch start; must match the scope's
    type Event;
    /// Ready handle produced by successful initialization
    type Handle;
    type Error: fmt::Display;

    /// Asynchronously initialize the module
    ///
    /// Invoked exactly once per worker lifetime; this is the bootstrap's
    /// sole suspension point. Failure is fatal to the bootstrap and is
    /// never retried, since repeating worker initialization mid-lifetime
    /// is not a safe operation.
    async fn initialize(&mut self) -> Result<Self::Handle, Self::Error>;

    /// Start the module with the queued backlog
    ///
    /// Must process `backlog` in the order supplied, as if each event had
    /// been received live, and must install the module's own permanent
    /// event handlers *before returning*: the provisional intake stops
    /// accepting events the moment the backlog is taken, so any gap between
    /// handoff and re-registration would reject events back at the scope.
    fn start(&mut self, handle: Self::Handle, backlog: Vec<Self::Event>)
        -> Result<(), Self::Error>;
}
