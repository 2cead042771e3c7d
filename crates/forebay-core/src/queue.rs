//! Early-arrival event queue
//!
//! An ordered, append-only buffer for events that arrive while the
//! processing module is still initializing. The queue has exactly one
//! writer role (the provisional [`Intake`]) and exactly one reader (the
//! handoff, which consumes the queue by value). The surrounding scheduling
//! model is single-threaded and cooperative, so the handles share state via
//! `Rc<RefCell<..>>` rather than a lock.
//!
//! After [`EventQueue::into_backlog`] the queue is consumed: a push through
//! a still-live intake handle is rejected and the event is returned to the
//! caller instead of being silently dropped.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use tracing::warn;

use crate::{BootstrapConfig, BootstrapError, Result};

// ----------------------------------------------------------------------------
// Shared Queue State
// ----------------------------------------------------------------------------

struct QueueShared<E> {
    events: Vec<E>,
    consumed: bool,
    warn_threshold: Option<usize>,
    warned: bool,
}

// ----------------------------------------------------------------------------
// Event Queue
// ----------------------------------------------------------------------------

/// Ordered buffer of events awaiting handoff
///
/// Owned by the bootstrap from creation until the single handoff call.
/// Insertion order is significant and preserved verbatim; events are never
/// inspected, merged, or split.
pub struct EventQueue<E> {
    shared: Rc<RefCell<QueueShared<E>>>,
    intake_taken: bool,
}

impl<E> EventQueue<E> {
    /// Create an empty queue with default configuration
    pub fn new() -> Self {
        Self::with_config(&BootstrapConfig::default())
    }

    /// Create an empty queue sized and tuned per the given configuration
    pub fn with_config(config: &BootstrapConfig) -> Self {
        Self {
            shared: Rc::new(RefCell::new(QueueShared {
                events: Vec::with_capacity(config.initial_queue_capacity),
                consumed: false,
                warn_threshold: config.backlog_warn_threshold,
                warned: false,
            })),
            intake_taken: false,
        }
    }

    /// Take the queue's single writer handle
    ///
    /// At most one intake exists per queue; a second request fails with
    /// [`BootstrapError::IntakeAlreadyTaken`].
    pub fn intake(&mut self) -> Result<Intake<E>> {
        if self.intake_taken {
            return Err(BootstrapError::IntakeAlreadyTaken);
        }
        self.intake_taken = true;
        Ok(Intake {
            shared: Rc::clone(&self.shared),
        })
    }

    /// Get a read-only diagnostics handle
    pub fn observer(&self) -> QueueObserver<E> {
        QueueObserver {
            shared: Rc::clone(&self.shared),
        }
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.shared.borrow().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the queue, yielding every queued event in arrival order
    ///
    /// This is the single handoff read. Taking `self` by value makes a
    /// second handoff unrepresentable; intake handles that outlive the
    /// queue see it as closed from here on.
    pub fn into_backlog(self) -> Vec<E> {
        let mut shared = self.shared.borrow_mut();
        shared.consumed = true;
        core::mem::take(&mut shared.events)
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Intake (single writer)
// ----------------------------------------------------------------------------

/// The provisional intake: the queue's only writer handle
///
/// Installed on the ambient scope for the duration of the initialization
/// suspension window. Every invocation appends one event in arrival order.
pub struct Intake<E> {
    shared: Rc<RefCell<QueueShared<E>>>,
}

impl<E> Intake<E> {
    /// Append an event to the queue
    ///
    /// Fails once the queue has been handed off, returning the event to the
    /// caller so it is never silently lost.
    pub fn push(&self, event: E) -> core::result::Result<(), QueueClosedError<E>> {
        let mut shared = self.shared.borrow_mut();
        if shared.consumed {
            warn!("event arrived after handoff; returning it to the caller");
            return Err(QueueClosedError(event));
        }
        shared.events.push(event);
        if let Some(threshold) = shared.warn_threshold {
            if !shared.warned && shared.events.len() >= threshold {
                shared.warned = true;
                warn!(
                    backlog = shared.events.len(),
                    "early-event backlog still growing while initialization is pending"
                );
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Observer (read-only diagnostics)
// ----------------------------------------------------------------------------

/// Read-only view of the queue for diagnostics and tests
///
/// Deliberately exposes only counters, not contents: the queued events have
/// exactly one reader, the handoff.
pub struct QueueObserver<E> {
    shared: Rc<RefCell<QueueShared<E>>>,
}

impl<E> QueueObserver<E> {
    pub fn len(&self) -> usize {
        self.shared.borrow().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_consumed(&self) -> bool {
        self.shared.borrow().consumed
    }
}

impl<E> Clone for QueueObserver<E> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

// ----------------------------------------------------------------------------
// Errors
// ----------------------------------------------------------------------------

/// Returned by [`Intake::push`] after the queue has been handed off
///
/// Carries the rejected event back to the caller, like a channel send error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueClosedError<E>(pub E);

impl<E> QueueClosedError<E> {
    /// Recover the rejected event
    pub fn into_inner(self) -> E {
        self.0
    }
}

impl<E> fmt::Display for QueueClosedError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event queue already handed off")
    }
}

impl<E: fmt::Debug> std::error::Error for QueueClosedError<E> {}
