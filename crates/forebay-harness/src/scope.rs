//! Simulated ambient scope
//!
//! Plays the part of the worker global scope: it knows its execution mode,
//! accepts exactly one provisional intake registration, and routes emitted
//! events to whichever handler is currently active. Events that find no
//! handler, and events a consumed queue rejects, are recorded rather than
//! silently lost so tests can assert on them.

use core::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use forebay_core::{BootstrapError, ExecutionMode, Intake, Result, WorkerScope};

use crate::event::{ClientId, SimEvent};

// ----------------------------------------------------------------------------
// Routing State
// ----------------------------------------------------------------------------

enum Routing {
    /// No handler installed yet; a real host would discard these events
    Unrouted,
    /// The bootstrap's provisional intake
    Provisional(Intake<SimEvent>),
    /// The processing module's own permanent handler
    Live(Box<dyn FnMut(SimEvent)>),
}

struct ScopeShared {
    mode: ExecutionMode,
    routing: Routing,
    registered_mode: Option<ExecutionMode>,
    unrouted: Vec<SimEvent>,
    rejected: Vec<SimEvent>,
}

// ----------------------------------------------------------------------------
// Mock Scope
// ----------------------------------------------------------------------------

/// In-memory stand-in for a worker's ambient execution context
#[derive(Clone)]
pub struct MockScope {
    shared: Rc<RefCell<ScopeShared>>,
}

impl MockScope {
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            shared: Rc::new(RefCell::new(ScopeShared {
                mode,
                routing: Routing::Unrouted,
                registered_mode: None,
                unrouted: Vec::new(),
                rejected: Vec::new(),
            })),
        }
    }

    /// Deliver a connection-establishment event from the given client
    ///
    /// Only a shared worker ever receives connection events.
    pub fn emit_connection(&self, client: ClientId, payload: &str) {
        assert!(
            self.shared.borrow().mode.is_shared(),
            "connection events only occur in shared mode"
        );
        self.route(SimEvent::connection(client, payload));
    }

    /// Deliver a message event from the single implicit client
    ///
    /// Only a dedicated worker receives messages directly on its scope.
    pub fn emit_message(&self, payload: &str) {
        assert!(
            self.shared.borrow().mode.is_dedicated(),
            "scope-level message events only occur in dedicated mode"
        );
        self.route(SimEvent::message(payload));
    }

    /// Replace the provisional intake with the module's permanent handler
    ///
    /// This is the single takeover point a processing module uses; from here
    /// on events are delivered live.
    pub fn install_live_handler(&self, handler: impl FnMut(SimEvent) + 'static) {
        self.shared.borrow_mut().routing = Routing::Live(Box::new(handler));
    }

    /// Whether the provisional intake is still the active handler
    pub fn has_provisional_intake(&self) -> bool {
        matches!(self.shared.borrow().routing, Routing::Provisional(_))
    }

    /// Whether the module's permanent handler has taken over
    pub fn is_live(&self) -> bool {
        matches!(self.shared.borrow().routing, Routing::Live(_))
    }

    /// The mode the bootstrap passed at intake registration, if any
    pub fn registered_intake_mode(&self) -> Option<ExecutionMode> {
        self.shared.borrow().registered_mode
    }

    /// Events emitted before any handler was installed
    pub fn unrouted_events(&self) -> Vec<SimEvent> {
        self.shared.borrow().unrouted.clone()
    }

    /// Events the provisional intake rejected after handoff
    pub fn rejected_events(&self) -> Vec<SimEvent> {
        self.shared.borrow().rejected.clone()
    }

    fn route(&self, event: SimEvent) {
        let mut shared = self.shared.borrow_mut();
        let ScopeShared {
            routing,
            unrouted,
            rejected,
            ..
        } = &mut *shared;
        match routing {
            Routing::Unrouted => {
                warn!("event emitted before any handler was installed");
                unrouted.push(event);
            }
            Routing::Provisional(intake) => {
                if let Err(err) = intake.push(event) {
                    rejected.push(err.into_inner());
                }
            }
            Routing::Live(handler) => handler(event),
        }
    }
}

impl WorkerScope for MockScope {
    type Event = SimEvent;

    fn execution_mode(&self) -> ExecutionMode {
        self.shared.borrow().mode
    }

    fn register_intake(&mut self, mode: ExecutionMode, intake: Intake<SimEvent>) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        if !matches!(shared.routing, Routing::Unrouted) {
            return Err(BootstrapError::IntakeAlreadyInstalled);
        }
        shared.registered_mode = Some(mode);
        shared.routing = Routing::Provisional(intake);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forebay_core::EventQueue;

    #[test]
    fn test_events_before_registration_are_recorded() {
        let scope = MockScope::new(ExecutionMode::Dedicated);
        scope.emit_message("too early");
        assert_eq!(scope.unrouted_events().len(), 1);
        assert!(!scope.has_provisional_intake());
    }

    #[test]
    fn test_second_registration_is_rejected() {
        let mut scope = MockScope::new(ExecutionMode::Dedicated);
        let mut queue_a = EventQueue::new();
        let mut queue_b = EventQueue::new();

        scope
            .register_intake(ExecutionMode::Dedicated, queue_a.intake().expect("intake"))
            .expect("first registration");
        let err = scope
            .register_intake(ExecutionMode::Dedicated, queue_b.intake().expect("intake"))
            .expect_err("second registration");
        assert!(matches!(err, BootstrapError::IntakeAlreadyInstalled));
    }

    #[test]
    fn test_live_handler_receives_events() {
        let scope = MockScope::new(ExecutionMode::Dedicated);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        scope.install_live_handler(move |event| sink.borrow_mut().push(event));

        scope.emit_message("direct");
        assert_eq!(seen.borrow().len(), 1);
        assert!(scope.is_live());
    }
}
