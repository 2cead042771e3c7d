//! Bootstrap orchestrator
//!
//! Runs the whole mechanism: detect the execution mode, install the
//! provisional intake, await module initialization (the sole suspension
//! point), then hand the queued backlog off exactly once.
//!
//! State machine: `Starting → ModeDetected → Queuing → (HandedOff |
//! InitFailed)`. `Starting` and `ModeDetected` are transient and
//! synchronous; `Queuing` is the only state spanning the suspension;
//! `HandedOff` and `InitFailed` are terminal.

use core::cell::Cell;
use core::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    BootstrapConfig, BootstrapError, EventQueue, ExecutionMode, ProcessingModule, QueueObserver,
    Result, WorkerScope,
};

// ----------------------------------------------------------------------------
// Phase Tracking
// ----------------------------------------------------------------------------

/// Observable states of the bootstrap mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootstrapPhase {
    Starting,
    ModeDetected,
    Queuing,
    HandedOff,
    InitFailed,
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapPhase::Starting => write!(f, "starting"),
            BootstrapPhase::ModeDetected => write!(f, "mode-detected"),
            BootstrapPhase::Queuing => write!(f, "queuing"),
            BootstrapPhase::HandedOff => write!(f, "handed-off"),
            BootstrapPhase::InitFailed => write!(f, "init-failed"),
        }
    }
}

/// Read-only handle reporting the bootstrap's current phase
#[derive(Clone)]
pub struct PhaseObserver {
    phase: Rc<Cell<BootstrapPhase>>,
}

impl PhaseObserver {
    pub fn phase(&self) -> BootstrapPhase {
        self.phase.get()
    }
}

// ----------------------------------------------------------------------------
// Report
// ----------------------------------------------------------------------------

/// Terminal summary of a successful bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapReport {
    /// The execution mode the scope was classified as
    pub mode: ExecutionMode,
    /// How many queued events were replayed at handoff
    pub replayed: usize,
}

// ----------------------------------------------------------------------------
// Bootstrap
// ----------------------------------------------------------------------------

/// The bootstrap bridge between an ambient scope and a processing module
///
/// Owns the early-event queue from creation until the single handoff.
pub struct Bootstrap<S, M>
where
    S: WorkerScope,
{
    scope: S,
    module: M,
    queue: EventQueue<S::Event>,
    phase: Rc<Cell<BootstrapPhase>>,
}

impl<S, M> Bootstrap<S, M>
where
    S: WorkerScope,
    M: ProcessingModule<Event = S::Event>,
{
    /// Create a bootstrap with default configuration
    pub fn new(scope: S, module: M) -> Self {
        Self::with_config(scope, module, BootstrapConfig::default())
    }

    /// Create a bootstrap with the given configuration
    pub fn with_config(scope: S, module: M, config: BootstrapConfig) -> Self {
        Self {
            scope,
            module,
            queue: EventQueue::with_config(&config),
            phase: Rc::new(Cell::new(BootstrapPhase::Starting)),
        }
    }

    /// Read-only view of the early-event queue
    pub fn queue_observer(&self) -> QueueObserver<S::Event> {
        self.queue.observer()
    }

    /// Read-only view of the state machine
    pub fn phase_observer(&self) -> PhaseObserver {
        PhaseObserver {
            phase: Rc::clone(&self.phase),
        }
    }

    /// Run the bootstrap to its terminal state
    ///
    /// Everything up to the initialization await runs synchronously, so no
    /// event can slip past between worker startup and intake registration.
    /// Consuming `self` makes a second run, and with it a second handoff,
    /// unrepresentable.
    pub async fn run(mut self) -> Result<BootstrapReport> {
        let mode = self.scope.execution_mode();
        self.phase.set(BootstrapPhase::ModeDetected);
        debug!(%mode, "execution mode detected");

        let intake = self.queue.intake()?;
        self.scope.register_intake(mode, intake)?;
        self.phase.set(BootstrapPhase::Queuing);
        debug!(%mode, "provisional intake installed");

        // Sole suspension point: events delivered from here on land in the
        // queue until initialization resolves.
        debug!("initializing processing module");
        let handle = match self.module.initialize().await {
            Ok(handle) => handle,
            Err(err) => {
                self.phase.set(BootstrapPhase::InitFailed);
                error!(
                    queued = self.queue.len(),
                    "processing module initialization failed: {err}"
                );
                return Err(BootstrapError::InitializationFailed {
                    reason: err.to_string(),
                });
            }
        };

        let backlog = self.queue.into_backlog();
        let replayed = backlog.len();
        info!(queued = replayed, "starting processing module with queued backlog");

        if let Err(err) = self.module.start(handle, backlog) {
            // Ownership of the backlog has already been transferred; a
            // failure while replaying it is the module's to handle.
            error!("processing module failed during batch start: {err}");
        }
        self.phase.set(BootstrapPhase::HandedOff);

        Ok(BootstrapReport { mode, replayed })
    }
}
