//! Scripted processing module
//!
//! A [`MockModule`] follows an [`InitScript`] for its initialization and
//! records everything it is handed through a shared [`ModuleProbe`]. On
//! batch start it installs a live handler into its [`MockScope`], the
//! takeover a real module performs, unless the test opts out to expose
//! the post-handoff gap.

use core::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use uuid::Uuid;

use forebay_core::ProcessingModule;

use crate::event::SimEvent;
use crate::scope::MockScope;

// ----------------------------------------------------------------------------
// Handle and Errors
// ----------------------------------------------------------------------------

/// Ready handle issued by a successfully initialized mock module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleHandle {
    pub session: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum SimModuleError {
    #[error("scripted initialization failure: {0}")]
    ScriptedFailure(String),

    #[error("initialization gate dropped before firing")]
    GateDropped,

    #[error("initialize invoked more than once")]
    Reinitialized,
}

// ----------------------------------------------------------------------------
// Init Scripting
// ----------------------------------------------------------------------------

/// How a mock module's initialization behaves
pub enum InitScript {
    /// Resolve immediately
    Ready,
    /// Fail immediately with the given reason
    Fail(String),
    /// Suspend forever
    Never,
    /// Suspend until the paired [`InitGate`] fires
    AwaitSignal(oneshot::Receiver<std::result::Result<(), String>>),
}

/// Test-held gate controlling a gated module's initialization
pub struct InitGate(oneshot::Sender<std::result::Result<(), String>>);

impl InitGate {
    /// Let the pending initialization succeed
    pub fn open(self) {
        let _ = self.0.send(Ok(()));
    }

    /// Make the pending initialization fail
    pub fn fail(self, reason: impl Into<String>) {
        let _ = self.0.send(Err(reason.into()));
    }
}

// ----------------------------------------------------------------------------
// Probe
// ----------------------------------------------------------------------------

#[derive(Default)]
struct ProbeState {
    init_calls: usize,
    issued_handle: Option<ModuleHandle>,
    batches: Vec<(ModuleHandle, Vec<SimEvent>)>,
    live: Vec<SimEvent>,
}

/// Out-of-band view into everything a [`MockModule`] was handed
#[derive(Clone, Default)]
pub struct ModuleProbe {
    shared: Rc<RefCell<ProbeState>>,
}

impl ModuleProbe {
    /// How many times `initialize` ran
    pub fn init_calls(&self) -> usize {
        self.shared.borrow().init_calls
    }

    /// Whether batch start has happened
    pub fn started(&self) -> bool {
        !self.shared.borrow().batches.is_empty()
    }

    /// Every backlog the module was started with, in call order
    pub fn batches(&self) -> Vec<Vec<SimEvent>> {
        self.shared
            .borrow()
            .batches
            .iter()
            .map(|(_, backlog)| backlog.clone())
            .collect()
    }

    /// Events delivered live by the module's own handler after handoff
    pub fn live_events(&self) -> Vec<SimEvent> {
        self.shared.borrow().live.clone()
    }

    /// Whether every batch start received the handle initialization issued
    pub fn handle_matches(&self) -> bool {
        let state = self.shared.borrow();
        match state.issued_handle {
            Some(issued) => state.batches.iter().all(|(handle, _)| *handle == issued),
            None => state.batches.is_empty(),
        }
    }

    fn record_live(&self, event: SimEvent) {
        self.shared.borrow_mut().live.push(event);
    }
}

// ----------------------------------------------------------------------------
// Mock Module
// ----------------------------------------------------------------------------

/// Scripted stand-in for the heavyweight processing module
pub struct MockModule {
    scope: MockScope,
    script: Option<InitScript>,
    install_live: bool,
    probe: ModuleProbe,
}

impl MockModule {
    /// Create a module attached to the given scope
    pub fn new(scope: &MockScope, script: InitScript) -> Self {
        Self {
            scope: scope.clone(),
            script: Some(script),
            install_live: true,
            probe: ModuleProbe::default(),
        }
    }

    /// Create a module whose initialization resolves when the returned gate
    /// fires
    pub fn gated(scope: &MockScope) -> (Self, InitGate) {
        let (sender, receiver) = oneshot::channel();
        (
            Self::new(scope, InitScript::AwaitSignal(receiver)),
            InitGate(sender),
        )
    }

    /// Skip installing the live handler at batch start, leaving the
    /// consumed provisional intake in place
    pub fn without_live_handler(mut self) -> Self {
        self.install_live = false;
        self
    }

    pub fn probe(&self) -> ModuleProbe {
        self.probe.clone()
    }
}

#[async_trait(?Send)]
impl ProcessingModule for MockModule {
    type Event = SimEvent;
    type Handle = ModuleHandle;
    type Error = SimModuleError;

    async fn initialize(&mut self) -> Result<ModuleHandle, SimModuleError> {
        self.probe.shared.borrow_mut().init_calls += 1;
        let outcome = match self.script.take() {
            None => return Err(SimModuleError::Reinitialized),
            Some(InitScript::Ready) => Ok(()),
            Some(InitScript::Fail(reason)) => Err(reason),
            Some(InitScript::Never) => futures::future::pending().await,
            Some(InitScript::AwaitSignal(receiver)) => {
                receiver.await.map_err(|_| SimModuleError::GateDropped)?
            }
        };
        match outcome {
            Ok(()) => {
                let handle = ModuleHandle {
                    session: Uuid::new_v4(),
                };
                self.probe.shared.borrow_mut().issued_handle = Some(handle);
                Ok(handle)
            }
            Err(reason) => Err(SimModuleError::ScriptedFailure(reason)),
        }
    }

    fn start(
        &mut self,
        handle: ModuleHandle,
        backlog: Vec<SimEvent>,
    ) -> Result<(), SimModuleError> {
        self.probe.shared.borrow_mut().batches.push((handle, backlog));
        if self.install_live {
            let probe = self.probe.clone();
            self.scope
                .install_live_handler(move |event| probe.record_live(event));
        }
        Ok(())
    }
}
