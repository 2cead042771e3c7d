//! Browser worker scope bindings
//!
//! Worker events are dispatched at every await point, and the host discards
//! them when no handler is registered. The provisional intake therefore has
//! to be installed synchronously, before the first suspension. The
//! bootstrap guarantees that ordering; this module supplies the hooks.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DedicatedWorkerGlobalScope, MessageEvent, SharedWorkerGlobalScope};

use forebay_core::{BootstrapError, ExecutionMode, Intake, Result, WorkerScope};

/// Classify the ambient worker scope
///
/// Shared iff the `SharedWorkerGlobalScope` constructor exists and the
/// global object is an instance of it; dedicated otherwise. Pure; evaluated
/// once at startup and threaded explicitly from there.
pub fn detect_execution_mode() -> ExecutionMode {
    let global = js_sys::global();
    let shared_ctor = js_sys::Reflect::get(&global, &JsValue::from_str("SharedWorkerGlobalScope"))
        .unwrap_or(JsValue::UNDEFINED);
    if !shared_ctor.is_undefined() && global.is_instance_of::<SharedWorkerGlobalScope>() {
        ExecutionMode::Shared
    } else {
        ExecutionMode::Dedicated
    }
}

/// The real worker global scope as seen by the bootstrap
///
/// Shared mode installs the intake as `onconnect`, dedicated mode as
/// `onmessage`; both hooks deliver `MessageEvent`s which are queued
/// verbatim.
pub struct WebWorkerScope {
    mode: ExecutionMode,
    intake_installed: bool,
}

impl WebWorkerScope {
    /// Build a scope around the current worker global
    pub fn from_global() -> Self {
        Self {
            mode: detect_execution_mode(),
            intake_installed: false,
        }
    }
}

impl WorkerScope for WebWorkerScope {
    type Event = MessageEvent;

    fn execution_mode(&self) -> ExecutionMode {
        self.mode
    }

    fn register_intake(
        &mut self,
        mode: ExecutionMode,
        intake: Intake<MessageEvent>,
    ) -> Result<()> {
        if self.intake_installed {
            return Err(BootstrapError::IntakeAlreadyInstalled);
        }

        let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
            // Only reachable if the processing module failed to install its
            // own handler at batch start; the queue already warned and
            // returned the event, which has nowhere left to go.
            let _ = intake.push(event);
        }) as Box<dyn FnMut(MessageEvent)>);

        let global = js_sys::global();
        match mode {
            ExecutionMode::Shared => {
                let scope: SharedWorkerGlobalScope = global.unchecked_into();
                scope.set_onconnect(Some(closure.as_ref().unchecked_ref()));
            }
            ExecutionMode::Dedicated => {
                let scope: DedicatedWorkerGlobalScope = global.unchecked_into();
                scope.set_onmessage(Some(closure.as_ref().unchecked_ref()));
            }
        }

        // The host may invoke this handler for the rest of the worker's
        // life, so the closure must outlive us.
        closure.forget();
        self.intake_installed = true;
        Ok(())
    }
}
