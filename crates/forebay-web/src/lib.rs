//! Forebay WebAssembly Frontend - Worker Composition Root
//!
//! This crate binds the platform-agnostic bootstrap mechanism to the real
//! browser worker globals. It is responsible for:
//! - Classifying the worker scope (SharedWorkerGlobalScope vs dedicated)
//! - Installing the provisional `onconnect`/`onmessage` intake
//! - Adapting a pair of JavaScript functions into a `ProcessingModule`
//! - Exposing the `runWorker` entry point via #[wasm_bindgen]

use wasm_bindgen::prelude::*;

mod module;
mod scope;
mod utils;
mod worker;

pub use module::JsProcessingModule;
pub use scope::{detect_execution_mode, WebWorkerScope};
pub use worker::run_worker;

// Initialize WASM module
#[wasm_bindgen(start)]
pub fn main() {
    utils::set_panic_hook();

    // Set up tracing for WASM
    tracing_wasm::set_as_global_default();
}
