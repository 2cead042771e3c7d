//! Worker entry point
//!
//! A worker script calls `runWorker(init, start)` as its first statement:
//! mode detection and intake registration happen synchronously inside, so
//! every connection or message that arrives while `init`'s Promise is
//! pending is queued and replayed through `start` in arrival order.

use wasm_bindgen::prelude::*;

use forebay_core::{Bootstrap, BootstrapConfig};

use crate::module::JsProcessingModule;
use crate::scope::WebWorkerScope;

/// Drive the full bootstrap against the current worker global
///
/// `init` must return a Promise resolving to the module's ready handle;
/// `start` receives that handle and an Array of the queued events, and must
/// install the module's own `onconnect`/`onmessage` handlers before it
/// returns. Resolves to the bootstrap report, or rejects if initialization
/// fails; a failed worker stays inert and the rejection surfaces
/// on the host's unhandled-failure channel.
#[wasm_bindgen(js_name = runWorker)]
pub async fn run_worker(
    init: js_sys::Function,
    start: js_sys::Function,
) -> Result<JsValue, JsValue> {
    let scope = WebWorkerScope::from_global();
    let module = JsProcessingModule::new(init, start);

    let report = Bootstrap::with_config(scope, module, BootstrapConfig::browser_tuned())
        .run()
        .await
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

    serde_wasm_bindgen::to_value(&report).map_err(|err| JsValue::from_str(&err.to_string()))
}
