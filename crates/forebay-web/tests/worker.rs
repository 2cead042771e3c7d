//! Browser-run tests for the JavaScript-facing pieces
//!
//! The page context is not a worker scope, so mode detection must fall back
//! to dedicated, the same else-branch a dedicated worker takes.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use forebay_core::{ExecutionMode, ProcessingModule};
use forebay_web::{detect_execution_mode, JsProcessingModule};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_page_context_is_classified_dedicated() {
    assert_eq!(detect_execution_mode(), ExecutionMode::Dedicated);
}

#[wasm_bindgen_test]
async fn test_initialize_awaits_the_init_promise() {
    let init = js_sys::Function::new_no_args("return Promise.resolve(42)");
    let start = js_sys::Function::new_no_args("");
    let mut module = JsProcessingModule::new(init, start);

    let handle = module.initialize().await.expect("promise resolves");
    assert_eq!(handle.as_f64(), Some(42.0));
}

#[wasm_bindgen_test]
async fn test_initialize_requires_a_promise() {
    let init = js_sys::Function::new_no_args("return 7");
    let start = js_sys::Function::new_no_args("");
    let mut module = JsProcessingModule::new(init, start);

    let err = module.initialize().await.expect_err("not a promise");
    assert!(err.contains("Promise"));
}

#[wasm_bindgen_test]
async fn test_initialize_surfaces_rejection_reason() {
    let init = js_sys::Function::new_no_args("return Promise.reject(new Error('fetch failed'))");
    let start = js_sys::Function::new_no_args("");
    let mut module = JsProcessingModule::new(init, start);

    let err = module.initialize().await.expect_err("promise rejects");
    assert!(err.contains("fetch failed"));
}

#[wasm_bindgen_test]
fn test_start_passes_handle_and_ordered_backlog() {
    let init = js_sys::Function::new_no_args("return Promise.resolve(null)");
    let start = js_sys::Function::new_with_args(
        "handle, events",
        "globalThis.__forebaySeen = { handle: handle, count: events.length };",
    );
    let mut module = JsProcessingModule::new(init, start);

    let backlog = vec![
        web_sys::MessageEvent::new("message").expect("event"),
        web_sys::MessageEvent::new("message").expect("event"),
    ];
    module
        .start(JsValue::from_f64(7.0), backlog)
        .expect("start succeeds");

    let seen = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("__forebaySeen"))
        .expect("start recorded its arguments");
    let handle = js_sys::Reflect::get(&seen, &JsValue::from_str("handle")).expect("handle");
    let count = js_sys::Reflect::get(&seen, &JsValue::from_str("count")).expect("count");
    assert_eq!(handle.as_f64(), Some(7.0));
    assert_eq!(count.as_f64(), Some(2.0));
}
