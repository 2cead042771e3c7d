//! JavaScript processing module adapter
//!
//! Bridges the `ProcessingModule` contract onto a pair of JavaScript
//! functions: an init function returning a Promise that resolves to the
//! ready handle, and a batch-start function taking the handle plus the
//! queued events as an Array. This mirrors the wasm-bindgen loading shape
//! (`init().then(() => runModule(queued))`) worker scripts already use.

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::MessageEvent;

use forebay_core::ProcessingModule;

/// A processing module implemented on the JavaScript side
pub struct JsProcessingModule {
    init: js_sys::Function,
    start: js_sys::Function,
}

impl JsProcessingModule {
    /// Wrap the module's init and batch-start functions
    pub fn new(init: js_sys::Function, start: js_sys::Function) -> Self {
        Self { init, start }
    }
}

#[async_trait(?Send)]
impl ProcessingModule for JsProcessingModule {
    type Event = MessageEvent;
    type Handle = JsValue;
    type Error = String;

    async fn initialize(&mut self) -> Result<JsValue, String> {
        let value = self
            .init
            .call0(&JsValue::NULL)
            .map_err(|err| describe_js_error(&err))?;
        let promise: js_sys::Promise = value
            .dyn_into()
            .map_err(|_| "initialize must return a Promise".to_string())?;
        JsFuture::from(promise)
            .await
            .map_err(|err| describe_js_error(&err))
    }

    fn start(&mut self, handle: JsValue, backlog: Vec<MessageEvent>) -> Result<(), String> {
        let events = js_sys::Array::new();
        for event in &backlog {
            events.push(event.as_ref());
        }
        self.start
            .call2(&JsValue::NULL, &handle, &events)
            .map(|_| ())
            .map_err(|err| describe_js_error(&err))
    }
}

fn describe_js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        String::from(error.message())
    } else {
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"))
    }
}
