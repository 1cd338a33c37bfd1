//! Diagnostic output.
//!
//! On wasm32 messages go to the browser console; native builds (tests,
//! tooling) route them through the `log` facade instead.

#[cfg(target_arch = "wasm32")]
pub(crate) fn log(message: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn log(message: &str) {
    log::debug!("{}", message);
}
