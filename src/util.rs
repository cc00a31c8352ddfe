// Console logging helpers
use std::cell::Cell;
use wasm_bindgen::JsValue;

thread_local! {
    static DEBUG_LOG: Cell<bool> = const { Cell::new(false) };
}

pub fn set_debug_log(on: bool) {
    DEBUG_LOG.with(|f| f.set(on));
}

/// Debug log; silent unless enabled through config.
pub fn clog(msg: &str) {
    if DEBUG_LOG.with(|f| f.get()) {
        web_sys::console::log_1(&JsValue::from_str(msg));
    }
}

pub fn cwarn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}
