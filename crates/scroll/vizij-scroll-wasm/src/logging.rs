//! Console bridge for the `log` facade.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug => web_sys::console::debug_1(&line),
            Level::Trace => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Route `log` records to the browser console.
///
/// `level` is one of `off`, `error`, `warn`, `info`, `debug`, `trace` (default `warn`).
/// Calling it again only changes the level.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) -> Result<(), JsError> {
    let filter = match level.as_deref() {
        None => LevelFilter::Warn,
        Some(s) => s
            .parse::<LevelFilter>()
            .map_err(|e| JsError::new(&format!("log level error: {e}")))?,
    };
    // already installed on repeat calls
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
    Ok(())
}
