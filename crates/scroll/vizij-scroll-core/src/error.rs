//! Errors surfaced while setting up an engine.
//!
//! Runtime operations (scroll, tick, scroll_to, ...) never fail; they degrade to no-ops.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScrollError {
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("config json parse error: {0}")]
    ConfigParse(String),
}
