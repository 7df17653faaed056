//! Vizij Scroll Core (host-agnostic)
//!
//! Smooth scrolling over a native scroll container. The real scroll position keeps
//! driving the page; the engine keeps an interpolated copy of it and re-projects every
//! tracked block onto the viewport once per frame using that copy.
//!
//! Hosts (the wasm DOM adapter, test fakes) implement [`Host`] and forward native
//! events into [`ScrollEngine`]:
//! - scroll → [`ScrollEngine::handle_scroll`]
//! - window resize / element resize → [`ScrollEngine::handle_resize`] /
//!   [`ScrollEngine::handle_element_resize`]
//! - keydown / focusin → [`ScrollEngine::handle_key_down`] / [`ScrollEngine::handle_focus_in`]
//! - animation frame → [`ScrollEngine::tick`]
//! - delayed callbacks → [`ScrollEngine::handle_timer`]

pub mod bounds;
pub mod config;
pub mod debounce;
pub mod element;
pub mod engine;
pub mod error;
pub mod host;
pub mod ids;
pub mod math;
pub mod position;
pub mod style;

// Re-exports for consumers (adapters)
pub use bounds::Bounds;
pub use config::ScrollConfig;
pub use debounce::Debounce;
pub use element::{ChildTarget, ElementOptions, TrackedElement};
pub use engine::{ElementRef, ScrollEngine, ScrollOptions, ScrollState, ScrollTarget};
pub use error::ScrollError;
pub use host::{Capabilities, Host, ScrollBehavior, StaticCapabilities, TimerKind, TimerToken};
pub use ids::ElementId;
pub use position::{align_offset, relative_position, sticky_position, Align};
pub use style::{Extent, Positioning, StyleUpdate, Visibility, WillChange};
