//! Host contracts: platform queries, render primitive, frame and timer scheduling.
//!
//! The engine never talks to a platform directly. Adapters (the wasm crate's DOM host,
//! test fakes) implement [`Host`] and forward platform events back into the engine.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::style::StyleUpdate;

/// How a real scroll request should move the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Jump immediately; the interpolation layer animates the visual transition.
    Instant,
    /// Let the platform animate the scroll itself.
    Smooth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    Resize,
    Tabbing,
}

/// Payload of a delayed callback. Hosts hand it back to
/// [`crate::ScrollEngine::handle_timer`] once the delay has elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub generation: u64,
}

pub trait Host {
    /// Opaque node reference. Equality must be identity.
    type Node: Clone + PartialEq + Debug;

    /// Real (native) scroll offset of the viewport.
    fn scroll_position(&self) -> f64;

    fn viewport_height(&self) -> f64;

    /// Live viewport-relative box of `node`, or `None` when it is detached.
    fn bounding_box(&self, node: &Self::Node) -> Option<Bounds>;

    /// True when `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// `root` itself or a descendant carrying identifier `id`.
    fn find_by_id(&self, root: &Self::Node, id: &str) -> Option<Self::Node>;

    fn apply_style(&mut self, node: &Self::Node, style: &StyleUpdate);

    fn request_scroll(&mut self, position: f64, behavior: ScrollBehavior);

    /// Subscribe to (`true`) or leave (`false`) the per-frame hook. While subscribed the
    /// host calls [`crate::ScrollEngine::tick`] once per animation frame.
    fn set_ticker(&mut self, active: bool);

    /// Call [`crate::ScrollEngine::handle_timer`] with `token` after `delay_ms`.
    fn schedule_timer(&mut self, token: TimerToken, delay_ms: u32);

    /// Start reporting size changes of `node` through
    /// [`crate::ScrollEngine::handle_element_resize`].
    fn observe_size(&mut self, _node: &Self::Node) {}

    fn unobserve_size(&mut self, _node: &Self::Node) {}

    /// Drop every event subscription. Called once on teardown.
    fn detach(&mut self) {}
}

/// Platform feature flags used to pick the default enabled state.
pub trait Capabilities {
    fn has_touch_support(&self) -> bool;
    fn prefers_reduced_motion(&self) -> bool;
}

/// Fixed answers, for tests and hosts that already know their environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaticCapabilities {
    pub touch: bool,
    pub reduced_motion: bool,
}

impl Capabilities for StaticCapabilities {
    fn has_touch_support(&self) -> bool {
        self.touch
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}
