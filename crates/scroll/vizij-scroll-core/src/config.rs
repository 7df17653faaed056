//! Core configuration for vizij-scroll-core.

use serde::{Deserialize, Serialize};

use crate::error::ScrollError;
use crate::host::Capabilities;

/// Engine options. Field names are camelCase on the wire so JS option objects
/// (`{ lerp, isEnabled, isResizeObserverEnabled }`) deserialize as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollConfig {
    /// Smoothing factor applied once per frame, in (0, 1].
    pub lerp: f64,
    /// Explicit on/off. `None` falls back to feature detection.
    pub is_enabled: Option<bool>,
    /// Re-measure when a tracked element changes size, not only on viewport resize.
    pub is_resize_observer_enabled: bool,
    pub resize_debounce_ms: u32,
    /// Quiet period that ends a keyboard tabbing session.
    pub tab_debounce_ms: u32,
    /// Distance under which the interpolated position counts as settled.
    pub settle_threshold: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            lerp: 0.1,
            is_enabled: None,
            is_resize_observer_enabled: false,
            resize_debounce_ms: 200,
            tab_debounce_ms: 1000,
            settle_threshold: 0.001,
        }
    }
}

impl ScrollConfig {
    /// Parse a JSON options object, filling omitted fields with defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ScrollError> {
        let cfg: ScrollConfig =
            serde_json::from_str(s).map_err(|e| ScrollError::ConfigParse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ScrollError> {
        if !self.lerp.is_finite() || self.lerp <= 0.0 || self.lerp > 1.0 {
            return Err(ScrollError::InvalidConfig {
                field: "lerp",
                reason: format!("expected a value in (0, 1], got {}", self.lerp),
            });
        }
        if !self.settle_threshold.is_finite() || self.settle_threshold <= 0.0 {
            return Err(ScrollError::InvalidConfig {
                field: "settleThreshold",
                reason: format!("expected a positive value, got {}", self.settle_threshold),
            });
        }
        Ok(())
    }

    /// Effective enabled state: the explicit option wins, otherwise smooth scrolling is
    /// off on touch devices and when reduced motion is requested.
    pub fn resolve_enabled(&self, caps: &dyn Capabilities) -> bool {
        self.is_enabled
            .unwrap_or_else(|| !(caps.has_touch_support() || caps.prefers_reduced_motion()))
    }
}
