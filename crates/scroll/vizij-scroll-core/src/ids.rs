//! Element handles as handed across the JS boundary.

use serde::{Deserialize, Serialize};

/// Handle returned by [`crate::ScrollEngine::add_element`]. Handles are assigned in
/// registration order and never reused within an engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Interpret a JS number as a handle. Only whole numbers in `u32` range qualify, so
    /// `NaN`, negatives and fractions never alias a live element.
    pub fn from_js_number(value: f64) -> Option<ElementId> {
        if value.fract() != 0.0 || !(0.0..=u32::MAX as f64).contains(&value) {
            return None;
        }
        Some(ElementId(value as u32))
    }

    /// The handle that follows this one.
    #[inline]
    pub(crate) fn next(self) -> ElementId {
        ElementId(self.0.wrapping_add(1))
    }
}
