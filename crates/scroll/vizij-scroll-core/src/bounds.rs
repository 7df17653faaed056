//! Measured element boxes.

use serde::{Deserialize, Serialize};

/// Snapshot of an element box.
///
/// Hosts report boxes relative to the viewport. Once stored on a tracked element
/// `top` has been shifted into document space (viewport top + real scroll offset at
/// measurement time); the remaining fields are kept as reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl Bounds {
    /// Box at (`left`, `top`) with the given size; `x`/`y` mirror `left`/`top`.
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
            x: left,
            y: top,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Shift a viewport-relative box into document space.
    pub fn to_document_space(self, scroll_position: f64) -> Self {
        Self {
            top: self.top + scroll_position,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_space_only_moves_top() {
        let b = Bounds::new(-40.0, 8.0, 300.0, 120.0).to_document_space(500.0);
        assert_eq!(b.top, 460.0);
        assert_eq!(b.y, -40.0);
        assert_eq!(b.left, 8.0);
        assert_eq!(b.bottom(), 580.0);
        assert_eq!(b.right(), 308.0);
    }
}
