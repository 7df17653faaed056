//! Alignment and sticky positioning math. Pure functions, no state.

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;

/// Anchor point inside a vertical extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Offset of the `align` anchor inside the extent starting at `top` with height `extent`.
#[inline]
pub fn align_offset(top: f64, extent: f64, align: Align) -> f64 {
    match align {
        Align::Top => top,
        Align::Middle => top + extent / 2.0,
        Align::Bottom => top + extent,
    }
}

/// Aligned anchor of `inner` expressed relative to the top of `outer`.
pub fn relative_position(inner: &Bounds, outer: &Bounds, align: Align) -> f64 {
    inner.top + align_offset(0.0, inner.height, align) - outer.top
}

/// Clamp a raw viewport offset so a block sticks inside the viewport band.
///
/// - fully scrolled past the top: keep moving with the content
/// - trailing edge above the viewport bottom: release, offset by the viewport gap
/// - otherwise: pin the leading edge to the viewport top
pub fn sticky_position(position: f64, height: f64, viewport_height: f64) -> f64 {
    if position + height <= 0.0 {
        return position;
    }

    if height + position < viewport_height {
        return -(viewport_height - (height + position));
    }

    position.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_offset_anchors() {
        for h in [0.0, 1.0, 250.0, 999.5] {
            assert_eq!(align_offset(40.0, h, Align::Top), 40.0);
            assert_eq!(align_offset(40.0, h, Align::Middle), 40.0 + h / 2.0);
            assert_eq!(align_offset(40.0, h, Align::Bottom), 40.0 + h);
        }
    }

    #[test]
    fn align_wire_names() {
        let parsed: Vec<Align> = serde_json::from_str(r#"["top", "middle", "bottom"]"#).unwrap();
        assert_eq!(parsed, vec![Align::Top, Align::Middle, Align::Bottom]);
        assert!(serde_json::from_str::<Align>(r#""center""#).is_err());
    }

    #[test]
    fn relative_position_uses_inner_anchor() {
        let outer = Bounds::new(100.0, 0.0, 500.0, 1000.0);
        let inner = Bounds::new(350.0, 0.0, 500.0, 60.0);
        assert_eq!(relative_position(&inner, &outer, Align::Top), 250.0);
        assert_eq!(relative_position(&inner, &outer, Align::Middle), 280.0);
        assert_eq!(relative_position(&inner, &outer, Align::Bottom), 310.0);
        assert_eq!(relative_position(&outer, &outer, Align::Top), 0.0);
    }

    #[test]
    fn sticky_branches() {
        let vh = 800.0;
        let h = 1200.0;
        // entering from below: leading edge follows content
        assert_eq!(sticky_position(300.0, h, vh), 300.0);
        // leading edge past the top: pinned at 0
        assert_eq!(sticky_position(-100.0, h, vh), 0.0);
        // trailing edge above viewport bottom: released by the gap
        assert_eq!(sticky_position(-500.0, h, vh), -100.0);
        // fully gone
        assert_eq!(sticky_position(-1300.0, h, vh), -1300.0);
    }

    #[test]
    fn sticky_pin_boundary_is_continuous_for_tall_blocks() {
        let vh = 800.0;
        for h in [800.0, 1200.0, 2400.0] {
            // height + position == viewport_height
            let p = vh - h;
            let at = sticky_position(p, h, vh);
            let past = sticky_position(p - 1e-6, h, vh);
            assert!((at - past).abs() < 1e-5, "h={h} at={at} past={past}");
        }
    }

    #[test]
    fn sticky_release_boundary_is_continuous_when_block_fills_viewport() {
        let vh = 800.0;
        let h = 800.0;
        // position + height == 0
        let at = sticky_position(-h, h, vh);
        let before = sticky_position(-h + 1e-6, h, vh);
        assert!((at - before).abs() < 1e-5, "at={at} before={before}");
    }
}
