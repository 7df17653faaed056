//! Numeric helpers shared by the interpolation loop and the transform pipeline.

/// Exponential step from `current` toward `target` by `factor`.
#[inline]
pub fn lerp(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// Clamp `value` into `[min, max]`. Argument order follows `clamp(min, max, value)`.
#[inline]
pub fn clamp(min: f64, max: f64, value: f64) -> f64 {
    value.max(min).min(max)
}

/// Map `value` from the domain `[from, to]` onto `[0, 1]` (unclamped).
///
/// `from` may be greater than `to`; the result then grows as `value` decreases.
/// A degenerate domain maps everything to 0.
#[inline]
pub fn normalize(from: f64, to: f64, value: f64) -> f64 {
    let span = to - from;
    if span == 0.0 {
        return 0.0;
    }
    (value - from) / span
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
        assert_eq!(lerp(10.0, 20.0, 0.1), 11.0);
    }

    #[test]
    fn clamp_orders_arguments_min_max_value() {
        assert_eq!(clamp(0.0, 1.0, 2.0), 1.0);
        assert_eq!(clamp(0.0, 1.0, -2.0), 0.0);
        assert_eq!(clamp(-100.0, 800.0, 42.0), 42.0);
    }

    #[test]
    fn normalize_reversed_domain() {
        // leading edge (viewport bottom) is 0, trailing edge (fully above) is 1
        assert_eq!(normalize(800.0, -200.0, 800.0), 0.0);
        assert_eq!(normalize(800.0, -200.0, -200.0), 1.0);
        assert_eq!(normalize(800.0, -200.0, 300.0), 0.5);
        assert_eq!(normalize(5.0, 5.0, 3.0), 0.0);
    }
}
