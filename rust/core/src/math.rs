// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric helpers shared by the ledger and the animator

use nalgebra::{Point3, Vector3};
use serde::Serialize;

/// Magnitudes below this are floating-point noise and snap to zero
pub const SNAP_EPSILON: f64 = 1e-10;

/// Decimal places kept for positions (millimetre precision)
pub const POSITION_DECIMALS: i32 = 3;

/// Round to `decimals` places and snap near-zero values to exactly zero
#[inline]
pub fn round_and_sanitize(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded.abs() < SNAP_EPSILON {
        0.0
    } else {
        rounded
    }
}

/// Apply [`round_and_sanitize`] to every coordinate of a point
#[inline]
pub fn sanitize_point(point: Point3<f64>) -> Point3<f64> {
    point.map(|c| round_and_sanitize(c, POSITION_DECIMALS))
}

/// Which axes of a vector were affected by an operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Axes {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl Axes {
    /// True when no axis is flagged
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.x || self.y || self.z)
    }
}

/// Replace NaN components by zero, reporting which axes were replaced
pub fn coerce_nan(vector: Vector3<f64>) -> (Vector3<f64>, Axes) {
    let axes = Axes {
        x: vector.x.is_nan(),
        y: vector.y.is_nan(),
        z: vector.z.is_nan(),
    };
    let coerced = vector.map(|c| if c.is_nan() { 0.0 } else { c });
    (coerced, axes)
}

/// Quintic ease-in-out: zero velocity at both ends, `f(0.5) = 0.5`
#[inline]
pub fn ease_in_out_quint(x: f64) -> f64 {
    if x < 0.5 {
        16.0 * x * x * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(5) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_round_keeps_three_decimals() {
        assert_eq!(round_and_sanitize(12.34567, 3), 12.346);
        assert_eq!(round_and_sanitize(-0.0004, 3), 0.0);
        assert_eq!(round_and_sanitize(1e-12, 3), 0.0);
    }

    #[test]
    fn test_round_snaps_negative_zero() {
        let v = round_and_sanitize(-1e-11, 3);
        assert_eq!(v, 0.0);
        assert!(v.is_sign_positive());
    }

    #[test]
    fn test_coerce_nan_reports_axes() {
        let (v, axes) = coerce_nan(Vector3::new(1.0, f64::NAN, 3.0));
        assert_eq!(v, Vector3::new(1.0, 0.0, 3.0));
        assert_eq!(
            axes,
            Axes {
                x: false,
                y: true,
                z: false
            }
        );
        assert!(coerce_nan(Vector3::new(0.0, 0.0, 0.0)).1.is_empty());
    }

    #[test]
    fn test_easing_fixed_points() {
        assert_eq!(ease_in_out_quint(0.0), 0.0);
        assert_eq!(ease_in_out_quint(1.0), 1.0);
        assert_abs_diff_eq!(ease_in_out_quint(0.5), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_easing_is_monotonic() {
        let mut previous = ease_in_out_quint(0.0);
        for i in 1..=1000 {
            let current = ease_in_out_quint(i as f64 / 1000.0);
            assert!(current >= previous, "decreasing at step {}", i);
            previous = current;
        }
    }

    #[test]
    fn test_easing_is_flat_at_ends() {
        let h = 1e-4;
        assert!(ease_in_out_quint(h) / h < 1e-10);
        assert!((1.0 - ease_in_out_quint(1.0 - h)) / h < 1e-10);
    }
}
