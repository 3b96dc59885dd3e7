//! Vector helpers on top of [`glam::Vec2`].
//!
//! glam already covers arithmetic and distances. What lives here are the
//! few conventions the game needs on top: normalization that never yields NaN,
//! heading/vector conversion, and clamping a body of a given size to a
//! rectangle.

use glam::Vec2;

/// Fallback direction for zero-length vectors: straight down the screen.
pub const DEFAULT_DIRECTION: Vec2 = Vec2::new(0.0, 1.0);

/// Normalizes `v`, returning `fallback` when `v` has no usable length.
///
/// # Example
///
/// ```
/// use barrage_core::geometry::normalize_or;
/// use glam::Vec2;
///
/// assert_eq!(normalize_or(Vec2::new(3.0, 0.0), Vec2::Y), Vec2::X);
/// assert_eq!(normalize_or(Vec2::ZERO, Vec2::Y), Vec2::Y);
/// ```
#[must_use]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(fallback)
}

/// Normalizes `v`, falling back to [`DEFAULT_DIRECTION`].
#[must_use]
pub fn safe_normalize(v: Vec2) -> Vec2 {
    normalize_or(v, DEFAULT_DIRECTION)
}

/// Unit vector pointing along `angle` (radians, screen coordinates).
#[must_use]
pub fn from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Heading of `v` in radians, as `atan2(y, x)`.
#[must_use]
pub fn heading_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Clamps the center of a body of diameter `size` so it stays within
/// `[0, width] x [0, height]`.
#[must_use]
pub fn clamp_to_canvas(pos: Vec2, size: f32, width: f32, height: f32) -> Vec2 {
    let half = size / 2.0;
    Vec2::new(
        pos.x.clamp(half, (width - half).max(half)),
        pos.y.clamp(half, (height - half).max(half)),
    )
}

/// Componentwise sign with zero mapped to zero.
#[must_use]
pub fn sign0(v: Vec2) -> Vec2 {
    Vec2::new(signum0(v.x), signum0(v.y))
}

fn signum0(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn normalize_handles_zero_and_nan() {
        assert_eq!(safe_normalize(Vec2::ZERO), DEFAULT_DIRECTION);
        assert_eq!(safe_normalize(Vec2::new(f32::NAN, 1.0)), DEFAULT_DIRECTION);
        let n = safe_normalize(Vec2::new(0.0, -5.0));
        assert!((n - Vec2::new(0.0, -1.0)).length() < 0.0001);
    }

    #[test]
    fn angle_round_trip() {
        let v = from_angle(PI / 2.0);
        assert!(v.x.abs() < 0.0001);
        assert!((v.y - 1.0).abs() < 0.0001);
        assert!((heading_of(Vec2::new(-1.0, 0.0)) - PI).abs() < 0.0001);
    }

    #[test]
    fn clamp_keeps_body_on_canvas() {
        let p = clamp_to_canvas(Vec2::new(-10.0, 700.0), 30.0, 1000.0, 600.0);
        assert_eq!(p, Vec2::new(15.0, 585.0));
    }

    #[test]
    fn sign_maps_zero_to_zero() {
        assert_eq!(sign0(Vec2::new(-3.0, 0.0)), Vec2::new(-1.0, 0.0));
        assert_eq!(sign0(Vec2::new(0.5, 2.0)), Vec2::new(1.0, 1.0));
    }
}
