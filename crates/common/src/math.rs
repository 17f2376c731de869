use glam::Vec2;

/// Vector helpers on top of `glam::Vec2`.
///
/// `glam` already provides sum, scale, subtraction and length through its
/// operators; this adds the direction extraction the movement resolver needs.
pub trait VecExt {
    /// Unit vector pointing along `self`.
    ///
    /// A zero-length or non-finite vector has no direction and yields
    /// `Vec2::ZERO` instead of NaN.
    fn direction(self) -> Vec2;

    /// True when both components are exactly zero.
    fn is_zero(self) -> bool;
}

impl VecExt for Vec2 {
    fn direction(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            self / len
        } else {
            Vec2::ZERO
        }
    }

    fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_of_axis_vector() {
        assert_eq!(Vec2::new(50.0, 0.0).direction(), Vec2::X);
        assert_eq!(Vec2::new(0.0, -3.0).direction(), Vec2::NEG_Y);
    }

    #[test]
    fn direction_is_unit_length() {
        let d = Vec2::new(3.0, 4.0).direction();
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!((d.x - 0.6).abs() < 1e-6);
        assert!((d.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_has_zero_direction() {
        let d = Vec2::ZERO.direction();
        assert_eq!(d, Vec2::ZERO);
        assert!(!d.x.is_nan() && !d.y.is_nan());
    }

    #[test]
    fn non_finite_vector_has_zero_direction() {
        assert_eq!(Vec2::new(f32::INFINITY, 0.0).direction(), Vec2::ZERO);
        assert_eq!(Vec2::new(f32::NAN, 1.0).direction(), Vec2::ZERO);
    }

    #[test]
    fn is_zero_detects_exact_zero() {
        assert!(Vec2::ZERO.is_zero());
        assert!(!Vec2::new(0.0, 1e-9).is_zero());
    }
}
