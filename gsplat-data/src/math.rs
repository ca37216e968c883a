//! Per-field transforms applied while decoding splat records.

use glam::Vec4;

/// Identity rotation in PLY storage order (`rot_0` holds `w`).
pub const IDENTITY_ROTATION: Vec4 = Vec4::new(1.0, 0.0, 0.0, 0.0);

/// Logistic sigmoid, maps stored opacity logits into `(0, 1)`.
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Normalize a stored rotation quaternion to unit length.
///
/// Returns `None` when the quaternion has zero (or non-finite) length and
/// cannot be normalized.
pub fn normalize_rotation(rotation: Vec4) -> Option<Vec4> {
    rotation.try_normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_midpoint() {
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn test_sigmoid_monotonic_and_bounded() {
        // f32 resolves strict growth only near the origin.
        let mut prev = 0.0;
        for step in -32..=32 {
            let value = sigmoid(step as f32 * 0.25);
            assert!(value > 0.0 && value < 1.0, "sigmoid out of range: {value}");
            assert!(value > prev, "sigmoid not increasing at step {step}");
            prev = value;
        }

        // Saturates to 1.0 for large inputs but never leaves [0, 1].
        let mut prev = 0.0;
        for step in -160..=160 {
            let value = sigmoid(step as f32 * 0.25);
            assert!((0.0..=1.0).contains(&value), "sigmoid out of range: {value}");
            assert!(value >= prev, "sigmoid decreasing at step {step}");
            prev = value;
        }
    }

    #[test]
    fn test_normalize_rotation() {
        let q = normalize_rotation(Vec4::new(2.0, 0.0, 0.0, 0.0)).unwrap();
        assert_eq!(q, Vec4::X);

        let q = normalize_rotation(Vec4::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert!((q.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_zero_rotation() {
        assert!(normalize_rotation(Vec4::ZERO).is_none());
        assert!(normalize_rotation(Vec4::splat(f32::NAN)).is_none());
    }
}
