//! Per-renderer draw settings.

use serde::{Deserialize, Serialize};

/// Settings a host exposes on each splat renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Requested SH degree (0-3), limited by what the asset stores.
    pub sh_degree: u8,
    /// Convert gamma-space colours to linear in the shader.
    pub gamma_to_linear: bool,
    /// Multiplier on splat footprint (0-2).
    pub splat_size_scale: f32,
    /// Clip-space cutoff for splat centers (0-2).
    pub clip_xy: f32,
    /// Animated jitter speed (0-1).
    pub movement_speed: f32,
    /// Animated jitter amplitude (0-0.1).
    pub movement_scale: f32,
    /// HDR output multiplier (0.1-10).
    pub hdr_intensity_scale: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            sh_degree: 3,
            gamma_to_linear: false,
            splat_size_scale: 1.0,
            clip_xy: 1.4,
            movement_speed: 0.5,
            movement_scale: 0.02,
            hdr_intensity_scale: 1.0,
        }
    }
}

impl RenderSettings {
    /// Clamp every field into its supported range.
    pub fn sanitized(&self) -> Self {
        Self {
            sh_degree: self.sh_degree.min(gsplat_data::MAX_SH_BANDS),
            gamma_to_linear: self.gamma_to_linear,
            splat_size_scale: clamp_finite(self.splat_size_scale, 0.0, 2.0),
            clip_xy: clamp_finite(self.clip_xy, 0.0, 2.0),
            movement_speed: clamp_finite(self.movement_speed, 0.0, 1.0),
            movement_scale: clamp_finite(self.movement_scale, 0.0, 0.1),
            hdr_intensity_scale: clamp_finite(self.hdr_intensity_scale, 0.1, 10.0),
        }
    }
}

// NaN clamps to the lower bound.
fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let settings = RenderSettings::default();
        assert_eq!(settings.sanitized(), settings);
    }

    #[test]
    fn test_sanitized_clamps() {
        let settings = RenderSettings {
            sh_degree: 9,
            splat_size_scale: -1.0,
            clip_xy: 5.0,
            movement_speed: f32::NAN,
            movement_scale: 1.0,
            hdr_intensity_scale: 0.0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(settings.sh_degree, 3);
        assert_eq!(settings.splat_size_scale, 0.0);
        assert_eq!(settings.clip_xy, 2.0);
        assert_eq!(settings.movement_speed, 0.0);
        assert_eq!(settings.movement_scale, 0.1);
        assert_eq!(settings.hdr_intensity_scale, 0.1);
    }

    #[test]
    fn test_partial_json() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{"sh_degree": 1, "gamma_to_linear": true}"#).unwrap();
        assert_eq!(settings.sh_degree, 1);
        assert!(settings.gamma_to_linear);
        assert_eq!(settings.clip_xy, 1.4);
    }
}
