//! Tuning knobs for the polygonizer.

use serde::{Deserialize, Serialize};

/// Polygonizer parameters. Lengths are millimetres, angles degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonizeOptions {
    /// Vertex count of circular flashes.
    pub flash_segments: u32,
    /// Segments per semicircular track end cap.
    pub cap_segments: u32,
    /// Largest join scale before a join is bevelled.
    pub miter_limit: f64,
    /// Grid that track endpoints snap to when chaining.
    pub quantize_grid_mm: f64,
    /// Consecutive centreline points closer than this are merged.
    pub duplicate_epsilon_mm: f64,
    /// Turns sharper than this survive centreline simplification.
    pub collinear_angle_deg: f64,
    /// Largest angle between flattened arc points.
    pub arc_step_deg: f64,
    /// Diameter used for flashes without a resolvable aperture size.
    pub default_flash_diameter_mm: f64,
}

impl Default for PolygonizeOptions {
    fn default() -> Self {
        Self {
            flash_segments: 32,
            cap_segments: 16,
            miter_limit: 4.0,
            quantize_grid_mm: 0.001,
            duplicate_epsilon_mm: 1e-4,
            collinear_angle_deg: 1.0,
            arc_step_deg: 5.0,
            default_flash_diameter_mm: 0.8,
        }
    }
}

impl PolygonizeOptions {
    /// Describe the first out-of-range field, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.flash_segments < 3 {
            return Err("flash_segments must be at least 3".to_string());
        }
        if self.cap_segments < 1 {
            return Err("cap_segments must be at least 1".to_string());
        }
        if self.miter_limit.is_nan() || self.miter_limit < 1.0 {
            return Err("miter_limit must be at least 1.0".to_string());
        }
        let positive = [
            ("quantize_grid_mm", self.quantize_grid_mm),
            ("duplicate_epsilon_mm", self.duplicate_epsilon_mm),
            ("arc_step_deg", self.arc_step_deg),
            ("default_flash_diameter_mm", self.default_flash_diameter_mm),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{} must be positive", name));
            }
        }
        if !(0.0..90.0).contains(&self.collinear_angle_deg) {
            return Err("collinear_angle_deg must be in [0, 90)".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PolygonizeOptions::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let opts = PolygonizeOptions {
            flash_segments: 2,
            ..Default::default()
        };
        assert!(opts.validate().is_err());

        let opts = PolygonizeOptions {
            miter_limit: f64::NAN,
            ..Default::default()
        };
        assert!(opts.validate().is_err());

        let opts = PolygonizeOptions {
            arc_step_deg: 0.0,
            ..Default::default()
        };
        assert!(opts.validate().unwrap_err().contains("arc_step_deg"));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let opts: PolygonizeOptions = serde_json::from_str(r#"{"flash_segments": 64}"#).unwrap();
        assert_eq!(opts.flash_segments, 64);
        assert_eq!(opts.cap_segments, 16);
    }
}
