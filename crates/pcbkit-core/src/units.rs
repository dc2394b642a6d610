//! Unit conversion utilities
//!
//! CAM files declare their coordinates either in millimetres or inches.
//! Everything downstream of the interpreters works in millimetres.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Length unit declared by a CAM file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimetres (`%MOMM*%`, `G71`, `METRIC`)
    #[default]
    Millimeters,
    /// Inches (`%MOIN*%`, `G70`, `INCH`)
    Inches,
}

impl Units {
    /// Scale factor converting one file unit into millimetres
    pub fn mm_per_unit(self) -> f64 {
        match self {
            Self::Millimeters => 1.0,
            Self::Inches => MM_PER_INCH,
        }
    }

    /// Convert a value expressed in these units to millimetres
    pub fn to_mm(self, value: f64) -> f64 {
        value * self.mm_per_unit()
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeters => write!(f, "mm"),
            Self::Inches => write!(f, "in"),
        }
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "metric" | "millimeters" => Ok(Self::Millimeters),
            "in" | "inch" | "inches" | "imperial" => Ok(Self::Inches),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_factors() {
        assert_eq!(Units::Millimeters.mm_per_unit(), 1.0);
        assert_eq!(Units::Inches.mm_per_unit(), 25.4);
        assert!((Units::Inches.to_mm(0.1) - 2.54).abs() < 1e-12);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("MM".parse::<Units>(), Ok(Units::Millimeters));
        assert_eq!("inch".parse::<Units>(), Ok(Units::Inches));
        assert!("furlong".parse::<Units>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Units::Millimeters.to_string(), "mm");
        assert_eq!(Units::Inches.to_string(), "in");
    }
}
