//! Coordinate format (`%FS...*%`) and fixed-point coordinate decoding.

use std::sync::OnceLock;

use regex::Regex;

/// Which zeros a file omits from its integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroOmission {
    #[default]
    Leading,
    Trailing,
}

/// Digit counts for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisFormat {
    pub integer: u32,
    pub decimal: u32,
}

/// The declared coordinate format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateFormat {
    pub zeros: ZeroOmission,
    pub x: AxisFormat,
    pub y: AxisFormat,
}

impl Default for CoordinateFormat {
    /// 2.4 leading-zero omission, the historical default for files that
    /// never declare a format.
    fn default() -> Self {
        let axis = AxisFormat {
            integer: 2,
            decimal: 4,
        };
        Self {
            zeros: ZeroOmission::Leading,
            x: axis,
            y: axis,
        }
    }
}

/// Axis a coordinate belongs to. `I` offsets use the X format, `J` the Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

fn format_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^FS([LTD]?)([AI]?)(?:N\d)?(?:G\d)?X(\d)(\d)Y(\d)(\d)")
            .expect("invalid regex pattern")
    })
}

impl CoordinateFormat {
    /// Parse the body of an `FS` parameter, e.g. `FSLAX26Y26`.
    pub fn parse(param: &str) -> Option<Self> {
        let caps = format_regex().captures(param)?;
        let digit = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        let zeros = match caps.get(1).map(|m| m.as_str()) {
            Some("T") => ZeroOmission::Trailing,
            _ => ZeroOmission::Leading,
        };
        Some(Self {
            zeros,
            x: AxisFormat {
                integer: digit(3)?,
                decimal: digit(4)?,
            },
            y: AxisFormat {
                integer: digit(5)?,
                decimal: digit(6)?,
            },
        })
    }

    fn axis(&self, axis: Axis) -> AxisFormat {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Decode a coordinate literal to millimetres.
    ///
    /// Integer literals are fixed point: `sign * digits / 10^decimal`,
    /// with trailing-zero-omitted literals padded on the right first.
    /// Literals containing a decimal point are read as plain numbers.
    /// The result is multiplied by `unit_scale` (mm per file unit).
    pub fn decode(&self, literal: &str, axis: Axis, unit_scale: f64) -> Option<f64> {
        let literal = literal.trim();
        if literal.contains('.') {
            let value: f64 = literal.parse().ok()?;
            return value.is_finite().then_some(value * unit_scale);
        }

        let (sign, digits) = match literal.as_bytes().first()? {
            b'-' => (-1.0, &literal[1..]),
            b'+' => (1.0, &literal[1..]),
            _ => (1.0, literal),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let fmt = self.axis(axis);
        let total = (fmt.integer + fmt.decimal) as usize;
        let padded;
        let digits = if self.zeros == ZeroOmission::Trailing && digits.len() < total {
            padded = format!("{:0<width$}", digits, width = total);
            padded.as_str()
        } else {
            digits
        };

        let raw: f64 = digits.parse().ok()?;
        Some(sign * raw / 10f64.powi(fmt.decimal as i32) * unit_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        let fmt = CoordinateFormat::parse("FSLAX26Y25").unwrap();
        assert_eq!(fmt.zeros, ZeroOmission::Leading);
        assert_eq!(fmt.x, AxisFormat { integer: 2, decimal: 6 });
        assert_eq!(fmt.y, AxisFormat { integer: 2, decimal: 5 });

        let fmt = CoordinateFormat::parse("FSTAX24Y24").unwrap();
        assert_eq!(fmt.zeros, ZeroOmission::Trailing);

        assert!(CoordinateFormat::parse("FSLA").is_none());
    }

    #[test]
    fn test_decode_leading_zero_omission() {
        let fmt = CoordinateFormat::parse("FSLAX26Y26").unwrap();
        assert_eq!(fmt.decode("1500000", Axis::X, 1.0), Some(1.5));
        assert_eq!(fmt.decode("-250000", Axis::Y, 1.0), Some(-0.25));
        assert_eq!(fmt.decode("+0", Axis::Y, 1.0), Some(0.0));
    }

    #[test]
    fn test_decode_inches() {
        let fmt = CoordinateFormat::parse("FSLAX24Y24").unwrap();
        let v = fmt.decode("10000", Axis::X, 25.4).unwrap();
        assert!((v - 25.4).abs() < 1e-12);
    }

    #[test]
    fn test_decode_trailing_zero_omission() {
        let fmt = CoordinateFormat::parse("FSTAX24Y24").unwrap();
        // "15" padded to six digits is 150000, i.e. 15.0000
        assert_eq!(fmt.decode("15", Axis::X, 1.0), Some(15.0));
    }

    #[test]
    fn test_decode_decimal_literal() {
        let fmt = CoordinateFormat::default();
        assert_eq!(fmt.decode("1.25", Axis::X, 1.0), Some(1.25));
        assert_eq!(fmt.decode("-0.5", Axis::Y, 2.0), Some(-1.0));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let fmt = CoordinateFormat::default();
        assert_eq!(fmt.decode("", Axis::X, 1.0), None);
        assert_eq!(fmt.decode("-", Axis::X, 1.0), None);
        assert_eq!(fmt.decode("12a4", Axis::X, 1.0), None);
    }
}
