//! Aperture definitions (`%ADD...*%`) and the aperture table.

use std::collections::HashMap;
use std::sync::OnceLock;

use pcbkit_core::ApertureShape;
use regex::Regex;

fn definition_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^ADD(\d+)([A-Za-z_.$][A-Za-z0-9_.$\-]*)(?:,(.*))?$")
            .expect("invalid regex pattern")
    })
}

/// Parse an `AD` parameter into a code and a shape in millimetres.
///
/// Modifiers are scaled by `unit_scale`. Returns `None` if the parameter
/// is not an aperture definition or a standard template lacks its
/// required size.
pub fn parse_definition(param: &str, unit_scale: f64) -> Option<(u32, ApertureShape)> {
    let caps = definition_regex().captures(param)?;
    let code: u32 = caps.get(1)?.as_str().parse().ok()?;
    let template = caps.get(2)?.as_str();
    let modifiers: Vec<f64> = caps
        .get(3)
        .map(|m| {
            m.as_str()
                .split('X')
                .filter_map(|v| v.trim().parse::<f64>().ok())
                .collect()
        })
        .unwrap_or_default();
    let size = |i: usize| modifiers.get(i).map(|v| v * unit_scale);

    let shape = match template {
        "C" => ApertureShape::Circle { diameter: size(0)? },
        "R" => {
            let width = size(0)?;
            ApertureShape::Rectangle {
                width,
                height: size(1).unwrap_or(width),
            }
        }
        "O" => {
            let width = size(0)?;
            ApertureShape::Obround {
                width,
                height: size(1).unwrap_or(width),
            }
        }
        "P" => ApertureShape::Polygon {
            diameter: size(0)?,
            vertices: modifiers
                .get(1)
                .map(|v| v.round().clamp(3.0, 12.0) as u32)
                .unwrap_or(3),
            rotation_deg: modifiers.get(2).copied().unwrap_or(0.0),
        },
        other => ApertureShape::Other {
            template: other.to_string(),
            size: size(0),
        },
    };
    Some((code, shape))
}

/// Mapping from D-code to aperture shape.
#[derive(Debug, Clone, Default)]
pub struct ApertureTable {
    apertures: HashMap<u32, ApertureShape>,
}

impl ApertureTable {
    /// Register or redefine an aperture.
    pub fn define(&mut self, code: u32, shape: ApertureShape) {
        self.apertures.insert(code, shape);
    }

    pub fn get(&self, code: u32) -> Option<&ApertureShape> {
        self.apertures.get(&code)
    }

    pub fn len(&self) -> usize {
        self.apertures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apertures.is_empty()
    }

    /// Multiply every defined size by `factor`. Used when the file
    /// switches units after defining apertures.
    pub fn rescale(&mut self, factor: f64) {
        for shape in self.apertures.values_mut() {
            *shape = shape.scaled(factor);
        }
    }
}
