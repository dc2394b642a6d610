//! # Drill Interpreter
//!
//! A deliberately coarse Excellon reader. It understands tool definitions,
//! tool changes, unit headers and plain X/Y coordinate lines. Coordinates
//! are read as literal numbers in the file's units; zero-suppression
//! format codes and canned cycles are not decoded.

use std::collections::HashMap;
use std::sync::OnceLock;

use pcbkit_core::units::Units;
use pcbkit_core::{DrillHole, Point};
use regex::Regex;
use tracing::debug;

/// Diameter used for holes drilled without a known tool.
pub const DEFAULT_DRILL_DIAMETER_MM: f64 = 0.8;

fn tool_definition_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^T(\d+)(?:[FSBHZ][+-]?[\d.]+)*C([\d.]+)").expect("invalid regex pattern")
    })
}

fn tool_change_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^T(\d+)$").expect("invalid regex pattern"))
}

fn coordinate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:X([+-]?\d*\.?\d+))?(?:Y([+-]?\d*\.?\d+))?$")
            .expect("invalid regex pattern")
    })
}

/// True when a drill file name marks non-plated holes.
pub fn is_non_plated_name(name: &str) -> bool {
    name.to_ascii_lowercase().contains("npth")
}

fn is_non_plated_comment(line: &str) -> bool {
    line.contains("FileFunction") && line.contains("NonPlated")
}

/// Units from a `METRIC[,TZ]` or `INCH[,LZ]` header line.
fn header_units(line: &str) -> Option<Units> {
    let keyword = line.split(',').next()?;
    if keyword == "METRIC" || keyword == "INCH" {
        keyword.parse().ok()
    } else {
        None
    }
}

#[derive(Debug)]
struct DrillState {
    units: Units,
    tools: HashMap<u32, f64>,
    current_tool: Option<u32>,
    in_header: bool,
    position: Point,
    plated: bool,
    holes: Vec<DrillHole>,
}

impl DrillState {
    fn new(plated: bool) -> Self {
        Self {
            units: Units::Millimeters,
            tools: HashMap::new(),
            current_tool: None,
            in_header: false,
            position: Point::default(),
            plated,
            holes: Vec::new(),
        }
    }

    fn current_diameter(&self) -> f64 {
        self.current_tool
            .and_then(|t| self.tools.get(&t).copied())
            .unwrap_or(DEFAULT_DRILL_DIAMETER_MM)
    }

    /// Returns false once the end-of-program code is reached.
    fn process_line(&mut self, name: &str, line: &str) -> bool {
        if line.starts_with(';') {
            if is_non_plated_comment(line) {
                self.plated = false;
            }
            return true;
        }

        let upper = line.to_ascii_uppercase();
        if upper == "M48" {
            self.in_header = true;
            return true;
        }
        if upper == "%" || upper == "M95" {
            self.in_header = false;
            return true;
        }
        if upper == "M71" {
            self.units = Units::Millimeters;
            return true;
        }
        if upper == "M72" {
            self.units = Units::Inches;
            return true;
        }
        if let Some(units) = header_units(&upper) {
            self.units = units;
            return true;
        }
        if upper == "M30" || upper == "M00" {
            return false;
        }

        if let Some(caps) = tool_definition_regex().captures(&upper) {
            let tool = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            let diameter = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
            if let (Some(tool), Some(diameter)) = (tool, diameter) {
                self.tools.insert(tool, self.units.to_mm(diameter));
                // A definition outside the header also selects the tool.
                if !self.in_header {
                    self.current_tool = Some(tool);
                }
            }
            return true;
        }

        if let Some(caps) = tool_change_regex().captures(&upper) {
            let tool = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            self.current_tool = match tool {
                Some(0) | None => None,
                Some(t) => Some(t),
            };
            return true;
        }

        if upper.contains("G85") {
            debug!("{}: skipping slot {}", name, line);
            return true;
        }

        if let Some(caps) = coordinate_regex().captures(&upper) {
            let x = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
            let y = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
            if x.is_none() && y.is_none() {
                return true;
            }
            self.position = Point::new(
                x.map(|v| self.units.to_mm(v)).unwrap_or(self.position.x),
                y.map(|v| self.units.to_mm(v)).unwrap_or(self.position.y),
            );
            self.holes.push(DrillHole {
                position: self.position,
                diameter: self.current_diameter(),
                plated: self.plated,
            });
            return true;
        }

        debug!("{}: ignoring drill line {}", name, line);
        true
    }
}

/// Interpret the normalised text of one drill file.
///
/// Holes are plated unless the file name contains `NPTH` or the header
/// declares a non-plated file function.
pub fn interpret_drill(name: &str, text: &str) -> Vec<DrillHole> {
    let mut state = DrillState::new(!is_non_plated_name(name));
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !state.process_line(name, line) {
            break;
        }
    }
    debug!("{}: {} holes", name, state.holes.len());
    state.holes
}
