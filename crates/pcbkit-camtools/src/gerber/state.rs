//! Modal interpreter state for a single Gerber parse pass.

use std::sync::OnceLock;

use pcbkit_core::units::Units;
use pcbkit_core::{
    ring_signed_area, ArcStroke, Flash, GerberPrimitives, Point, Region, Track, MIN_RING_AREA_MM2,
};
use regex::Regex;
use tracing::debug;

use super::aperture::{parse_definition, ApertureTable};
use super::format::{Axis, CoordinateFormat};
use super::scanner::Block;

/// Track width used when the selected aperture has no resolvable size.
pub const DEFAULT_TRACK_WIDTH_MM: f64 = 0.1;

/// Step used to flatten arcs into region contours.
const REGION_ARC_STEP_DEG: f64 = 5.0;

const CLOSE_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interpolation {
    Linear,
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Draw,
    Move,
    Flash,
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Z])([+-]?(?:\d+\.?\d*|\.\d+))").expect("invalid regex pattern")
    })
}

/// Parsed letters of one command word.
#[derive(Debug, Default)]
struct Command<'a> {
    g: Vec<u32>,
    d: Option<u32>,
    m: Option<u32>,
    x: Option<&'a str>,
    y: Option<&'a str>,
    i: Option<&'a str>,
    j: Option<&'a str>,
}

impl<'a> Command<'a> {
    fn parse(word: &'a str) -> Self {
        let mut cmd = Command::default();
        for caps in token_regex().captures_iter(word) {
            let (Some(letter), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let value = value.as_str();
            match letter.as_str() {
                "G" => cmd.g.extend(value.parse::<u32>().ok()),
                "D" => cmd.d = value.parse().ok(),
                "M" => cmd.m = value.parse().ok(),
                "X" => cmd.x = Some(value),
                "Y" => cmd.y = Some(value),
                "I" => cmd.i = Some(value),
                "J" => cmd.j = Some(value),
                _ => {}
            }
        }
        cmd
    }

    fn has_coordinates(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.i.is_some() || self.j.is_some()
    }
}

/// Everything the interpreter remembers between commands.
///
/// One value is created per file and dropped once the primitives are
/// taken, so concurrent parses never share state.
#[derive(Debug)]
pub struct ParserState {
    name: String,
    format: CoordinateFormat,
    units: Units,
    position: Point,
    apertures: ApertureTable,
    current_aperture: Option<u32>,
    interpolation: Interpolation,
    quadrant: Quadrant,
    last_operation: Option<Operation>,
    region_mode: bool,
    contour: Vec<Point>,
    contours: Vec<Vec<Point>>,
    finished: bool,
    output: GerberPrimitives,
}

impl ParserState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: CoordinateFormat::default(),
            units: Units::Millimeters,
            position: Point::default(),
            apertures: ApertureTable::default(),
            current_aperture: None,
            interpolation: Interpolation::Linear,
            quadrant: Quadrant::Multi,
            last_operation: None,
            region_mode: false,
            contour: Vec::new(),
            contours: Vec::new(),
            finished: false,
            output: GerberPrimitives::default(),
        }
    }

    /// Millimetres per file unit.
    pub fn unit_scale(&self) -> f64 {
        self.units.mm_per_unit()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn current_aperture(&self) -> Option<u32> {
        self.current_aperture
    }

    pub fn apertures(&self) -> &ApertureTable {
        &self.apertures
    }

    pub fn in_region(&self) -> bool {
        self.region_mode
    }

    /// True once `M02` has been seen; later blocks are ignored.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn process(&mut self, block: &Block) {
        if self.finished {
            return;
        }
        match block {
            Block::Param(param) => self.process_param(param),
            Block::Word(word) => self.process_word(word),
        }
    }

    /// Close any open region and hand over the primitives.
    pub fn finish(mut self) -> GerberPrimitives {
        if self.region_mode {
            debug!("{}: closing unterminated region at end of file", self.name);
            self.end_region();
        }
        self.output
    }

    fn set_units(&mut self, units: Units) {
        if units == self.units {
            return;
        }
        let factor = units.mm_per_unit() / self.units.mm_per_unit();
        if !self.apertures.is_empty() {
            debug!(
                "{}: units changed to {} after {} aperture definitions, rescaling",
                self.name,
                units,
                self.apertures.len()
            );
            self.apertures.rescale(factor);
        }
        self.units = units;
    }

    fn process_param(&mut self, param: &str) {
        if param.starts_with("FS") {
            match CoordinateFormat::parse(param) {
                Some(format) => self.format = format,
                None => debug!("{}: unreadable format spec {}", self.name, param),
            }
        } else if param.starts_with("MO") {
            match param[2..].parse::<Units>() {
                Ok(units) => self.set_units(units),
                Err(e) => debug!("{}: {}", self.name, e),
            }
        } else if param.starts_with("AD") {
            match parse_definition(param, self.unit_scale()) {
                Some((code, shape)) => self.apertures.define(code, shape),
                None => debug!("{}: skipping aperture definition {}", self.name, param),
            }
        } else {
            debug!("{}: ignoring parameter {}", self.name, param);
        }
    }

    fn process_word(&mut self, word: &str) {
        if word.starts_with("G04") || word.starts_with("G4 ") || word == "G4" {
            return;
        }

        let cmd = Command::parse(word);

        for g in &cmd.g {
            match g {
                1 => self.interpolation = Interpolation::Linear,
                2 => self.interpolation = Interpolation::Clockwise,
                3 => self.interpolation = Interpolation::CounterClockwise,
                36 => self.begin_region(),
                37 => self.end_region(),
                54 | 55 => {}
                70 => self.set_units(Units::Inches),
                71 => self.set_units(Units::Millimeters),
                74 => self.quadrant = Quadrant::Single,
                75 => self.quadrant = Quadrant::Multi,
                other => debug!("{}: ignoring G{}", self.name, other),
            }
        }

        if let Some(m) = cmd.m {
            if m == 2 || m == 0 || m == 30 {
                self.finished = true;
                return;
            }
        }

        let operation = match cmd.d {
            Some(1) => Some(Operation::Draw),
            Some(2) => Some(Operation::Move),
            Some(3) => Some(Operation::Flash),
            Some(code) if code >= 10 => {
                self.current_aperture = Some(code);
                if cmd.has_coordinates() {
                    debug!("{}: coordinates on aperture select D{}", self.name, code);
                }
                return;
            }
            Some(code) => {
                debug!("{}: ignoring D{}", self.name, code);
                return;
            }
            None if cmd.has_coordinates() => self.last_operation,
            None => None,
        };

        let start = self.position;
        let target = self.target(&cmd);

        let Some(operation) = operation else {
            self.position = target;
            return;
        };
        self.last_operation = Some(operation);

        let offset = self.offset(&cmd);
        match operation {
            Operation::Draw => self.draw(start, target, offset),
            Operation::Move => self.move_to(target),
            Operation::Flash => self.flash(target),
        }
    }

    fn decode(&self, literal: Option<&str>, axis: Axis) -> Option<f64> {
        let literal = literal?;
        let value = self.format.decode(literal, axis, self.unit_scale());
        if value.is_none() {
            debug!("{}: unreadable coordinate {}", self.name, literal);
        }
        value
    }

    fn target(&self, cmd: &Command<'_>) -> Point {
        Point::new(
            self.decode(cmd.x, Axis::X).unwrap_or(self.position.x),
            self.decode(cmd.y, Axis::Y).unwrap_or(self.position.y),
        )
    }

    fn offset(&self, cmd: &Command<'_>) -> (f64, f64) {
        (
            self.decode(cmd.i, Axis::X).unwrap_or(0.0),
            self.decode(cmd.j, Axis::Y).unwrap_or(0.0),
        )
    }

    fn draw(&mut self, start: Point, end: Point, offset: (f64, f64)) {
        self.position = end;

        let arc = match self.interpolation {
            Interpolation::Linear => None,
            Interpolation::Clockwise | Interpolation::CounterClockwise => {
                self.arc(start, end, offset)
            }
        };

        if self.region_mode {
            if self.contour.is_empty() {
                self.contour.push(start);
            }
            match arc {
                Some(arc) => self
                    .contour
                    .extend(arc.flatten(REGION_ARC_STEP_DEG).into_iter().skip(1)),
                None => self.contour.push(end),
            }
            return;
        }

        let Some(code) = self.current_aperture else {
            return;
        };
        let width = self
            .apertures
            .get(code)
            .and_then(|shape| shape.effective_diameter())
            .unwrap_or(DEFAULT_TRACK_WIDTH_MM);

        match arc {
            Some(arc) => self.output.arcs.push(ArcStroke { width, ..arc }),
            None => self.output.tracks.push(Track::new(start, end, width)),
        }
    }

    /// Resolve the arc centre for the current quadrant mode. Returns `None`
    /// when no centre candidate exists (zero offsets), in which case the
    /// draw degrades to a straight segment.
    fn arc(&self, start: Point, end: Point, (i, j): (f64, f64)) -> Option<ArcStroke> {
        let clockwise = self.interpolation == Interpolation::Clockwise;
        let make = |center: Point| ArcStroke {
            start,
            end,
            center,
            clockwise,
            width: 0.0,
        };

        match self.quadrant {
            Quadrant::Multi => {
                let center = Point::new(start.x + i, start.y + j);
                (center.distance_to(&start) > CLOSE_EPS).then(|| make(center))
            }
            Quadrant::Single => {
                let (i, j) = (i.abs(), j.abs());
                if i < CLOSE_EPS && j < CLOSE_EPS {
                    return None;
                }
                let candidates = [(i, j), (-i, j), (i, -j), (-i, -j)]
                    .into_iter()
                    .map(|(di, dj)| make(Point::new(start.x + di, start.y + dj)));

                let quarter = std::f64::consts::FRAC_PI_2 + 1e-6;
                let mut best: Option<(bool, f64, ArcStroke)> = None;
                for arc in candidates {
                    let mismatch = (arc.center.distance_to(&start) - arc.center.distance_to(&end)).abs();
                    let fits = arc.sweep().abs() <= quarter;
                    let better = match &best {
                        None => true,
                        Some((best_fits, best_mismatch, _)) => {
                            (fits && !best_fits)
                                || (fits == *best_fits && mismatch < *best_mismatch)
                        }
                    };
                    if better {
                        best = Some((fits, mismatch, arc));
                    }
                }
                best.map(|(_, _, arc)| arc)
            }
        }
    }

    fn move_to(&mut self, target: Point) {
        if self.region_mode {
            self.close_contour();
        }
        self.position = target;
    }

    fn flash(&mut self, target: Point) {
        self.position = target;
        if self.region_mode {
            debug!("{}: ignoring flash inside region", self.name);
            return;
        }
        let aperture = self
            .current_aperture
            .and_then(|code| self.apertures.get(code))
            .cloned();
        self.output.flashes.push(Flash {
            position: target,
            aperture,
        });
    }

    fn begin_region(&mut self) {
        if self.region_mode {
            self.end_region();
        }
        self.region_mode = true;
        self.contour.clear();
        self.contours.clear();
    }

    fn close_contour(&mut self) {
        let mut contour = std::mem::take(&mut self.contour);
        if contour.len() > 1 {
            let closes = contour
                .first()
                .zip(contour.last())
                .map(|(a, b)| a.distance_to(b) < CLOSE_EPS)
                .unwrap_or(false);
            if closes {
                contour.pop();
            }
        }
        if ring_signed_area(&contour).abs() > MIN_RING_AREA_MM2 {
            self.contours.push(contour);
        } else if !contour.is_empty() {
            debug!(
                "{}: dropping zero-area region contour with {} points",
                self.name,
                contour.len()
            );
        }
    }

    fn end_region(&mut self) {
        if !self.region_mode {
            return;
        }
        self.close_contour();
        self.region_mode = false;

        let mut contours = std::mem::take(&mut self.contours).into_iter();
        if let Some(boundary) = contours.next() {
            self.output.regions.push(Region {
                boundary,
                holes: contours.collect(),
            });
        }
    }
}
