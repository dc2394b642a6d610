//! Per-layer drawing primitives produced by the Gerber interpreter.

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Shape and size of an aperture, in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ApertureShape {
    Circle {
        diameter: f64,
    },
    Rectangle {
        width: f64,
        height: f64,
    },
    Obround {
        width: f64,
        height: f64,
    },
    /// Regular polygon inscribed in a circle of `diameter`.
    Polygon {
        diameter: f64,
        vertices: u32,
        rotation_deg: f64,
    },
    /// Macro or otherwise unsupported template. The size is the first
    /// numeric modifier if there was one.
    Other {
        template: String,
        size: Option<f64>,
    },
}

impl ApertureShape {
    /// Diameter used when the aperture strokes a track.
    ///
    /// Rectangles and obrounds use the smaller side, which is only exact
    /// for square pads.
    pub fn effective_diameter(&self) -> Option<f64> {
        let d = match self {
            Self::Circle { diameter } | Self::Polygon { diameter, .. } => *diameter,
            Self::Rectangle { width, height } | Self::Obround { width, height } => {
                width.min(*height)
            }
            Self::Other { size, .. } => (*size)?,
        };
        (d.is_finite() && d > 0.0).then_some(d)
    }

    /// Copy of this shape with every length multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            Self::Circle { diameter } => Self::Circle {
                diameter: diameter * factor,
            },
            Self::Rectangle { width, height } => Self::Rectangle {
                width: width * factor,
                height: height * factor,
            },
            Self::Obround { width, height } => Self::Obround {
                width: width * factor,
                height: height * factor,
            },
            Self::Polygon {
                diameter,
                vertices,
                rotation_deg,
            } => Self::Polygon {
                diameter: diameter * factor,
                vertices: *vertices,
                rotation_deg: *rotation_deg,
            },
            Self::Other { template, size } => Self::Other {
                template: template.clone(),
                size: size.map(|s| s * factor),
            },
        }
    }
}

/// A straight centreline segment stroked with a round aperture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub start: Point,
    pub end: Point,
    pub width: f64,
}

impl Track {
    pub fn new(start: Point, end: Point, width: f64) -> Self {
        Self { start, end, width }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// A circular-interpolation stroke. Angles run from `start` to `end`
/// around `center`; a full circle has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcStroke {
    pub start: Point,
    pub end: Point,
    pub center: Point,
    pub clockwise: bool,
    pub width: f64,
}

impl ArcStroke {
    const CLOSE_EPS: f64 = 1e-9;

    pub fn radius(&self) -> f64 {
        self.center.distance_to(&self.start)
    }

    /// Signed sweep in radians: negative for clockwise arcs. An arc whose
    /// endpoints coincide sweeps a full turn.
    pub fn sweep(&self) -> f64 {
        let a0 = (self.start.y - self.center.y).atan2(self.start.x - self.center.x);
        let a1 = (self.end.y - self.center.y).atan2(self.end.x - self.center.x);
        let tau = std::f64::consts::TAU;
        let full = self.start.distance_to(&self.end) < Self::CLOSE_EPS;

        if self.clockwise {
            let mut d = a0 - a1;
            if full || d <= 0.0 {
                d += tau;
            }
            -d.min(tau)
        } else {
            let mut d = a1 - a0;
            if full || d <= 0.0 {
                d += tau;
            }
            d.min(tau)
        }
    }

    /// Points along the arc from `start` to `end`, no further apart than
    /// `max_step_deg` degrees. Both endpoints are included exactly.
    pub fn flatten(&self, max_step_deg: f64) -> Vec<Point> {
        let radius = self.radius();
        if radius < Self::CLOSE_EPS || !radius.is_finite() {
            return vec![self.start, self.end];
        }
        let step = max_step_deg.max(0.1).to_radians();
        let sweep = self.sweep();
        let segments = ((sweep.abs() / step - 1e-9).ceil() as usize).max(1);
        let a0 = (self.start.y - self.center.y).atan2(self.start.x - self.center.x);

        let mut points = Vec::with_capacity(segments + 1);
        points.push(self.start);
        for k in 1..segments {
            let angle = a0 + sweep * (k as f64 / segments as f64);
            points.push(Point::new(
                self.center.x + radius * angle.cos(),
                self.center.y + radius * angle.sin(),
            ));
        }
        points.push(self.end);
        points
    }
}

/// A stamp of an aperture at a point. `aperture` is `None` when the file
/// flashed before selecting any aperture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub position: Point,
    pub aperture: Option<ApertureShape>,
}

/// A filled area: first contour is the boundary, the rest are holes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub boundary: Vec<Point>,
    #[serde(default)]
    pub holes: Vec<Vec<Point>>,
}

/// Everything one Gerber file draws.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GerberPrimitives {
    pub tracks: Vec<Track>,
    pub arcs: Vec<ArcStroke>,
    pub flashes: Vec<Flash>,
    pub regions: Vec<Region>,
}

impl GerberPrimitives {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
            && self.arcs.is_empty()
            && self.flashes.is_empty()
            && self.regions.is_empty()
    }

    /// Total number of primitives of every kind.
    pub fn len(&self) -> usize {
        self.tracks.len() + self.arcs.len() + self.flashes.len() + self.regions.len()
    }

    /// Every point that locates a primitive: track and arc endpoints, arc
    /// centres, flash positions and region ring points.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let tracks = self.tracks.iter().flat_map(|t| [t.start, t.end]);
        let arcs = self.arcs.iter().flat_map(|a| [a.start, a.end, a.center]);
        let flashes = self.flashes.iter().map(|f| f.position);
        let regions = self.regions.iter().flat_map(|r| {
            r.boundary
                .iter()
                .chain(r.holes.iter().flatten())
                .copied()
        });
        tracks.chain(arcs).chain(flashes).chain(regions)
    }
}
