//! Planar geometry primitives: points, rings, polygons and bounding boxes.
//!
//! All coordinates are millimetres with the y axis pointing up, so a ring
//! with a negative shoelace area runs clockwise.

use serde::{Deserialize, Serialize};

/// A 2D point in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Rotational direction of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// Rings enclosing less than this many square millimetres are degenerate.
pub const MIN_RING_AREA_MM2: f64 = 1e-9;

fn ring_has_area(ring: &[Point]) -> bool {
    ring.len() >= 3 && ring_signed_area(ring).abs() > MIN_RING_AREA_MM2
}

/// Signed shoelace area of a ring. Negative means clockwise.
///
/// The ring is treated as implicitly closed; a repeated closing point
/// contributes nothing.
pub fn ring_signed_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = &ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Winding of a ring, or `None` when it encloses no area.
pub fn ring_winding(ring: &[Point]) -> Option<Winding> {
    let area = ring_signed_area(ring);
    if area < 0.0 {
        Some(Winding::Clockwise)
    } else if area > 0.0 {
        Some(Winding::CounterClockwise)
    } else {
        None
    }
}

/// Reverse `ring` in place if it does not already run in `winding`.
pub fn orient_ring(ring: &mut [Point], winding: Winding) {
    if let Some(current) = ring_winding(ring) {
        if current != winding {
            ring.reverse();
        }
    }
}

/// A closed outer ring with zero or more hole rings.
///
/// Rings are stored open (the last point is not a copy of the first).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub outer: Vec<Point>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Vec<Point>>,
}

impl Polygon {
    pub fn new(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        Self { outer, holes }
    }

    /// Build a polygon with no holes.
    pub fn from_ring(outer: Vec<Point>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Axis-aligned rectangle, clockwise, starting at the bottom-left corner.
    pub fn rectangle(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        let (max_x, max_y) = (min_x + width, min_y + height);
        Self::from_ring(vec![
            Point::new(min_x, min_y),
            Point::new(min_x, max_y),
            Point::new(max_x, max_y),
            Point::new(max_x, min_y),
        ])
    }

    /// A polygon whose outer ring has fewer than three points or encloses
    /// no area cannot be extruded or clipped.
    pub fn is_degenerate(&self) -> bool {
        !ring_has_area(&self.outer)
    }

    /// Outer area minus hole areas, always non-negative.
    pub fn area(&self) -> f64 {
        let holes: f64 = self
            .holes
            .iter()
            .map(|h| ring_signed_area(h).abs())
            .sum();
        (ring_signed_area(&self.outer).abs() - holes).max(0.0)
    }

    /// Normalise to a clockwise outer ring and counter-clockwise holes.
    pub fn normalize_winding(&mut self) {
        orient_ring(&mut self.outer, Winding::Clockwise);
        for hole in &mut self.holes {
            orient_ring(hole, Winding::CounterClockwise);
        }
    }

    /// Consuming form of [`Polygon::normalize_winding`].
    pub fn normalized(mut self) -> Self {
        self.normalize_winding();
        self
    }

    /// Drop hole rings with fewer than three points or no area.
    pub fn drop_degenerate_holes(&mut self) {
        self.holes.retain(|h| ring_has_area(h));
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.outer.iter())
    }

    pub fn is_finite(&self) -> bool {
        self.outer.iter().all(Point::is_finite)
            && self.holes.iter().flatten().all(Point::is_finite)
    }
}

/// Remove degenerate polygons and degenerate holes.
pub fn filter_degenerate(polygons: Vec<Polygon>) -> Vec<Polygon> {
    polygons
        .into_iter()
        .filter(|p| !p.is_degenerate())
        .map(|mut p| {
            p.drop_degenerate_holes();
            p
        })
        .collect()
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Degenerate box around a single point.
    pub fn at(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    /// Bounding box of a set of points. Non-finite points are ignored.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut bounds: Option<Bounds> = None;
        for p in points {
            if !p.is_finite() {
                continue;
            }
            match bounds.as_mut() {
                Some(b) => b.include(*p),
                None => bounds = Some(Bounds::at(*p)),
            }
        }
        bounds
    }

    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// True when the box spans a non-zero area.
    pub fn has_area(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::rectangle(self.min_x, self.min_y, self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_ccw() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_signed_area_sign() {
        let ring = square_ccw();
        assert_eq!(ring_signed_area(&ring), 100.0);
        assert_eq!(ring_winding(&ring), Some(Winding::CounterClockwise));

        let mut cw = ring.clone();
        cw.reverse();
        assert_eq!(ring_signed_area(&cw), -100.0);
        assert_eq!(ring_winding(&cw), Some(Winding::Clockwise));
    }

    #[test]
    fn test_degenerate_ring_has_no_winding() {
        let ring = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert_eq!(ring_signed_area(&ring), 0.0);
        assert_eq!(ring_winding(&ring), None);
    }

    #[test]
    fn test_normalize_winding() {
        let hole = vec![
            Point::new(2.0, 2.0),
            Point::new(2.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 2.0),
        ];
        assert!(ring_signed_area(&hole) < 0.0);

        let poly = Polygon::new(square_ccw(), vec![hole]).normalized();
        assert!(ring_signed_area(&poly.outer) < 0.0);
        assert!(ring_signed_area(&poly.holes[0]) > 0.0);
        assert!((poly.area() - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_rectangle_is_clockwise() {
        let rect = Polygon::rectangle(0.0, 0.0, 100.0, 50.0);
        assert_eq!(ring_winding(&rect.outer), Some(Winding::Clockwise));
        assert_eq!(rect.area(), 5000.0);
    }

    #[test]
    fn test_filter_degenerate() {
        let polys = vec![
            Polygon::from_ring(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
            Polygon::new(
                square_ccw(),
                vec![vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]],
            ),
        ];
        let filtered = filter_degenerate(polys);
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].holes.is_empty());
    }

    #[test]
    fn test_zero_area_rings_are_degenerate() {
        let collinear = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        assert!(Polygon::from_ring(collinear).is_degenerate());

        let mut poly = Polygon::new(square_ccw(), vec![vec![Point::new(0.5, 0.5); 3]]);
        assert!(!poly.is_degenerate());
        poly.drop_degenerate_holes();
        assert!(poly.holes.is_empty());
    }

    #[test]
    fn test_bounds() {
        let pts = [
            Point::new(1.0, -2.0),
            Point::new(f64::NAN, 0.0),
            Point::new(-3.0, 4.0),
        ];
        let b = Bounds::from_points(pts.iter()).unwrap();
        assert_eq!(b.min_x, -3.0);
        assert_eq!(b.max_x, 1.0);
        assert_eq!(b.min_y, -2.0);
        assert_eq!(b.max_y, 4.0);
        assert_eq!(b.center(), Point::new(-1.0, 1.0));
        assert!(Bounds::from_points([].iter()).is_none());
    }
}
