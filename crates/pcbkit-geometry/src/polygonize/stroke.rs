//! Centreline-offset stroking with bisector joins and round caps.

use std::f64::consts::PI;

use pcbkit_core::{ring_signed_area, Point, Polygon};

const DIR_EPS: f64 = 1e-12;

/// Left-hand unit normal of `a -> b`, or `None` for a zero-length segment.
fn left_normal(a: Point, b: Point) -> Option<(f64, f64)> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = dx.hypot(dy);
    (len > DIR_EPS).then(|| (-dy / len, dx / len))
}

/// Join offset for a vertex between segments with normals `n0` and `n1`.
///
/// The bisector of the normals is scaled by `1/cos(half turn)` so both
/// offset edges meet exactly; beyond `miter_limit` the unscaled bisector
/// is used, which bevels the corner.
fn join_offset(n0: (f64, f64), n1: (f64, f64), half_width: f64, miter_limit: f64) -> (f64, f64) {
    let (bx, by) = (n0.0 + n1.0, n0.1 + n1.1);
    let blen = bx.hypot(by);
    if blen < DIR_EPS {
        // Full reversal; the bisector is undefined.
        return (n0.0 * half_width, n0.1 * half_width);
    }
    let (ux, uy) = (bx / blen, by / blen);
    let cos_half = ux * n1.0 + uy * n1.1;
    let scale = if cos_half > DIR_EPS { 1.0 / cos_half } else { f64::INFINITY };
    let scale = if scale > miter_limit { 1.0 } else { scale };
    (ux * half_width * scale, uy * half_width * scale)
}

/// Points strictly between the two ends of a semicircular cap, walking
/// clockwise from angle `from`.
fn cap_points(center: Point, radius: f64, from: f64, segments: u32) -> impl Iterator<Item = Point> {
    let segments = segments.max(1);
    (1..segments).map(move |k| {
        let angle = from - PI * k as f64 / segments as f64;
        Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    })
}

/// Segment normals, skipping zero-length segments. Returns the points
/// that remain meaningful alongside their normals.
fn normals(points: &[Point]) -> (Vec<Point>, Vec<(f64, f64)>) {
    let mut kept = Vec::with_capacity(points.len());
    let mut normals = Vec::with_capacity(points.len());
    for p in points {
        match kept.last() {
            None => kept.push(*p),
            Some(last) => {
                if let Some(n) = left_normal(*last, *p) {
                    normals.push(n);
                    kept.push(*p);
                }
            }
        }
    }
    (kept, normals)
}

/// Stroke an open centreline into a closed clockwise ring with round caps.
///
/// Returns `None` when the centreline collapses to a point or the width is
/// not positive.
pub fn stroke_open(points: &[Point], width: f64, cap_segments: u32, miter_limit: f64) -> Option<Polygon> {
    if width.is_nan() || width <= 0.0 {
        return None;
    }
    let (pts, normals) = normals(points);
    if normals.is_empty() {
        return None;
    }
    let half = width / 2.0;
    let n = pts.len();

    let offsets: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            if i == 0 {
                (normals[0].0 * half, normals[0].1 * half)
            } else if i == n - 1 {
                (normals[n - 2].0 * half, normals[n - 2].1 * half)
            } else {
                join_offset(normals[i - 1], normals[i], half, miter_limit)
            }
        })
        .collect();

    let left = pts
        .iter()
        .zip(&offsets)
        .map(|(p, o)| Point::new(p.x + o.0, p.y + o.1));
    let right = pts
        .iter()
        .zip(&offsets)
        .map(|(p, o)| Point::new(p.x - o.0, p.y - o.1));

    let end_normal = normals[n - 2];
    let start_normal = normals[0];
    let end_from = end_normal.1.atan2(end_normal.0);
    let start_from = start_normal.1.atan2(start_normal.0) - PI;

    let mut ring = Vec::with_capacity(2 * n + 2 * cap_segments as usize);
    ring.extend(left);
    ring.extend(cap_points(pts[n - 1], half, end_from, cap_segments));
    ring.extend(right.rev());
    ring.extend(cap_points(pts[0], half, start_from, cap_segments));

    let polygon = Polygon::from_ring(ring).normalized();
    (!polygon.is_degenerate()).then_some(polygon)
}

/// Stroke a closed centreline into a band: an outer ring plus one hole.
///
/// When the width swallows the interior the hole is omitted and the band
/// fills the whole loop.
pub fn stroke_closed(points: &[Point], width: f64, miter_limit: f64) -> Option<Polygon> {
    if width.is_nan() || width <= 0.0 {
        return None;
    }
    let (mut pts, _) = normals(points);
    if pts.len() > 1 && pts[0].distance_to(&pts[pts.len() - 1]) <= DIR_EPS {
        pts.pop();
    }
    if pts.len() < 3 {
        return None;
    }
    let n = pts.len();
    let half = width / 2.0;

    let segment_normals: Vec<(f64, f64)> = (0..n)
        .filter_map(|i| left_normal(pts[i], pts[(i + 1) % n]))
        .collect();
    if segment_normals.len() != n {
        return None;
    }

    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    for i in 0..n {
        let incoming = segment_normals[(i + n - 1) % n];
        let outgoing = segment_normals[i];
        let o = join_offset(incoming, outgoing, half, miter_limit);
        left.push(Point::new(pts[i].x + o.0, pts[i].y + o.1));
        right.push(Point::new(pts[i].x - o.0, pts[i].y - o.1));
    }

    let (outer, inner) = if ring_signed_area(&left).abs() >= ring_signed_area(&right).abs() {
        (left, right)
    } else {
        (right, left)
    };

    // When the band is wider than the loop the inner offset edges run
    // against the centreline and the ring is inverted.
    let inner_follows_centre = (0..n).all(|i| {
        let j = (i + 1) % n;
        let (cx, cy) = (pts[j].x - pts[i].x, pts[j].y - pts[i].y);
        let (ix, iy) = (inner[j].x - inner[i].x, inner[j].y - inner[i].y);
        cx * ix + cy * iy > 0.0
    });
    let holes = if inner_follows_centre && ring_signed_area(&inner) != 0.0 {
        vec![inner]
    } else {
        Vec::new()
    };

    let polygon = Polygon::new(outer, holes).normalized();
    (!polygon.is_degenerate()).then_some(polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcbkit_core::{ring_winding, Bounds, Winding};

    #[test]
    fn test_straight_track_bounds() {
        let w = 0.4;
        let poly = stroke_open(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)], w, 16, 4.0).unwrap();
        let b = Bounds::from_points(poly.outer.iter()).unwrap();
        assert!((b.min_x + w / 2.0).abs() < 1e-9);
        assert!((b.max_x - (10.0 + w / 2.0)).abs() < 1e-9);
        assert!((b.min_y + w / 2.0).abs() < 1e-9);
        assert!((b.max_y - w / 2.0).abs() < 1e-9);
        assert_eq!(ring_winding(&poly.outer), Some(Winding::Clockwise));
        assert!(poly.holes.is_empty());
    }

    #[test]
    fn test_right_angle_miter_is_exact() {
        let poly = stroke_open(
            &[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            2.0,
            8,
            4.0,
        )
        .unwrap();
        // Outer corner of the miter sits at (11, -1).
        assert!(poly
            .outer
            .iter()
            .any(|p| (p.x - 11.0).abs() < 1e-9 && (p.y + 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_sharp_turn_is_bevelled() {
        let poly = stroke_open(
            &[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 0.5)],
            1.0,
            8,
            4.0,
        )
        .unwrap();
        let b = Bounds::from_points(poly.outer.iter()).unwrap();
        assert!(b.max_x < 11.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(stroke_open(&[Point::new(1.0, 1.0), Point::new(1.0, 1.0)], 0.2, 16, 4.0).is_none());
        assert!(stroke_open(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)], 0.0, 16, 4.0).is_none());
        assert!(stroke_open(&[], 0.2, 16, 4.0).is_none());
    }

    #[test]
    fn test_closed_square_band() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let band = stroke_closed(&square, 1.0, 4.0).unwrap();
        assert_eq!(band.holes.len(), 1);
        assert!((band.area() - (121.0 - 81.0)).abs() < 1e-9);
        assert_eq!(ring_winding(&band.outer), Some(Winding::Clockwise));
        assert_eq!(ring_winding(&band.holes[0]), Some(Winding::CounterClockwise));
    }

    #[test]
    fn test_closed_band_wider_than_loop() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let band = stroke_closed(&square, 3.0, 4.0).unwrap();
        assert!(band.holes.is_empty());
    }
}
