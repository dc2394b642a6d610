//! Centreline cleanup ahead of stroking.

use pcbkit_core::Point;

/// Drop points closer than `epsilon` to the previously kept point.
pub fn dedup_points(points: &[Point], epsilon: f64) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        match out.last() {
            Some(last) if last.distance_to(p) < epsilon => {}
            _ => out.push(*p),
        }
    }
    out
}

/// Absolute turning angle in radians between the directions `a -> b`
/// and `b -> c`. `None` when either direction is degenerate.
fn turn_angle(a: Point, b: Point, c: Point) -> Option<f64> {
    let (ux, uy) = (b.x - a.x, b.y - a.y);
    let (vx, vy) = (c.x - b.x, c.y - b.y);
    if ux.hypot(uy) < f64::EPSILON || vx.hypot(vy) < f64::EPSILON {
        return None;
    }
    let cross = ux * vy - uy * vx;
    let dot = ux * vx + uy * vy;
    Some(cross.atan2(dot).abs())
}

/// Remove interior points whose turn is below `min_turn_deg`. Endpoints
/// and genuine corners are kept.
///
/// The incoming direction is measured from the last kept point, so a
/// long run of tiny turns still leaves a vertex once the accumulated
/// deviation passes the threshold.
pub fn simplify_collinear(points: &[Point], min_turn_deg: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let threshold = min_turn_deg.to_radians();
    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    for i in 1..points.len() - 1 {
        let prev = out[out.len() - 1];
        match turn_angle(prev, points[i], points[i + 1]) {
            Some(turn) if turn < threshold => {}
            Some(_) => out.push(points[i]),
            None => {}
        }
    }
    out.push(points[points.len() - 1]);
    out
}

/// Dedup then simplify. A closed centreline is cleaned as if its first
/// point were repeated at the end, so the seam is handled like any other
/// vertex.
pub fn clean_centerline(
    points: &[Point],
    closed: bool,
    epsilon: f64,
    min_turn_deg: f64,
) -> Vec<Point> {
    if closed && !points.is_empty() {
        let mut ring = points.to_vec();
        ring.push(points[0]);
        let mut cleaned = simplify_collinear(&dedup_points(&ring, epsilon), min_turn_deg);
        if cleaned.len() > 1 {
            cleaned.pop();
        }
        cleaned
    } else {
        simplify_collinear(&dedup_points(points, epsilon), min_turn_deg)
    }
}
