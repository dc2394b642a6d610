//! Boolean set operations over polygon lists.
//!
//! Polygons cross into `geo` as an explicit [`MultiPolygon`] on both sides
//! of every call, so there is never any guessing about result nesting.
//! Each operation reports whether the engine produced a combined result or
//! the caller received the defined fallback instead.

use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::{BooleanOps, Coord, LineString, MultiPolygon};
use pcbkit_core::{filter_degenerate, Point, Polygon};
use tracing::{debug, warn};

use crate::error::{GeometryError, Result};

/// Result of a boolean operation.
#[derive(Debug, Clone, PartialEq)]
pub enum BooleanOutcome {
    /// The engine combined the inputs.
    Combined(Vec<Polygon>),
    /// The engine could not be used; `polygons` is the uncombined fallback.
    Fallback {
        polygons: Vec<Polygon>,
        reason: GeometryError,
    },
}

impl BooleanOutcome {
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Self::Combined(polygons) | Self::Fallback { polygons, .. } => polygons,
        }
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        match self {
            Self::Combined(polygons) | Self::Fallback { polygons, .. } => polygons,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Union,
    Difference,
    Intersection,
}

impl Op {
    fn name(self) -> &'static str {
        match self {
            Op::Union => "union",
            Op::Difference => "subtract",
            Op::Intersection => "intersect",
        }
    }
}

fn ring_to_geo(ring: &[Point]) -> LineString<f64> {
    LineString::new(ring.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
}

/// Open ring from a closed `geo` ring.
fn ring_from_geo(ring: &LineString<f64>) -> Vec<Point> {
    let mut points: Vec<Point> = ring.coords().map(|c| Point::new(c.x, c.y)).collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

fn to_geo(polygons: &[Polygon]) -> Result<MultiPolygon<f64>> {
    let mut out = Vec::with_capacity(polygons.len());
    for (index, polygon) in polygons.iter().enumerate() {
        if !polygon.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate { index });
        }
        out.push(geo::Polygon::new(
            ring_to_geo(&polygon.outer),
            polygon.holes.iter().map(|h| ring_to_geo(h)).collect(),
        ));
    }
    Ok(MultiPolygon::new(out))
}

fn from_geo(multi: MultiPolygon<f64>) -> Vec<Polygon> {
    let polygons = multi
        .into_iter()
        .map(|p| {
            let (exterior, interiors) = p.into_inner();
            Polygon::new(
                ring_from_geo(&exterior),
                interiors.iter().map(ring_from_geo).collect(),
            )
            .normalized()
        })
        .collect();
    filter_degenerate(polygons)
        .into_iter()
        .filter(|p| p.area() > 0.0)
        .collect()
}

/// Left-to-right union of every polygon in `multi`.
fn fold_union(multi: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    multi
        .iter()
        .fold(MultiPolygon::new(Vec::new()), |acc, p| {
            acc.union(&MultiPolygon::new(vec![p.clone()]))
        })
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn run(op: Op, a: &[Polygon], b: &[Polygon]) -> Result<Vec<Polygon>> {
    let a = to_geo(a)?;
    let b = to_geo(b)?;
    let result = catch_unwind(AssertUnwindSafe(|| {
        let left = fold_union(&a);
        match op {
            Op::Union => left,
            Op::Difference => left.difference(&fold_union(&b)),
            Op::Intersection => left.intersection(&fold_union(&b)),
        }
    }))
    .map_err(|payload| GeometryError::EngineFailure(panic_message(payload)))?;
    Ok(from_geo(result))
}

fn outcome(op: Op, a: &[Polygon], b: &[Polygon], fallback: Vec<Polygon>) -> BooleanOutcome {
    match run(op, a, b) {
        Ok(polygons) => {
            debug!(
                "Boolean {} of {} and {} polygons gave {}",
                op.name(),
                a.len(),
                b.len(),
                polygons.len()
            );
            BooleanOutcome::Combined(polygons)
        }
        Err(reason) => {
            warn!("Boolean {} failed, using uncombined input: {}", op.name(), reason);
            BooleanOutcome::Fallback {
                polygons: fallback,
                reason,
            }
        }
    }
}

/// Union of all polygons. Falls back to the (filtered) input.
pub fn union(polygons: &[Polygon]) -> BooleanOutcome {
    let a = filter_degenerate(polygons.to_vec());
    if a.len() < 2 {
        return BooleanOutcome::Combined(a);
    }
    outcome(Op::Union, &a, &[], a.clone())
}

/// Area covered by `a` and not by `b`. Falls back to `a`.
pub fn subtract(a: &[Polygon], b: &[Polygon]) -> BooleanOutcome {
    let a = filter_degenerate(a.to_vec());
    let b = filter_degenerate(b.to_vec());
    if a.is_empty() || b.is_empty() {
        return BooleanOutcome::Combined(a);
    }
    outcome(Op::Difference, &a, &b, a.clone())
}

/// Area covered by both `a` and `b`. Falls back to `a`.
pub fn intersect(a: &[Polygon], b: &[Polygon]) -> BooleanOutcome {
    let a = filter_degenerate(a.to_vec());
    let b = filter_degenerate(b.to_vec());
    if a.is_empty() || b.is_empty() {
        return BooleanOutcome::Combined(Vec::new());
    }
    outcome(Op::Intersection, &a, &b, a.clone())
}
