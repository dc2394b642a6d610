//! Polygonizer
//!
//! Turns one layer's [`GerberPrimitives`] into closed, clockwise polygons:
//!
//! - tracks are chained into centrelines, cleaned and stroked;
//! - arcs are flattened into centrelines and stroked the same way;
//! - flashes become the outline of their aperture;
//! - regions pass through with normalised winding.
//!
//! Nothing is unioned here; overlapping shapes stay separate polygons.

pub mod chain;
pub mod clean;
pub mod flash;
pub mod options;
pub mod region;
pub mod stroke;

use pcbkit_core::{filter_degenerate, GerberPrimitives, Point, Polygon, MIN_RING_AREA_MM2};
use tracing::debug;

pub use chain::{chain_tracks, Polyline};
pub use clean::{clean_centerline, dedup_points, simplify_collinear};
pub use flash::flash_polygon;
pub use options::PolygonizeOptions;
pub use region::region_polygon;
pub use stroke::{stroke_closed, stroke_open};

fn stroke_centerline(
    points: &[Point],
    width: f64,
    closed: bool,
    options: &PolygonizeOptions,
) -> Option<Polygon> {
    let cleaned = clean_centerline(
        points,
        closed,
        options.duplicate_epsilon_mm,
        options.collinear_angle_deg,
    );
    if cleaned.len() < 2 {
        return None;
    }
    if closed && cleaned.len() >= 3 {
        stroke_closed(&cleaned, width, options.miter_limit)
    } else {
        stroke_open(&cleaned, width, options.cap_segments, options.miter_limit)
    }
}

/// Polygonize every primitive of one layer.
pub fn polygonize(primitives: &GerberPrimitives, options: &PolygonizeOptions) -> Vec<Polygon> {
    let mut polygons = Vec::with_capacity(primitives.len());

    let chains = chain_tracks(&primitives.tracks, options.quantize_grid_mm);
    let chain_count = chains.len();
    for chain in chains {
        polygons.extend(stroke_centerline(&chain.points, chain.width, chain.closed, options));
    }

    for arc in &primitives.arcs {
        let points = dedup_points(&arc.flatten(options.arc_step_deg), options.duplicate_epsilon_mm);
        let closed = points.len() > 3
            && points[0].distance_to(&points[points.len() - 1]) < options.duplicate_epsilon_mm;
        let centerline = if closed {
            &points[..points.len() - 1]
        } else {
            &points[..]
        };
        polygons.extend(stroke_centerline(centerline, arc.width, closed, options));
    }

    polygons.extend(
        primitives
            .flashes
            .iter()
            .filter_map(|f| flash_polygon(f, options)),
    );
    polygons.extend(primitives.regions.iter().filter_map(region_polygon));

    let polygons: Vec<Polygon> = filter_degenerate(polygons)
        .into_iter()
        .filter(|p| p.is_finite() && p.area() > MIN_RING_AREA_MM2)
        .collect();

    debug!(
        "Polygonized {} tracks ({} chains), {} arcs, {} flashes, {} regions into {} polygons",
        primitives.tracks.len(),
        chain_count,
        primitives.arcs.len(),
        primitives.flashes.len(),
        primitives.regions.len(),
        polygons.len()
    );
    polygons
}
