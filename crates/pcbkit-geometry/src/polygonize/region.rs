//! Filled regions pass through with their winding normalised.

use pcbkit_core::{Polygon, Region};

/// Boundary becomes the outer ring, contours become holes. Returns `None`
/// for a boundary that encloses no area or has non-finite coordinates.
/// Zero-area holes are dropped.
pub fn region_polygon(region: &Region) -> Option<Polygon> {
    let mut polygon = Polygon::new(region.boundary.clone(), region.holes.clone());
    if polygon.is_degenerate() || !polygon.is_finite() {
        return None;
    }
    polygon.drop_degenerate_holes();
    Some(polygon.normalized())
}
