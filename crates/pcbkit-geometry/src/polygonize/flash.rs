//! Aperture stamps as polygons.

use std::f64::consts::{PI, TAU};

use pcbkit_core::{ApertureShape, Flash, Point, Polygon};

use super::options::PolygonizeOptions;

const SIZE_EPS: f64 = 1e-9;

/// Regular `n`-gon inscribed in a circle, first vertex at `phase` radians.
fn regular_polygon(center: Point, radius: f64, n: u32, phase: f64) -> Vec<Point> {
    (0..n)
        .map(|k| {
            let angle = phase + TAU * k as f64 / n as f64;
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// Stadium with semicircular ends along the longer axis.
fn obround(center: Point, width: f64, height: f64, cap_segments: u32) -> Vec<Point> {
    let segments = cap_segments.max(1);
    let mut ring = Vec::with_capacity(2 * (segments as usize + 1));
    if width >= height {
        let r = height / 2.0;
        let offset = width / 2.0 - r;
        // Right cap from -90 to 90 degrees, then left cap from 90 to 270.
        for (cx, start) in [(center.x + offset, -PI / 2.0), (center.x - offset, PI / 2.0)] {
            for k in 0..=segments {
                let angle = start + PI * k as f64 / segments as f64;
                ring.push(Point::new(cx + r * angle.cos(), center.y + r * angle.sin()));
            }
        }
    } else {
        let r = width / 2.0;
        let offset = height / 2.0 - r;
        for (cy, start) in [(center.y + offset, 0.0), (center.y - offset, PI)] {
            for k in 0..=segments {
                let angle = start + PI * k as f64 / segments as f64;
                ring.push(Point::new(center.x + r * angle.cos(), cy + r * angle.sin()));
            }
        }
    }
    ring
}

/// Polygon for a flash, or `None` when the aperture has no positive size.
///
/// Circles and unresolved apertures become `flash_segments`-gons.
/// Rectangles, obrounds and polygon apertures keep their own outline.
pub fn flash_polygon(flash: &Flash, options: &PolygonizeOptions) -> Option<Polygon> {
    let c = flash.position;
    if !c.is_finite() {
        return None;
    }
    let circle = |diameter: f64| regular_polygon(c, diameter / 2.0, options.flash_segments.max(3), 0.0);

    let ring = match &flash.aperture {
        Some(ApertureShape::Circle { diameter }) => circle(*diameter),
        Some(ApertureShape::Rectangle { width, height }) => {
            Polygon::rectangle(c.x - width / 2.0, c.y - height / 2.0, *width, *height).outer
        }
        Some(ApertureShape::Obround { width, height }) => {
            if (width - height).abs() < SIZE_EPS {
                circle(*width)
            } else {
                obround(c, *width, *height, options.cap_segments)
            }
        }
        Some(ApertureShape::Polygon {
            diameter,
            vertices,
            rotation_deg,
        }) => regular_polygon(c, diameter / 2.0, (*vertices).max(3), rotation_deg.to_radians()),
        Some(ApertureShape::Other { size, .. }) => {
            circle(size.unwrap_or(options.default_flash_diameter_mm))
        }
        None => circle(options.default_flash_diameter_mm),
    };

    let polygon = Polygon::from_ring(ring).normalized();
    (polygon.is_finite() && polygon.area() > SIZE_EPS * SIZE_EPS).then_some(polygon)
}
