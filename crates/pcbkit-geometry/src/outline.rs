//! Board outline and bounding box derivation.

use pcbkit_core::{Bounds, GerberPrimitives, Point, Polygon};

/// Bounding box of every primitive point across all layers: track
/// endpoints, arc endpoints and centres, flash positions and region rings.
///
/// `None` when no layer has a finite primitive point.
pub fn derive_bounds<'a, I>(layers: I) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a GerberPrimitives>,
{
    let mut bounds: Option<Bounds> = None;
    for p in layers
        .into_iter()
        .flat_map(|primitives| primitives.points())
        .filter(Point::is_finite)
    {
        match bounds.as_mut() {
            Some(b) => b.include(p),
            None => bounds = Some(Bounds::at(p)),
        }
    }
    bounds
}

/// Rectangle used when no outline can be derived.
///
/// It is `width` x `height`, centred on `around` (or the origin).
pub fn fallback_rectangle(around: Option<Point>, width: f64, height: f64) -> Polygon {
    let c = around.unwrap_or_default();
    Polygon::rectangle(c.x - width / 2.0, c.y - height / 2.0, width, height)
}

/// Board outline from the derived bounds.
///
/// A bounding box without area (a single flash, a single straight track)
/// is not a usable outline, so the default rectangle is centred on it.
pub fn board_outline(bounds: Option<Bounds>, default_width: f64, default_height: f64) -> (Bounds, Polygon) {
    match bounds {
        Some(b) if b.has_area() => (b, b.to_polygon()),
        other => {
            let polygon = fallback_rectangle(other.map(|b| b.center()), default_width, default_height);
            let rect = polygon
                .bounds()
                .unwrap_or_else(|| Bounds::at(Point::default()));
            (rect, polygon)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcbkit_core::{Flash, Track};

    #[test]
    fn test_bounds_across_layers() {
        let a = GerberPrimitives {
            tracks: vec![Track::new(Point::new(0.0, 0.0), Point::new(5.0, 1.0), 0.2)],
            ..Default::default()
        };
        let b = GerberPrimitives {
            flashes: vec![Flash {
                position: Point::new(-2.0, 7.0),
                aperture: None,
            }],
            ..Default::default()
        };
        let bounds = derive_bounds([&a, &b]).unwrap();
        assert_eq!(
            (bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y),
            (-2.0, 0.0, 5.0, 7.0)
        );
    }

    #[test]
    fn test_no_primitives() {
        assert!(derive_bounds([&GerberPrimitives::default()]).is_none());
        let (b, outline) = board_outline(None, 100.0, 80.0);
        assert_eq!((b.width(), b.height()), (100.0, 80.0));
        assert_eq!(b.center(), Point::new(0.0, 0.0));
        assert_eq!(outline.outer.len(), 4);
    }

    #[test]
    fn test_zero_area_bounds_center_default() {
        let single = Bounds::at(Point::new(5.0, 5.0));
        let (b, _) = board_outline(Some(single), 100.0, 100.0);
        assert_eq!(b.center(), Point::new(5.0, 5.0));
        assert_eq!(b.width(), 100.0);
    }

    #[test]
    fn test_real_bounds_used() {
        let real = Bounds {
            min_x: 1.0,
            min_y: 2.0,
            max_x: 31.0,
            max_y: 22.0,
        };
        let (b, outline) = board_outline(Some(real), 100.0, 100.0);
        assert_eq!(b, real);
        assert!((outline.area() - 600.0).abs() < 1e-9);
    }
}
