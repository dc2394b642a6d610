use pcbkit_core::{
    ring_winding, ApertureShape, Flash, GerberPrimitives, Point, Polygon, Region, Track, Winding,
};
use pcbkit_geometry::{chain_tracks, polygonize, stroke_open, subtract, union, PolygonizeOptions};
use proptest::prelude::*;

fn polyline_strategy() -> impl Strategy<Value = Vec<Point>> {
    // Monotone in x so the stroked outline never folds over itself.
    prop::collection::vec((0.1f64..5.0, -2.0f64..2.0), 1..12).prop_map(|steps| {
        let mut x = 0.0;
        let mut points = vec![Point::new(0.0, 0.0)];
        for (dx, y) in steps {
            x += dx;
            points.push(Point::new(x, y));
        }
        points
    })
}

fn grid_point() -> impl Strategy<Value = Point> {
    (-50i32..50, -50i32..50).prop_map(|(x, y)| Point::new(x as f64 * 0.5, y as f64 * 0.5))
}

proptest! {
    #[test]
    fn stroked_tracks_are_clockwise(
        points in polyline_strategy(),
        width in 0.05f64..1.0,
        reverse in any::<bool>(),
    ) {
        let mut points = points;
        if reverse {
            points.reverse();
        }
        let poly = stroke_open(&points, width, 16, 4.0).unwrap();
        prop_assert!(poly.outer.len() >= 3);
        prop_assert_eq!(ring_winding(&poly.outer), Some(Winding::Clockwise));
    }

    #[test]
    fn chaining_is_direction_independent(a in grid_point(), b in grid_point(), c in grid_point()) {
        prop_assume!(a != b && b != c && a != c);
        let forward = chain_tracks(
            &[Track::new(a, b, 0.2), Track::new(b, c, 0.2)],
            0.001,
        );
        let backward = chain_tracks(
            &[Track::new(c, b, 0.2), Track::new(b, a, 0.2)],
            0.001,
        );
        prop_assert_eq!(forward.len(), 1);
        prop_assert_eq!(backward.len(), 1);
        let mut reversed = backward[0].points.clone();
        reversed.reverse();
        prop_assert_eq!(&forward[0].points, &reversed);
    }
}

#[test]
fn test_straight_track_bounding_box() {
    let w = 0.25;
    let primitives = GerberPrimitives {
        tracks: vec![Track::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), w)],
        ..Default::default()
    };
    let polygons = polygonize(&primitives, &PolygonizeOptions::default());
    assert_eq!(polygons.len(), 1);
    let b = polygons[0].bounds().unwrap();
    assert!((b.min_x + w / 2.0).abs() < 1e-9);
    assert!((b.max_x - 10.0 - w / 2.0).abs() < 1e-9);
    assert!((b.min_y + w / 2.0).abs() < 1e-9);
    assert!((b.max_y - w / 2.0).abs() < 1e-9);
}

#[test]
fn test_square_region_area() {
    let primitives = GerberPrimitives {
        regions: vec![Region {
            boundary: vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 10.0),
                Point::new(10.0, 10.0),
                Point::new(10.0, 0.0),
            ],
            holes: Vec::new(),
        }],
        ..Default::default()
    };
    let polygons = polygonize(&primitives, &PolygonizeOptions::default());
    assert_eq!(polygons.len(), 1);
    assert!(polygons[0].holes.is_empty());
    assert!((polygons[0].area() - 100.0).abs() < 1e-9);
}

#[test]
fn test_circular_flash_centroid_and_radius() {
    let primitives = GerberPrimitives {
        flashes: vec![Flash {
            position: Point::new(5.0, 5.0),
            aperture: Some(ApertureShape::Circle { diameter: 0.8 }),
        }],
        ..Default::default()
    };
    let polygons = polygonize(&primitives, &PolygonizeOptions::default());
    assert_eq!(polygons.len(), 1);
    let ring = &polygons[0].outer;
    let n = ring.len() as f64;
    let cx = ring.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = ring.iter().map(|p| p.y).sum::<f64>() / n;
    assert!((cx - 5.0).abs() < 1e-9);
    assert!((cy - 5.0).abs() < 1e-9);
    let max_r = ring
        .iter()
        .map(|p| p.distance_to(&Point::new(5.0, 5.0)))
        .fold(0.0, f64::max);
    assert!((max_r - 0.4).abs() < 1e-6);
}

#[test]
fn test_union_is_idempotent() {
    let a = Polygon::rectangle(0.0, 0.0, 4.0, 3.0);
    let out = union(&[a.clone(), a.clone()]);
    assert!(!out.is_fallback());
    let polygons = out.into_polygons();
    assert_eq!(polygons.len(), 1);
    assert!((polygons[0].area() - a.area()).abs() < 1e-9);
    let (got, want) = (polygons[0].bounds().unwrap(), a.bounds().unwrap());
    assert!((got.min_x - want.min_x).abs() < 1e-9 && (got.max_x - want.max_x).abs() < 1e-9);
    assert!((got.min_y - want.min_y).abs() < 1e-9 && (got.max_y - want.max_y).abs() < 1e-9);
}

#[test]
fn test_subtract_identities() {
    let a = Polygon::rectangle(0.0, 0.0, 4.0, 3.0);
    assert_eq!(subtract(&[a.clone()], &[]).into_polygons(), vec![a.clone()]);
    assert!(subtract(&[a.clone()], &[a]).into_polygons().is_empty());
}
