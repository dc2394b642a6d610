//! # PCBKit Geometry
//!
//! Turns interpreted layers into closed polygons and combines them.
//!
//! - **Polygonizer**: tracks, arcs, flashes and regions to clockwise polygons
//! - **Boolean engine**: union, subtract and intersect with explicit fallback
//! - **Outline**: board bounding box and fallback outline

pub mod boolean;
pub mod error;
pub mod outline;
pub mod polygonize;

pub use boolean::{intersect, subtract, union, BooleanOutcome};
pub use error::{GeometryError, Result};
pub use outline::{board_outline, derive_bounds, fallback_rectangle};
pub use polygonize::{
    chain_tracks, flash_polygon, polygonize, region_polygon, stroke_closed, stroke_open,
    PolygonizeOptions, Polyline,
};
