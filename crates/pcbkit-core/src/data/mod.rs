//! Data models for board geometry
//!
//! This module provides:
//! - Points, rings, polygons and bounding boxes in millimetres
//! - Gerber drawing primitives (tracks, arcs, flashes, regions)
//! - The layered board model and drill holes

pub mod board;
pub mod geometry;
pub mod primitives;

pub use board::{DrillHole, LayerGeometry, LayerKind, LayerSide, PcbModelGeometry};
pub use geometry::{
    filter_degenerate, orient_ring, ring_signed_area, ring_winding, Bounds, Point, Polygon,
    Winding, MIN_RING_AREA_MM2,
};
pub use primitives::{ApertureShape, ArcStroke, Flash, GerberPrimitives, Region, Track};
