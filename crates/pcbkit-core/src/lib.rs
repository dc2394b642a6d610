//! # PCBKit Core
//!
//! Core types and collaborators shared by every PCBKit crate:
//! the layered board model, Gerber primitive representation, the error
//! taxonomy, unit handling, and access to the zipped CAM archive.

pub mod archive;
pub mod data;
pub mod error;
pub mod text;
pub mod units;

pub use archive::{ArchiveEntry, BoardArchive};

pub use data::{
    filter_degenerate, orient_ring, ring_signed_area, ring_winding, ApertureShape, ArcStroke,
    Bounds, DrillHole, Flash, GerberPrimitives, LayerGeometry, LayerKind, LayerSide,
    PcbModelGeometry, Point, Polygon, Region, Track, Winding, MIN_RING_AREA_MM2,
};

pub use error::{Error, Result};

pub use text::normalize_text;

pub use units::Units;
