//! # PCBKit Board
//!
//! Turns a fabrication archive into a [`pcbkit_core::PcbModelGeometry`]:
//! classify, interpret, polygonize, then assemble the stackup.

pub mod pipeline;
pub mod stackup;

pub use pipeline::{interpret_classified, load_board, load_board_from_path, load_entries};
pub use stackup::{role_placement, ParsedLayer, StackupBuilder, AUTO_LAYER_NAME};
