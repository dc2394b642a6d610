//! # PCBKit CAM Tools
//!
//! Readers for the files found in a board fabrication archive.
//!
//! - **Classifier**: sorts archive entries into Gerber layer roles, drill
//!   files and ignored files, honouring user hints
//! - **Gerber Interpreter**: RS-274X text to drawing primitives
//! - **Drill Interpreter**: Excellon text to drill holes

pub mod classifier;
pub mod drill;
pub mod error;
pub mod gerber;

pub use classifier::{
    classify, classify_name, heuristic_role, Classification, ClassifiedGerber, FileClass,
    LayerHint, LayerRole,
};
pub use drill::{interpret_drill, DEFAULT_DRILL_DIAMETER_MM};
pub use error::{CamToolError, Result};
pub use gerber::{interpret_gerber, DEFAULT_TRACK_WIDTH_MM};
