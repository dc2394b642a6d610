//! # Gerber Interpreter
//!
//! Turns RS-274X text into [`GerberPrimitives`]: tracks, arcs, flashes and
//! filled regions, all in millimetres.
//!
//! Supported: coordinate format and units (including retroactive aperture
//! rescaling), standard C/R/O/P apertures, linear and circular
//! interpolation, modal operation codes and region mode. Macro apertures
//! are kept as unresolved shapes, and attributes, polarity and
//! step-and-repeat are ignored. Unrecognised input is skipped; the
//! interpreter never fails.

pub mod aperture;
pub mod format;
pub mod scanner;
pub mod state;

use pcbkit_core::GerberPrimitives;
use tracing::debug;

pub use aperture::{parse_definition, ApertureTable};
pub use format::{Axis, CoordinateFormat, ZeroOmission};
pub use scanner::{scan_blocks, Block};
pub use state::{ParserState, DEFAULT_TRACK_WIDTH_MM};

/// Interpret the normalised text of one Gerber file.
pub fn interpret_gerber(name: &str, text: &str) -> GerberPrimitives {
    let mut state = ParserState::new(name);
    for block in scan_blocks(text) {
        state.process(&block);
        if state.is_finished() {
            break;
        }
    }
    let primitives = state.finish();
    debug!(
        "{}: {} tracks, {} arcs, {} flashes, {} regions",
        name,
        primitives.tracks.len(),
        primitives.arcs.len(),
        primitives.flashes.len(),
        primitives.regions.len()
    );
    primitives
}
