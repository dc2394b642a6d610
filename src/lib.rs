//! # PCBKit
//!
//! Converts a zip archive of Gerber (RS-274X) and Excellon drill files into
//! a layered board model ready for extrusion or rendering.
//!
//! ## Architecture
//!
//! PCBKit is organized as a workspace with multiple crates:
//!
//! 1. **pcbkit-core** - Board data model, errors, units, archive access
//! 2. **pcbkit-camtools** - File classifier, Gerber and Excellon interpreters
//! 3. **pcbkit-geometry** - Polygonizer, boolean engine, outline derivation
//! 4. **pcbkit-settings** - Configuration and persistence
//! 5. **pcbkit-board** - Stackup builder and the async archive pipeline
//! 6. **pcbkit** - This crate: re-exports, logging, and the `pcbkit` binary

pub use pcbkit_board::{
    load_board, load_board_from_path, load_entries, ParsedLayer, StackupBuilder,
};
pub use pcbkit_camtools::{classify, interpret_drill, interpret_gerber, LayerHint, LayerRole};
pub use pcbkit_core::{
    ArchiveEntry, BoardArchive, Bounds, DrillHole, Error, GerberPrimitives, LayerGeometry,
    LayerKind, LayerSide, PcbModelGeometry, Point, Polygon, Result,
};
pub use pcbkit_geometry::{intersect, polygonize, subtract, union, BooleanOutcome, PolygonizeOptions};
pub use pcbkit_settings::{Config, SettingsPersistence};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout stays free for command results
/// - RUST_LOG environment variable support, `info` when unset
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::Text)
}

/// Initialize logging in the given format.
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Text => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
