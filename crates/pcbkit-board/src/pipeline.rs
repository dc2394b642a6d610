//! Archive bytes to board model.
//!
//! Entry text is read asynchronously, one classified file at a time. Each
//! file's parse owns its own state. Polygonization and boolean work runs on
//! the blocking pool so callers on an async runtime stay responsive.

use std::path::Path;
use std::sync::Arc;

use pcbkit_camtools::{classify, interpret_drill, interpret_gerber, Classification};
use pcbkit_core::{ArchiveEntry, BoardArchive, DrillHole, PcbModelGeometry, Result};
use pcbkit_settings::Config;
use tracing::{debug, info, warn};

use crate::stackup::{ParsedLayer, StackupBuilder};

/// Interpret every classified file. Entries whose text cannot be read are
/// skipped with a warning.
pub async fn interpret_classified(classification: Classification) -> (Vec<ParsedLayer>, Vec<DrillHole>) {
    let mut layers = Vec::with_capacity(classification.gerbers.len());
    for gerber in classification.gerbers {
        match gerber.entry.read_text().await {
            Ok(text) => {
                let name = gerber.entry.file_name().to_string();
                let primitives = interpret_gerber(&name, text);
                debug!("{}: {} primitives", name, primitives.len());
                layers.push(ParsedLayer {
                    name,
                    role: gerber.role,
                    primitives,
                });
            }
            Err(e) => warn!("Skipping {}: {}", gerber.entry.path(), e),
        }
    }

    let mut drills = Vec::new();
    for entry in classification.drills {
        match entry.read_text().await {
            Ok(text) => {
                let holes = interpret_drill(entry.file_name(), text);
                debug!("{}: {} holes", entry.file_name(), holes.len());
                drills.extend(holes);
            }
            Err(e) => warn!("Skipping {}: {}", entry.path(), e),
        }
    }

    (layers, drills)
}

/// Build a board from already-extracted entries.
pub async fn load_entries(entries: Vec<ArchiveEntry>, config: &Config) -> Result<PcbModelGeometry> {
    let classification = classify(entries, &config.classification.hints);
    info!(
        "Classified {} gerber, {} drill and {} ignored files",
        classification.gerbers.len(),
        classification.drills.len(),
        classification.ignored.len()
    );

    let (layers, drills) = interpret_classified(classification).await;

    let board = config.board.clone();
    let options = config.polygonize.clone();
    let model = tokio::task::spawn_blocking(move || {
        StackupBuilder::new(&board, &options).build(&layers, drills)
    })
    .await?;

    info!(
        "Built {:.2} x {:.2} mm board: {} copper, {} mask, {} silk layers, {} holes",
        model.width_mm,
        model.height_mm,
        model.copper.len(),
        model.mask.len(),
        model.silk.len(),
        model.drills.len()
    );
    Ok(model)
}

/// Build a board from zip archive bytes.
///
/// Fails only when the archive itself cannot be opened.
pub async fn load_board(bytes: impl Into<Arc<[u8]>>, config: &Config) -> Result<PcbModelGeometry> {
    let archive = BoardArchive::open(bytes)?;
    info!("Opened archive with {} files", archive.len());
    load_entries(archive.into_entries(), config).await
}

/// Read a zip archive from disk and build a board from it.
pub async fn load_board_from_path(path: impl AsRef<Path>, config: &Config) -> Result<PcbModelGeometry> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    load_board(bytes, config).await
}
