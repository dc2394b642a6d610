//! Stackup Builder
//!
//! Assembles the layered board model from interpreted Gerber layers and
//! drill holes. Every routed layer ends up with at least one polygon, and
//! both sides always carry copper.

use pcbkit_camtools::LayerRole;
use pcbkit_core::{
    ApertureShape, DrillHole, Flash, GerberPrimitives, LayerGeometry, LayerKind,
    LayerSide, PcbModelGeometry, Polygon,
};
use pcbkit_geometry::{
    board_outline, derive_bounds, flash_polygon, polygonize, subtract, union, PolygonizeOptions,
};
use pcbkit_settings::BoardSettings;
use tracing::{debug, warn};

/// Name given to layers the builder synthesizes.
pub const AUTO_LAYER_NAME: &str = "auto";

/// One interpreted Gerber file.
#[derive(Debug, Clone)]
pub struct ParsedLayer {
    pub name: String,
    pub role: LayerRole,
    pub primitives: GerberPrimitives,
}

/// Where a role lands in the model. Paste, mechanical and unknown layers
/// are not part of the stackup.
pub fn role_placement(role: LayerRole) -> Option<(Option<LayerSide>, LayerKind)> {
    use LayerKind::*;
    use LayerSide::*;
    let placement = match role {
        LayerRole::TopCopper => (Some(Top), Copper),
        LayerRole::BottomCopper => (Some(Bottom), Copper),
        LayerRole::InnerCopper => (None, Copper),
        LayerRole::TopMask => (Some(Top), Soldermask),
        LayerRole::BottomMask => (Some(Bottom), Soldermask),
        LayerRole::TopSilk => (Some(Top), Silkscreen),
        LayerRole::BottomSilk => (Some(Bottom), Silkscreen),
        LayerRole::Outline => (None, Outline),
        LayerRole::TopPaste
        | LayerRole::BottomPaste
        | LayerRole::Mechanical
        | LayerRole::Unknown => return None,
    };
    Some(placement)
}

/// Builds a [`PcbModelGeometry`] from parsed layers.
#[derive(Debug, Clone)]
pub struct StackupBuilder<'a> {
    board: &'a BoardSettings,
    options: &'a PolygonizeOptions,
}

impl<'a> StackupBuilder<'a> {
    pub fn new(board: &'a BoardSettings, options: &'a PolygonizeOptions) -> Self {
        Self { board, options }
    }

    fn hole_polygons(&self, drills: &[DrillHole]) -> Vec<Polygon> {
        drills
            .iter()
            .filter_map(|hole| {
                flash_polygon(
                    &Flash {
                        position: hole.position,
                        aperture: Some(ApertureShape::Circle {
                            diameter: hole.diameter,
                        }),
                    },
                    self.options,
                )
            })
            .collect()
    }

    /// Apply the copper post-processing switches.
    fn finish_copper(&self, name: &str, polygons: Vec<Polygon>, holes: &[Polygon]) -> Vec<Polygon> {
        let mut polygons = polygons;
        if self.board.merge_copper {
            let outcome = union(&polygons);
            if outcome.is_fallback() {
                warn!("Copper merge on {} fell back to unmerged shapes", name);
            }
            polygons = outcome.into_polygons();
        }
        if self.board.cut_drill_holes && !holes.is_empty() {
            let outcome = subtract(&polygons, holes);
            if outcome.is_fallback() {
                warn!("Drill cut-out on {} fell back to uncut shapes", name);
            }
            polygons = outcome.into_polygons();
        }
        polygons
    }

    /// Assemble the model. `layers` keep their order within each kind.
    pub fn build(&self, layers: &[ParsedLayer], drills: Vec<DrillHole>) -> PcbModelGeometry {
        let bounds = derive_bounds(layers.iter().map(|l| &l.primitives));
        let (board_rect, board_polygon) = board_outline(
            bounds,
            self.board.default_width_mm,
            self.board.default_height_mm,
        );
        let holes = if self.board.cut_drill_holes {
            self.hole_polygons(&drills)
        } else {
            Vec::new()
        };

        let mut copper = Vec::new();
        let mut mask = Vec::new();
        let mut silk = Vec::new();
        let mut outline: Option<LayerGeometry> = None;

        for layer in layers {
            let Some((side, kind)) = role_placement(layer.role) else {
                debug!("Not routing {} ({})", layer.name, layer.role);
                continue;
            };
            if kind == LayerKind::Outline && outline.is_some() {
                debug!("Ignoring extra outline layer {}", layer.name);
                continue;
            }

            let mut polygons = polygonize(&layer.primitives, self.options);
            if kind == LayerKind::Copper {
                polygons = self.finish_copper(&layer.name, polygons, &holes);
            }
            if polygons.is_empty() {
                debug!("{} produced no polygons, using board rectangle", layer.name);
                polygons = vec![board_polygon.clone()];
            }

            let geometry = LayerGeometry::new(layer.name.clone(), side, kind, polygons);
            match kind {
                LayerKind::Copper => copper.push(geometry),
                LayerKind::Soldermask => mask.push(geometry),
                LayerKind::Silkscreen => silk.push(geometry),
                LayerKind::Outline => outline = Some(geometry),
            }
        }

        for side in [LayerSide::Top, LayerSide::Bottom] {
            if !copper.iter().any(|l: &LayerGeometry| l.side == Some(side)) {
                debug!("No {} copper classified, synthesizing one", side);
                copper.push(LayerGeometry::new(
                    AUTO_LAYER_NAME,
                    Some(side),
                    LayerKind::Copper,
                    vec![board_polygon.clone()],
                ));
            }
        }

        let outline = outline.unwrap_or_else(|| {
            LayerGeometry::new(AUTO_LAYER_NAME, None, LayerKind::Outline, vec![board_polygon])
        });

        PcbModelGeometry {
            width_mm: board_rect.width(),
            height_mm: board_rect.height(),
            thickness_mm: self.board.thickness_mm,
            bounds,
            copper,
            mask,
            silk,
            outline,
            drills,
        }
    }
}
