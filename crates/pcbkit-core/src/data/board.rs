//! The layered board model handed to renderers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::{Bounds, Point, Polygon};

/// Board side a layer sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerSide {
    Top,
    Bottom,
}

impl fmt::Display for LayerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}

/// What a layer represents physically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Copper,
    Soldermask,
    Silkscreen,
    Outline,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Copper => "copper",
            Self::Soldermask => "soldermask",
            Self::Silkscreen => "silkscreen",
            Self::Outline => "outline",
        };
        write!(f, "{}", s)
    }
}

/// A named layer and its polygons. Inner copper and the outline have no side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerGeometry {
    pub name: String,
    pub side: Option<LayerSide>,
    pub kind: LayerKind,
    pub polygons: Vec<Polygon>,
}

impl LayerGeometry {
    pub fn new(
        name: impl Into<String>,
        side: Option<LayerSide>,
        kind: LayerKind,
        polygons: Vec<Polygon>,
    ) -> Self {
        Self {
            name: name.into(),
            side,
            kind,
            polygons,
        }
    }

    /// Identifier used to toggle layer visibility: `kind:side:name`, with
    /// `none` standing in for a missing side.
    pub fn layer_id(&self) -> String {
        let side = self
            .side
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!("{}:{}:{}", self.kind, side, self.name)
    }
}

/// A drilled hole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrillHole {
    pub position: Point,
    pub diameter: f64,
    pub plated: bool,
}

/// The finished board model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbModelGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub thickness_mm: f64,
    /// Extent of all drawn primitives, absent when nothing was drawn.
    pub bounds: Option<Bounds>,
    pub copper: Vec<LayerGeometry>,
    pub mask: Vec<LayerGeometry>,
    pub silk: Vec<LayerGeometry>,
    pub outline: LayerGeometry,
    pub drills: Vec<DrillHole>,
}

impl PcbModelGeometry {
    /// Copper, mask and silk layers followed by the outline.
    pub fn layers(&self) -> impl Iterator<Item = &LayerGeometry> {
        self.copper
            .iter()
            .chain(self.mask.iter())
            .chain(self.silk.iter())
            .chain(std::iter::once(&self.outline))
    }

    pub fn find_layer(&self, layer_id: &str) -> Option<&LayerGeometry> {
        self.layers().find(|l| l.layer_id() == layer_id)
    }

    pub fn copper_on(&self, side: LayerSide) -> impl Iterator<Item = &LayerGeometry> {
        self.copper.iter().filter(move |l| l.side == Some(side))
    }
}
