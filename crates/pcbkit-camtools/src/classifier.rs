//! File classification
//!
//! Routes archive entries to Gerber layer roles, drill files, or the
//! ignored bucket using filename conventions from common CAM exporters
//! (KiCad, Protel/Altium, Eagle) plus optional user hints.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use pcbkit_core::ArchiveEntry;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CamToolError;

/// Semantic role of a Gerber file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    TopCopper,
    BottomCopper,
    InnerCopper,
    TopMask,
    BottomMask,
    TopSilk,
    BottomSilk,
    TopPaste,
    BottomPaste,
    Outline,
    Mechanical,
    Unknown,
}

impl LayerRole {
    pub const ALL: [LayerRole; 12] = [
        LayerRole::TopCopper,
        LayerRole::BottomCopper,
        LayerRole::InnerCopper,
        LayerRole::TopMask,
        LayerRole::BottomMask,
        LayerRole::TopSilk,
        LayerRole::BottomSilk,
        LayerRole::TopPaste,
        LayerRole::BottomPaste,
        LayerRole::Outline,
        LayerRole::Mechanical,
        LayerRole::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerRole::TopCopper => "top_copper",
            LayerRole::BottomCopper => "bottom_copper",
            LayerRole::InnerCopper => "inner_copper",
            LayerRole::TopMask => "top_mask",
            LayerRole::BottomMask => "bottom_mask",
            LayerRole::TopSilk => "top_silk",
            LayerRole::BottomSilk => "bottom_silk",
            LayerRole::TopPaste => "top_paste",
            LayerRole::BottomPaste => "bottom_paste",
            LayerRole::Outline => "outline",
            LayerRole::Mechanical => "mechanical",
            LayerRole::Unknown => "unknown",
        }
    }

    pub fn is_copper(&self) -> bool {
        matches!(
            self,
            LayerRole::TopCopper | LayerRole::BottomCopper | LayerRole::InnerCopper
        )
    }
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LayerRole {
    type Err = CamToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        LayerRole::ALL
            .into_iter()
            .find(|role| role.as_str() == wanted)
            .ok_or_else(|| CamToolError::UnknownRole(s.to_string()))
    }
}

/// Forces a role for entries whose base file name matches `pattern`.
///
/// The pattern is matched case-sensitively against the whole name; `*`
/// matches any run of characters and `?` matches exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerHint {
    pub pattern: String,
    pub role: LayerRole,
}

impl LayerHint {
    pub fn new(pattern: impl Into<String>, role: LayerRole) -> Self {
        Self {
            pattern: pattern.into(),
            role,
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        if !self.pattern.contains(['*', '?']) {
            return self.pattern == file_name;
        }
        let mut body = String::with_capacity(self.pattern.len() + 8);
        let mut buf = [0u8; 4];
        for ch in self.pattern.chars() {
            match ch {
                '*' => body.push_str(".*"),
                '?' => body.push('.'),
                other => body.push_str(&regex::escape(other.encode_utf8(&mut buf))),
            }
        }
        Regex::new(&format!("^{}$", body))
            .map(|re| re.is_match(file_name))
            .unwrap_or(false)
    }
}

impl FromStr for LayerHint {
    type Err = CamToolError;

    /// Parse `PATTERN=ROLE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pattern, role) = s
            .rsplit_once('=')
            .ok_or_else(|| CamToolError::invalid_hint(s, "expected PATTERN=ROLE"))?;
        if pattern.is_empty() {
            return Err(CamToolError::invalid_hint(s, "empty pattern"));
        }
        let role = role
            .parse::<LayerRole>()
            .map_err(|e| CamToolError::invalid_hint(s, e.to_string()))?;
        Ok(LayerHint::new(pattern, role))
    }
}

/// Outcome of classifying a single file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Gerber(LayerRole),
    Drill,
    Ignored,
}

/// A Gerber entry tagged with its role.
#[derive(Debug, Clone)]
pub struct ClassifiedGerber {
    pub entry: ArchiveEntry,
    pub role: LayerRole,
}

/// All archive entries, sorted into buckets. Every input entry lands in
/// exactly one bucket.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub gerbers: Vec<ClassifiedGerber>,
    pub drills: Vec<ArchiveEntry>,
    pub ignored: Vec<ArchiveEntry>,
}

impl Classification {
    pub fn total(&self) -> usize {
        self.gerbers.len() + self.drills.len() + self.ignored.len()
    }
}

const DRILL_EXTENSIONS: &[&str] = &["drl", "xln", "exc", "drd", "tap", "nc"];

fn gerber_extension_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(gbr|ger|pho|art|gtl|gbl|gts|gbs|gto|gbo|gtp|gbp|gko|gml|gm\d+|gp?\d+|cmp|sol|stc|sts|plc|pls|crc|crs)$",
        )
        .expect("invalid regex pattern")
    })
}

/// Ordered role heuristics over the lowercased file name. Paste comes
/// first so paste layers are not read as copper; the rest run copper,
/// mask, silk, outline, mechanical.
fn role_rules() -> &'static [(LayerRole, Regex)] {
    static RULES: OnceLock<Vec<(LayerRole, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        let rules = [
            (
                LayerRole::TopPaste,
                r"(^|[^a-z0-9])f[._]paste|top[._ -]?paste|paste[._ -]?top|\.gtp$|\.crc$",
            ),
            (
                LayerRole::BottomPaste,
                r"(^|[^a-z0-9])b[._]paste|bot(tom)?[._ -]?paste|paste[._ -]?bot|\.gbp$|\.crs$",
            ),
            (
                LayerRole::TopCopper,
                r"(^|[^a-z0-9])f[._]cu|top[._ -]?(copper|layer|cu)|copper[._ -]?top|\.gtl$|\.cmp$",
            ),
            (
                LayerRole::BottomCopper,
                r"(^|[^a-z0-9])b[._]cu|bot(tom)?[._ -]?(copper|layer|cu)|copper[._ -]?bot|\.gbl$|\.sol$",
            ),
            (
                LayerRole::InnerCopper,
                r"(^|[^a-z0-9])in\d+[._]cu|inner|\.gp?\d+$",
            ),
            (
                LayerRole::TopMask,
                r"(^|[^a-z0-9])f[._]mask|top[._ -]?(solder)?[._ -]?mask|mask[._ -]?top|\.gts$|\.stc$",
            ),
            (
                LayerRole::BottomMask,
                r"(^|[^a-z0-9])b[._]mask|bot(tom)?[._ -]?(solder)?[._ -]?mask|mask[._ -]?bot|\.gbs$|\.sts$",
            ),
            (
                LayerRole::TopSilk,
                r"(^|[^a-z0-9])f[._]silk|top[._ -]?(silk|legend|overlay)|(silk(screen)?|legend|overlay)[._ -]?top|\.gto$|\.plc$",
            ),
            (
                LayerRole::BottomSilk,
                r"(^|[^a-z0-9])b[._]silk|bot(tom)?[._ -]?(silk|legend|overlay)|(silk(screen)?|legend|overlay)[._ -]?bot|\.gbo$|\.pls$",
            ),
            (
                LayerRole::Outline,
                r"edge[._]cuts|outline|profile|board[._ -]?edge|\.gko$|\.gm1$|\.gml$",
            ),
            (
                LayerRole::Mechanical,
                r"mechanical|(^|[^a-z])(fab|courtyard|user|margin|dwgs|cmts)|\.gm\d+$",
            ),
        ];
        rules
            .into_iter()
            .map(|(role, pattern)| (role, Regex::new(pattern).expect("invalid regex pattern")))
            .collect()
    })
}

fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

fn is_drill_name(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    let by_extension = extension_of(file_name)
        .map(|ext| DRILL_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);
    by_extension || lower.contains("drill") || lower.contains("via")
}

fn is_gerber_name(file_name: &str) -> bool {
    extension_of(file_name)
        .map(|ext| gerber_extension_regex().is_match(&ext))
        .unwrap_or(false)
}

/// Role from filename heuristics alone.
pub fn heuristic_role(file_name: &str) -> LayerRole {
    let lower = file_name.to_ascii_lowercase();
    role_rules()
        .iter()
        .find(|(_, re)| re.is_match(&lower))
        .map(|(role, _)| *role)
        .unwrap_or(LayerRole::Unknown)
}

/// Classify one base file name.
///
/// A matching hint always yields a Gerber with the hinted role, even when
/// the extension is not a known CAM suffix. Otherwise drill detection
/// runs before Gerber detection.
pub fn classify_name(file_name: &str, hints: &[LayerHint]) -> FileClass {
    if let Some(hint) = hints.iter().find(|h| h.matches(file_name)) {
        return FileClass::Gerber(hint.role);
    }
    if is_drill_name(file_name) {
        return FileClass::Drill;
    }
    if is_gerber_name(file_name) {
        return FileClass::Gerber(heuristic_role(file_name));
    }
    FileClass::Ignored
}

/// Sort archive entries into Gerber, drill and ignored buckets.
pub fn classify<I>(entries: I, hints: &[LayerHint]) -> Classification
where
    I: IntoIterator<Item = ArchiveEntry>,
{
    let mut result = Classification::default();
    for entry in entries {
        match classify_name(entry.file_name(), hints) {
            FileClass::Gerber(role) => {
                debug!("Classified {} as {}", entry.path(), role);
                result.gerbers.push(ClassifiedGerber { entry, role });
            }
            FileClass::Drill => {
                debug!("Classified {} as drill", entry.path());
                result.drills.push(entry);
            }
            FileClass::Ignored => {
                debug!("Ignoring {}", entry.path());
                result.ignored.push(entry);
            }
        }
    }
    result
}
