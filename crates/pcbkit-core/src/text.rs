//! Text normalisation applied to every CAM file before interpretation.

const BOM: char = '\u{feff}';

/// Strip a leading byte-order mark, convert CRLF and lone CR line endings
/// to LF, and trim blank lines from both ends.
///
/// Normalising already-normalised text returns it unchanged.
pub fn normalize_text(input: &str) -> String {
    let without_bom = input.strip_prefix(BOM).unwrap_or(input);
    let unified = without_bom.replace("\r\n", "\n").replace('\r', "\n");

    let lines: Vec<&str> = unified.split('\n').collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());

    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}
