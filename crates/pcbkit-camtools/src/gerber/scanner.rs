//! Splits Gerber text into parameter blocks and command words.
//!
//! Line breaks carry no meaning in RS-274X: a `%...%` parameter block may
//! span several lines or hold several `*`-terminated parameters, and one
//! line may hold several command words.

/// One unit of Gerber input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A single parameter from inside `%...%`, without the delimiters and
    /// the terminating `*`.
    Param(String),
    /// A command word outside any parameter block, without the `*`.
    Word(String),
}

/// Scan normalised Gerber text into blocks. Empty words are dropped and
/// an unterminated trailing word is still returned.
pub fn scan_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut in_param = false;
    let mut current = String::new();

    for ch in text.chars() {
        match ch {
            // A `%` inside a comment word is comment text.
            '%' if !in_param && is_comment(&current) => current.push(ch),
            '%' => {
                flush(&mut current, in_param, &mut blocks);
                in_param = !in_param;
            }
            '*' => flush(&mut current, in_param, &mut blocks),
            '\n' | '\r' => {}
            _ => current.push(ch),
        }
    }
    flush(&mut current, in_param, &mut blocks);

    blocks
}

fn is_comment(word: &str) -> bool {
    let word = word.trim_start();
    word.starts_with("G04") || word.starts_with("G4 ")
}

fn flush(current: &mut String, in_param: bool, blocks: &mut Vec<Block>) {
    let word = current.trim();
    if !word.is_empty() {
        let word = word.to_string();
        blocks.push(if in_param {
            Block::Param(word)
        } else {
            Block::Word(word)
        });
    }
    current.clear();
}
