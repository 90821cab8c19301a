//! Comment stripping and tokenization.

/// Strips a trailing comment introduced by `#` or `;`.
pub fn strip_comment(line: &str) -> &str {
    match line.find(['#', ';']) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Splits a statement into upper-cased tokens.
///
/// Whitespace and the punctuation `,()` separate tokens and are discarded,
/// so `LW $r2,0($r1)` lexes to `["LW", "$R2", "0", "$R1"]`. A trailing `:`
/// is kept attached so the parser can recognize label definitions.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(|c: char| c.is_whitespace() || c == ',' || c == '(' || c == ')')
        .filter(|tok| !tok.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}
