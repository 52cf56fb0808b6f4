//! Line cleanup applied to every paragraph before it is classified.

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Strips surrounding whitespace and byte-order marks from a line.
///
/// Whitespace and BOMs are trimmed together, so a BOM hiding behind a space
/// (or the reverse) is removed in one pass and the function is idempotent.
pub fn clean_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
}
