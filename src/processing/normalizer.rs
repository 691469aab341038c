//! Raw text cleanup shared by every other processing stage

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

/// Bullet glyphs commonly pasted from word processors and PDFs.
const BULLET_GLYPHS: [&str; 3] = ["\u{2022}", "\u{25AA}", "\u{25CF}"];

static BULLET_MATCHER: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(BULLET_GLYPHS).expect("bullet glyph patterns are valid"));

/// Unify line endings, turn bullet glyphs into `-` and trim the result.
///
/// Empty input yields empty output.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let unified = text.replace('\r', "\n");
    let replacements = ["-"; BULLET_GLYPHS.len()];
    BULLET_MATCHER
        .replace_all(&unified, &replacements)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }

    #[test]
    fn test_line_endings_unified() {
        assert_eq!(normalize("one\r\ntwo\rthree"), "one\n\ntwo\nthree");
    }

    #[test]
    fn test_bullet_glyphs_replaced() {
        let text = "• Python\n▪ Rust\n● Go";
        assert_eq!(normalize(text), "- Python\n- Rust\n- Go");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(normalize("\n\n  Senior engineer  \n"), "Senior engineer");
    }
}
