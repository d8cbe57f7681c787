//! Regex-based identifier lexer: the fallback extraction path for files with
//! no grammar, or whose grammar recovered zero references (spec §4.2).
//!
//! Every identifier-shaped token becomes a `@reference.call`-equivalent tag;
//! the lexer has no syntactic notion of a definition, so it never produces
//! [`TagKind::Def`] tags.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::tag::{Tag, TagKind};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("static identifier regex"));

/// A conservative keyword stoplist shared across the C-family/Python/Go
/// surface area this fallback actually sees in practice; unrecognized
/// languages still tokenize fine, just without stopword filtering for their
/// own keywords.
const STOPWORDS: &[&str] = &[
    "if", "else", "for", "while", "return", "break", "continue", "fn", "func", "def", "class",
    "struct", "enum", "impl", "trait", "pub", "use", "import", "from", "as", "let", "const",
    "var", "mut", "static", "true", "false", "null", "nil", "none", "self", "this", "new",
    "public", "private", "protected", "void", "int", "string", "bool", "in", "is", "and", "or",
    "not", "try", "catch", "except", "finally", "throw", "throws", "async", "await", "match",
    "switch", "case", "default", "package", "type", "interface", "extends", "implements",
];

/// Tokenizes `text` into reference tags, one per identifier-shaped token that
/// isn't in the stopword list.
#[must_use]
pub fn lex_references(rel_path: &str, abs_path: &Path, text: &str) -> Vec<Tag> {
    let mut tags = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        for m in IDENTIFIER.find_iter(line) {
            let word = m.as_str();
            if STOPWORDS.contains(&word) {
                continue;
            }
            tags.push(Tag::new(rel_path, abs_path.to_path_buf(), word, line_idx, TagKind::Ref));
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extracts_identifiers_and_skips_keywords() {
        let tags = lex_references("a.txt", &PathBuf::from("a.txt"), "if foo_bar then baz()");
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert!(names.contains(&"foo_bar"));
        assert!(names.contains(&"then"));
        assert!(names.contains(&"baz"));
        assert!(!names.contains(&"if"));
    }

    #[test]
    fn every_lexed_tag_is_a_reference() {
        let tags = lex_references("a.txt", &PathBuf::from("a.txt"), "alpha beta gamma");
        assert!(tags.iter().all(|t| t.kind == TagKind::Ref));
    }

    #[test]
    fn empty_text_yields_no_tags() {
        assert!(lex_references("a.txt", &PathBuf::from("a.txt"), "").is_empty());
    }
}
