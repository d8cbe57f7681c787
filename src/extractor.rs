//! Tag Extractor (spec §4.2): parses one file with its resolved grammar,
//! runs the combined tags query, and turns the matches into [`Tag`]s.
//!
//! Parse and query-execution failures are non-fatal: extraction for a file
//! that fails to parse, or whose grammar produces a broken query, returns an
//! empty tag list rather than propagating an error (class 1 in the error
//! taxonomy). Modeled on the tree-sitter usage in
//! `crates/codingbuddy-context/src/tags.rs`: owned `Language` via `.into()`,
//! `Query::new(&language, src)`, and `StreamingIterator` to drive the match
//! cursor.

use std::collections::HashSet;
use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

use crate::lang::Lang;
use crate::lexer;
use crate::tag::{Tag, TagKind};

/// Extracts tags from `text`, which lives at `abs_path` (for the returned
/// tags' absolute path) and is addressed as `rel_path` within the repo.
///
/// Falls back to the identifier lexer when the path has no resolvable
/// grammar, when `allow_list` is set and excludes the resolved language, or
/// when grammar-based extraction recovers zero references (a strong signal
/// the query failed silently rather than the file genuinely having none,
/// per spec §4.2's fallback rule).
#[must_use]
pub fn extract_tags(rel_path: &str, abs_path: &Path, text: &str, allow_list: Option<&HashSet<Lang>>) -> Vec<Tag> {
    let Some(lang) = Lang::from_path(abs_path) else {
        return lexer::lex_references(rel_path, abs_path, text);
    };
    if let Some(allowed) = allow_list {
        if !allowed.contains(&lang) {
            return lexer::lex_references(rel_path, abs_path, text);
        }
    }

    let tags = extract_with_grammar(lang, rel_path, abs_path, text);
    if tags.iter().any(|t| t.kind == TagKind::Ref) {
        tags
    } else {
        let mut fallback = lexer::lex_references(rel_path, abs_path, text);
        fallback.extend(tags.into_iter().filter(|t| t.kind == TagKind::Def));
        fallback
    }
}

fn extract_with_grammar(lang: Lang, rel_path: &str, abs_path: &Path, text: &str) -> Vec<Tag> {
    let language = lang.grammar();

    let mut parser = Parser::new();
    if parser.set_language(&language).is_err() {
        return Vec::new();
    }

    let Some(tree) = parser.parse(text, None) else {
        return Vec::new();
    };

    let Ok(query) = Query::new(&language, lang.tags_query()) else {
        return Vec::new();
    };

    let name_idx = query.capture_names().iter().position(|n| *n == "name");

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), text.as_bytes());

    let mut tags = Vec::new();
    while let Some(m) = matches.next() {
        let Some(name_idx) = name_idx else { continue };
        let Some(name_capture) = m.captures.iter().find(|c| c.index as usize == name_idx) else {
            continue;
        };
        let Ok(name) = name_capture.node.utf8_text(text.as_bytes()) else {
            continue;
        };
        let line = name_capture.node.start_position().row;

        let Some(kind) = classify_match(&query, m) else { continue };
        tags.push(Tag::new(rel_path, abs_path.to_path_buf(), name, line, kind));
    }
    tags
}

fn classify_match(query: &Query, m: &tree_sitter::QueryMatch<'_, '_>) -> Option<TagKind> {
    m.captures.iter().find_map(|c| {
        let capture_name = query.capture_names()[c.index as usize];
        if capture_name.starts_with("definition.") {
            Some(TagKind::Def)
        } else if capture_name.starts_with("reference.") {
            Some(TagKind::Ref)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extracts_rust_function_definition() {
        let src = "fn hello_world() {\n    other_fn();\n}\n";
        let tags = extract_tags("a.rs", &PathBuf::from("a.rs"), src, None);
        assert!(tags.iter().any(|t| t.name == "hello_world" && t.kind == TagKind::Def));
        assert!(tags.iter().any(|t| t.name == "other_fn" && t.kind == TagKind::Ref));
    }

    #[test]
    fn unresolvable_path_falls_back_to_lexer() {
        let tags = extract_tags("a.xyz", &PathBuf::from("a.xyz"), "foo bar baz", None);
        assert!(tags.iter().all(|t| t.kind == TagKind::Ref));
        assert!(tags.iter().any(|t| t.name == "foo"));
    }

    #[test]
    fn empty_file_yields_no_tags() {
        assert!(extract_tags("a.rs", &PathBuf::from("a.rs"), "", None).is_empty());
    }

    #[test]
    fn language_excluded_from_allow_list_falls_back_to_lexer() {
        let allow: HashSet<Lang> = [Lang::Python].into_iter().collect();
        let src = "fn hello_world() {}\n";
        let tags = extract_tags("a.rs", &PathBuf::from("a.rs"), src, Some(&allow));
        assert!(tags.iter().all(|t| t.kind == TagKind::Ref));
    }
}
