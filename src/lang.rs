//! Language Registry (spec §4.1): resolves a file path to a language and its
//! query patterns. Resolution is extension-based (case-insensitive) with a
//! small filename-override table; unmatched paths fall through to the lexer.

use tree_sitter::Language;

use crate::lang_queries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Go,
    Java,
    CSharp,
    Swift,
}

impl Lang {
    /// Resolves a path to a language, checking filename overrides first
    /// (build-file names with no available grammar resolve to `None`, which
    /// routes the file through the lexer fallback) and then extension.
    #[must_use]
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if filename_override_has_no_grammar(name) {
                return None;
            }
        }
        let ext = path.extension().and_then(|s| s.to_str())?;
        Self::from_ext(ext)
    }

    #[must_use]
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "rs" => Some(Self::Rust),
            "py" | "pyi" => Some(Self::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            "cs" => Some(Self::CSharp),
            "swift" => Some(Self::Swift),
            _ => None,
        }
    }

    #[must_use]
    pub fn grammar(self) -> Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::Java => tree_sitter_java::LANGUAGE.into(),
            Self::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            Self::Swift => tree_sitter_swift::LANGUAGE.into(),
        }
    }

    /// The combined tags query: `@definition.*`, `@reference.*`, and `@name`
    /// captures in one source, per spec §6's query-file contract.
    #[must_use]
    pub fn tags_query(self) -> &'static str {
        lang_queries::tags_query(self)
    }
}

/// Filenames that have no tree-sitter grammar in this registry at all, so
/// resolving them by extension (or lack of one) would be misleading; they
/// are explicitly routed to the lexer fallback instead.
fn filename_override_has_no_grammar(name: &str) -> bool {
    matches!(
        name,
        "Makefile" | "Dockerfile" | "dockerfile" | "CMakeLists.txt" | "BUILD" | "WORKSPACE"
    )
}
