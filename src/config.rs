//! Map-generation configuration: refresh policy, cache placement, and the
//! optional language allow-list (spec §6's `MapConfig`-shaped collaborator,
//! in the teacher's plain-struct-with-`Default` style from its own
//! `config.rs`).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::lang::Lang;

/// Cache schema version. Bumped on any incompatible on-disk format change;
/// a mismatched directory simply isn't found and a fresh one is created.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Caller-specified cache refresh policy (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshMode {
    /// Use cache when valid; otherwise re-extract; write back.
    #[default]
    Auto,
    /// Always re-extract the scanned files; still write back.
    Files,
    /// Use cache unconditionally; never write back.
    Manual,
    /// Drop cache; re-extract; write back.
    Always,
}

#[derive(Debug, Clone)]
pub struct MapConfig {
    pub refresh: RefreshMode,
    pub force_refresh: bool,
    /// Repository root the cache directory is rooted under.
    pub repo_root: PathBuf,
    /// Overrides where the cache directory is created; defaults to
    /// `repo_root` when absent.
    pub cache_root: Option<PathBuf>,
    /// When set, only these languages are extracted with their tree-sitter
    /// grammar; every other file (allowed or not) still falls through to the
    /// identifier lexer, so nothing is ever silently dropped.
    pub language_allow_list: Option<HashSet<Lang>>,
}

impl MapConfig {
    #[must_use]
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            refresh: RefreshMode::Auto,
            force_refresh: false,
            repo_root: repo_root.into(),
            cache_root: None,
            language_allow_list: None,
        }
    }

    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        cache_dir_under(self.cache_root.as_deref().unwrap_or(&self.repo_root))
    }
}

/// The `.repomap.tags.cache.v<N>` directory path for a given repository root.
#[must_use]
pub fn cache_dir_under(repo_root: &Path) -> PathBuf {
    repo_root.join(format!(".repomap.tags.cache.v{CACHE_SCHEMA_VERSION}"))
}
