//! `repomap_core`: the ranked-tag engine that produces a compact, budgeted
//! map of a repository's most relevant definitions and references.
//!
//! The single entry point is [`generate_map`]; everything else in this
//! crate is a stage of its pipeline, exposed publicly so callers can swap
//! in their own cache, I/O facade, or token counter.

pub mod cache;
pub mod config;
pub mod error;
pub mod extractor;
pub mod graph;
pub mod important_files;
pub mod io;
pub mod lang;
pub mod lang_queries;
pub mod lexer;
pub mod progress;
pub mod render;
pub mod selector;
pub mod tag;
pub mod tokens;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use cache::TagCache;
use config::{MapConfig, RefreshMode};
use error::{RepoMapError, Result};
use io::IoFacade;
use progress::ProgressReporter;
use tag::Tag;

/// All inputs to [`generate_map`] (spec §6's builder contract).
pub struct GenerateMapInputs<'a> {
    pub chat_files: Vec<PathBuf>,
    pub other_files: Vec<PathBuf>,
    pub mentioned_fnames: HashSet<PathBuf>,
    pub mentioned_identifiers: HashSet<String>,
    /// Explicit token budget. Falls back to `max_context_tokens` when absent
    /// (spec §6: "used only to default `map_tokens` when absent").
    pub map_tokens: Option<i64>,
    /// The model's context window, consulted only when `map_tokens` is `None`.
    pub max_context_tokens: Option<i64>,
    pub config: MapConfig,
    pub io: &'a dyn IoFacade,
    pub token_count: &'a dyn Fn(&str) -> usize,
    pub progress: &'a mut dyn ProgressReporter,
    /// Cooperative cancellation probe, checked between files during
    /// extraction (spec §5). Tags gathered before a stop are still committed
    /// to the cache.
    pub should_stop: &'a dyn Fn() -> bool,
}

/// Runs the full pipeline: extract (cached) -> build graph -> rank ->
/// budget-select -> render. Returns the rendered map, or an empty string if
/// nothing fit the budget (not an error). Fails fast only on a
/// programmer-contract violation (spec §7 class 4).
pub fn generate_map(inputs: GenerateMapInputs<'_>) -> Result<String> {
    let map_tokens = inputs.map_tokens.or(inputs.max_context_tokens).unwrap_or(0);
    if map_tokens < 0 {
        return Err(RepoMapError::NegativeBudget(map_tokens));
    }
    let budget = map_tokens as usize;

    let mut cache = open_cache(&inputs.config);
    if inputs.config.force_refresh {
        cache.clear();
    }

    let rel_path_of = |p: &Path| -> String {
        p.strip_prefix(&inputs.config.repo_root)
            .unwrap_or(p)
            .to_string_lossy()
            .replace('\\', "/")
    };

    inputs.progress.start(inputs.other_files.len());

    // Pass 1 (sequential): consult the cache, the run's only shared mutable
    // resource, for each file under the active refresh policy.
    let mut tags: Vec<Tag> = Vec::new();
    let mut to_extract: Vec<(PathBuf, String, i64, u64)> = Vec::new();
    for path in &inputs.other_files {
        if (inputs.should_stop)() {
            inputs.io.tool_warning("extraction cancelled; committing tags gathered so far");
            break;
        }
        let rel_path = rel_path_of(path);
        inputs.progress.step(&rel_path);

        if inputs.config.refresh == RefreshMode::Manual {
            if let Some(cached) = cache.get_unchecked(&rel_path, path) {
                tags.extend(cached);
            }
            continue;
        }

        let Ok(meta) = std::fs::metadata(path) else { continue };
        let (mtime_ns, size) = stat_key(&meta);

        if inputs.config.refresh == RefreshMode::Auto {
            if let Some(cached) = cache.get(&rel_path, path, mtime_ns, size) {
                tags.extend(cached);
                continue;
            }
        }
        to_extract.push((path.clone(), rel_path, mtime_ns, size));
    }

    // Pass 2 (parallel): pure per-file extraction over everything that
    // missed the cache.
    let allow_list = inputs.config.language_allow_list.as_ref();
    let fresh: Vec<(PathBuf, String, i64, u64, Vec<Tag>)> = to_extract
        .into_par_iter()
        .filter_map(|(path, rel_path, mtime_ns, size)| {
            per_file_tags(&path, &rel_path, inputs.io, allow_list).map(|t| (path, rel_path, mtime_ns, size, t))
        })
        .collect();

    // Pass 3 (sequential): write fresh entries back and fold into the tag set.
    for (_, rel_path, mtime_ns, size, file_tags) in &fresh {
        cache.put(rel_path, *mtime_ns, *size, file_tags);
    }
    tags.extend(fresh.into_iter().flat_map(|(_, _, _, _, t)| t));
    inputs.progress.stop();

    let graph = graph::build_graph(
        &tags,
        &inputs.other_files,
        &inputs.chat_files,
        &inputs.mentioned_fnames,
        &inputs.mentioned_identifiers,
    );
    let ranked = graph::rank(&graph);

    let chat_set: HashSet<&PathBuf> = inputs.chat_files.iter().collect();
    let other_rel_paths: Vec<(PathBuf, String)> = inputs
        .other_files
        .iter()
        .filter(|p| !chat_set.contains(*p))
        .map(|p| (p.clone(), rel_path_of(p)))
        .collect();

    let output = selector::select(
        &ranked,
        &other_rel_paths,
        |p| rel_path_of(p),
        budget,
        inputs.token_count,
        inputs.io,
    );

    Ok(output)
}

fn open_cache(config: &MapConfig) -> TagCache {
    if config.refresh == RefreshMode::Always {
        let _ = std::fs::remove_dir_all(config.cache_dir());
    }
    TagCache::open(&config.cache_dir())
}

fn stat_key(meta: &std::fs::Metadata) -> (i64, u64) {
    let mtime_ns = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_nanos() as i64);
    (mtime_ns, meta.len())
}

fn per_file_tags(
    path: &Path,
    rel_path: &str,
    io: &dyn IoFacade,
    allow_list: Option<&HashSet<crate::lang::Lang>>,
) -> Option<Vec<Tag>> {
    match io.read_text(path) {
        Ok(text) => Some(extractor::extract_tags(rel_path, path, &text, allow_list)),
        Err(e) => {
            io.tool_warning(&format!("could not read {}: {e}", path.display()));
            None
        }
    }
}
