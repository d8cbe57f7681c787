//! Budgeted Selector (spec §4.6): binary search over the ranked-tag prefix
//! length for the render that best fills the token budget without going
//! meaningfully over it.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use crate::graph::RankedTag;
use crate::io::IoFacade;
use crate::render::{render, FileBlock};

const EPSILON: f64 = 0.15;
const EARLY_EXIT_FRACTION: f64 = 0.01;

/// Selects the largest ranked-tag prefix whose rendered form fits within
/// `budget * (1 + EPSILON)` tokens, appending header-only entries for
/// scanned files that contributed no selected tag. An empty `ranked` still
/// renders those header-only entries for `other_rel_paths` (the zero-prefix
/// case); only a zero budget or a zero-prefix render that already exceeds
/// the ceiling short-circuits to the empty string.
#[must_use]
pub fn select(
    ranked: &[RankedTag],
    other_rel_paths: &[(PathBuf, String)],
    rel_path_of: impl Fn(&PathBuf) -> String,
    budget: usize,
    token_count: impl Fn(&str) -> usize,
    io: &dyn IoFacade,
) -> String {
    if budget == 0 {
        return String::new();
    }

    let ceiling = ((budget as f64) * (1.0 + EPSILON)).ceil() as usize;
    let mut memo: HashMap<usize, (String, usize)> = HashMap::new();

    let mut render_k = |k: usize| -> (String, usize) {
        if let Some(cached) = memo.get(&k) {
            return cached.clone();
        }
        let text = render_prefix(ranked, other_rel_paths, &rel_path_of, k, io);
        let count = token_count(&text);
        memo.insert(k, (text.clone(), count));
        (text, count)
    };

    let (zero_text, zero_count) = render_k(0);
    if zero_count > ceiling {
        return String::new();
    }

    let mut lo = 0usize;
    let mut hi = ranked.len();
    let mut best = zero_text;
    let mut best_count = zero_count;
    let mut prev_count: Option<usize> = None;

    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        let (text, count) = render_k(mid);

        if let Some(prev) = prev_count {
            let delta = (count as f64 - prev as f64).abs();
            if delta < EARLY_EXIT_FRACTION * budget as f64 {
                if count <= ceiling && count >= best_count {
                    best = text;
                    best_count = count;
                }
                break;
            }
        }
        prev_count = Some(count);

        if count <= ceiling {
            if count >= best_count {
                best = text;
                best_count = count;
            }
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    best
}

fn render_prefix(
    ranked: &[RankedTag],
    other_rel_paths: &[(PathBuf, String)],
    rel_path_of: &impl Fn(&PathBuf) -> String,
    k: usize,
    io: &dyn IoFacade,
) -> String {
    let mut order: Vec<PathBuf> = Vec::new();
    let mut lines_by_path: HashMap<PathBuf, BTreeSet<usize>> = HashMap::new();
    let mut selected_paths: std::collections::HashSet<PathBuf> = std::collections::HashSet::new();

    for tag in ranked.iter().take(k) {
        if !lines_by_path.contains_key(&tag.path) {
            order.push(tag.path.clone());
        }
        lines_by_path.entry(tag.path.clone()).or_default().insert(tag.best_line);
        selected_paths.insert(tag.path.clone());
    }

    let mut blocks: Vec<FileBlock> = order
        .into_iter()
        .map(|path| {
            let rel_path = rel_path_of(&path);
            let lines = lines_by_path.remove(&path).unwrap_or_default();
            FileBlock::Expanded { rel_path, abs_path: path, lines }
        })
        .collect();

    for (path, rel_path) in other_rel_paths {
        if !selected_paths.contains(path) {
            blocks.push(FileBlock::HeaderOnly { rel_path: rel_path.clone() });
        }
    }

    render(&blocks, io)
}
