//! Graph Builder (spec §4.4): turns a flat tag stream into a directed,
//! weighted multigraph over files, plus the personalization vector the
//! ranker teleports to.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::tag::{Tag, TagKind};

/// One directed edge `u -> v`, tagged with the identifier that produced it
/// so the ranker can later distribute mass onto `(v, name)` pairs.
#[derive(Debug, Clone)]
pub struct Edge {
    pub to: usize,
    pub weight: f64,
    pub name: String,
}

/// The weighted multigraph over scanned + chat + mentioned files.
pub struct TagGraph {
    pub nodes: Vec<PathBuf>,
    node_index: HashMap<PathBuf, usize>,
    pub out_edges: Vec<Vec<Edge>>,
    pub personalization: Vec<f64>,
    /// `(defining_path, identifier) -> defining tags`, retained for line info.
    pub definitions: HashMap<(PathBuf, String), Vec<Tag>>,
    /// Count of definition tags per file, used for the ranker's baseline score.
    pub def_count_per_path: HashMap<PathBuf, usize>,
    pub chat_files: HashSet<PathBuf>,
}

impl TagGraph {
    fn node_idx(&self, path: &PathBuf) -> Option<usize> {
        self.node_index.get(path).copied()
    }

    #[must_use]
    pub fn out_weight(&self, u: usize) -> f64 {
        self.out_edges[u].iter().map(|e| e.weight).sum()
    }
}

/// Builds the graph from every extracted tag, the caller's chat/mentioned
/// sets, and the full scanned file list (which determines node membership
/// even for files that defined or referenced nothing).
#[must_use]
pub fn build_graph(
    tags: &[Tag],
    scanned_files: &[PathBuf],
    chat_files: &[PathBuf],
    mentioned_fnames: &HashSet<PathBuf>,
    mentioned_identifiers: &HashSet<String>,
) -> TagGraph {
    // Step 1: index.
    let mut defines: HashMap<&str, HashSet<&PathBuf>> = HashMap::new();
    let mut definitions: HashMap<(PathBuf, String), Vec<Tag>> = HashMap::new();
    let mut def_count_per_path: HashMap<PathBuf, usize> = HashMap::new();
    let mut references: HashMap<&str, HashMap<&PathBuf, u64>> = HashMap::new();

    for tag in tags {
        match tag.kind {
            TagKind::Def => {
                defines.entry(tag.name.as_str()).or_default().insert(&tag.abs_path);
                definitions
                    .entry((tag.abs_path.clone(), tag.name.clone()))
                    .or_default()
                    .push(tag.clone());
                *def_count_per_path.entry(tag.abs_path.clone()).or_insert(0) += 1;
            }
            TagKind::Ref => {
                *references
                    .entry(tag.name.as_str())
                    .or_default()
                    .entry(&tag.abs_path)
                    .or_insert(0) += 1;
            }
        }
    }

    // Step 2: reference fallback — identifiers defined but never referenced
    // become self-referenced so they still participate in edge construction
    // (the self-edges this produces are dropped in step 3, which leaves such
    // definitions to the ranker's baseline-score rule).
    for (name, definers) in &defines {
        if !references.contains_key(name) {
            let entry = references.entry(name).or_default();
            for definer in definers {
                entry.insert(definer, 1);
            }
        }
    }

    // Node set: scanned files ∪ chat files ∪ mentioned files.
    let mut node_index: HashMap<PathBuf, usize> = HashMap::new();
    let mut nodes: Vec<PathBuf> = Vec::new();
    let mut add_node = |path: &PathBuf, nodes: &mut Vec<PathBuf>, node_index: &mut HashMap<PathBuf, usize>| {
        if !node_index.contains_key(path) {
            node_index.insert(path.clone(), nodes.len());
            nodes.push(path.clone());
        }
    };
    for f in scanned_files {
        add_node(f, &mut nodes, &mut node_index);
    }
    for f in chat_files {
        add_node(f, &mut nodes, &mut node_index);
    }
    for f in mentioned_fnames {
        add_node(f, &mut nodes, &mut node_index);
    }

    let mut out_edges: Vec<Vec<Edge>> = vec![Vec::new(); nodes.len()];

    // Step 3: edge construction.
    for (name, definers) in &defines {
        let mul = if mentioned_identifiers.contains(*name) {
            10.0
        } else if name.starts_with('_') {
            0.1
        } else {
            1.0
        };

        let Some(referrers) = references.get(name) else { continue };
        for (referrer, count) in referrers {
            let Some(u) = node_index.get(*referrer).copied() else { continue };
            for definer in definers {
                let Some(v) = node_index.get(*definer).copied() else { continue };
                if u == v {
                    continue;
                }
                let weight = mul * (*count as f64).sqrt();
                out_edges[u].push(Edge { to: v, weight, name: (*name).to_string() });
            }
        }
    }

    // Step 4: personalization, base weights then L1-normalized.
    let chat_set: HashSet<PathBuf> = chat_files.iter().cloned().collect();
    let mut personalization = vec![0.0f64; nodes.len()];
    for (idx, path) in nodes.iter().enumerate() {
        personalization[idx] = if chat_set.contains(path) {
            100.0
        } else if mentioned_fnames.contains(path) {
            10.0
        } else {
            1.0
        };
    }
    let total: f64 = personalization.iter().sum();
    if total > 0.0 {
        for w in &mut personalization {
            *w /= total;
        }
    }

    TagGraph {
        nodes,
        node_index,
        out_edges,
        personalization,
        definitions,
        def_count_per_path,
        chat_files: chat_set,
    }
}
