//! Ranker (spec §4.5): personalized PageRank over the file graph, then a
//! redistribution pass that turns per-file rank into per-`(file, identifier)`
//! scores.

use std::path::PathBuf;

use super::builder::TagGraph;

const DAMPING: f64 = 0.85;
const TOLERANCE: f64 = 1e-6;
const MAX_ITERATIONS: usize = 100;

/// One ranked candidate tag, ready for the selector.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTag {
    pub path: PathBuf,
    pub name: String,
    pub best_line: usize,
    pub score: f64,
}

/// Runs personalized PageRank to convergence, then distributes each file's
/// converged rank across its outgoing edges and onto `(definer, name)`
/// pairs. Definitions that never receive an edge contribution fall back to
/// the baseline `r(definer) / (definitions_in_file + 1)` rule. `chat_files`
/// are excluded from the returned list but still shaped the graph.
#[must_use]
pub fn rank(graph: &TagGraph) -> Vec<RankedTag> {
    let file_rank = pagerank(graph);

    let mut scores: std::collections::HashMap<(PathBuf, String), f64> = std::collections::HashMap::new();
    for (u, edges) in graph.out_edges.iter().enumerate() {
        let out_weight: f64 = edges.iter().map(|e| e.weight).sum();
        if out_weight <= 0.0 {
            continue;
        }
        for edge in edges {
            let contribution = file_rank[u] * edge.weight / out_weight;
            let definer = graph.nodes[edge.to].clone();
            *scores.entry((definer, edge.name.clone())).or_insert(0.0) += contribution;
        }
    }

    let mut ranked = Vec::new();
    for ((path, name), tags) in &graph.definitions {
        if graph.chat_files.contains(path) {
            continue;
        }
        let best_line = tags.iter().map(|t| t.line).min().unwrap_or(0);
        let score = scores.get(&(path.clone(), name.clone())).copied().unwrap_or_else(|| {
            let r = graph
                .nodes
                .iter()
                .position(|n| n == path)
                .map_or(0.0, |idx| file_rank[idx]);
            let def_count = graph.def_count_per_path.get(path).copied().unwrap_or(0) as f64;
            r / (def_count + 1.0)
        });
        ranked.push(RankedTag { path: path.clone(), name: name.clone(), best_line, score });
    }

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
            .then_with(|| a.best_line.cmp(&b.best_line))
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}

/// Power iteration with dangling-mass redistribution to the personalization
/// vector, converging by L1 residual rather than a fixed iteration count.
fn pagerank(graph: &TagGraph) -> Vec<f64> {
    let n = graph.nodes.len();
    if n == 0 {
        return Vec::new();
    }

    let out_weight: Vec<f64> = (0..n).map(|u| graph.out_weight(u)).collect();
    let mut r = graph.personalization.clone();

    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![0.0f64; n];
        let mut dangling_mass = 0.0f64;

        for u in 0..n {
            if out_weight[u] <= 0.0 {
                dangling_mass += r[u];
                continue;
            }
            for edge in &graph.out_edges[u] {
                next[edge.to] += r[u] * edge.weight / out_weight[u];
            }
        }

        let mut residual = 0.0f64;
        for v in 0..n {
            let teleport = (1.0 - DAMPING) * graph.personalization[v];
            let surfed = DAMPING * (next[v] + dangling_mass * graph.personalization[v]);
            let value = teleport + surfed;
            residual += (value - r[v]).abs();
            next[v] = value;
        }
        r = next;
        if residual < TOLERANCE {
            break;
        }
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::build_graph;
    use crate::tag::{Tag, TagKind};
    use std::collections::HashSet;

    fn tag(path: &str, name: &str, kind: TagKind) -> Tag {
        Tag::new(path, PathBuf::from(path), name, 2, kind)
    }

    #[test]
    fn referenced_definition_outranks_unreferenced_one() {
        let a = PathBuf::from("a.rs");
        let b = PathBuf::from("b.rs");
        let c = PathBuf::from("c.rs");
        let tags = vec![
            tag("a.rs", "Foo", TagKind::Def),
            tag("b.rs", "Foo", TagKind::Ref),
            tag("c.rs", "Bar", TagKind::Def),
        ];
        let graph = build_graph(&tags, &[a, b, c], &[], &HashSet::new(), &HashSet::new());
        let ranked = rank(&graph);
        let foo = ranked.iter().find(|t| t.name == "Foo").unwrap();
        let bar = ranked.iter().find(|t| t.name == "Bar").unwrap();
        assert!(foo.score > bar.score);
    }

    #[test]
    fn chat_files_are_excluded_from_output() {
        let a = PathBuf::from("a.rs");
        let b = PathBuf::from("b.rs");
        let tags = vec![tag("a.rs", "Foo", TagKind::Def), tag("b.rs", "Foo", TagKind::Ref)];
        let graph = build_graph(&tags, &[a.clone(), b], &[a.clone()], &HashSet::new(), &HashSet::new());
        let ranked = rank(&graph);
        assert!(ranked.iter().all(|t| t.path != a));
    }

    #[test]
    fn underscore_identifier_ranks_below_identically_referenced_public_one() {
        let a = PathBuf::from("a.rs");
        let b = PathBuf::from("b.rs");
        let c = PathBuf::from("c.rs");
        let tags = vec![
            tag("a.rs", "_internal", TagKind::Def),
            tag("b.rs", "_internal", TagKind::Ref),
            tag("c.rs", "Public", TagKind::Def),
            tag("b.rs", "Public", TagKind::Ref),
        ];
        let graph = build_graph(&tags, &[a, b, c], &[], &HashSet::new(), &HashSet::new());
        let ranked = rank(&graph);
        let internal = ranked.iter().find(|t| t.name == "_internal").unwrap();
        let public = ranked.iter().find(|t| t.name == "Public").unwrap();
        assert!(internal.score < public.score);
    }

    #[test]
    fn empty_graph_ranks_nothing() {
        let graph = build_graph(&[], &[], &[], &HashSet::new(), &HashSet::new());
        assert!(rank(&graph).is_empty());
    }
}
