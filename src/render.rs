//! Renderer (spec §4.7): turns a set of `(path, line)` anchors into the
//! elided tree-style source listing.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::io::IoFacade;

/// One file's worth of output: either a set of anchor lines to expand with
/// context, or a bare header for a file that contributed no selected tag.
#[derive(Debug, Clone)]
pub enum FileBlock {
    Expanded { rel_path: String, abs_path: PathBuf, lines: BTreeSet<usize> },
    HeaderOnly { rel_path: String },
}

const ELISION: &str = "\u{22ee}";

/// Renders `blocks` in order, one file section per block, each terminated
/// by a single blank line.
#[must_use]
pub fn render(blocks: &[FileBlock], io: &dyn IoFacade) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            FileBlock::Expanded { rel_path, abs_path, lines } => {
                render_expanded(&mut out, rel_path, abs_path, lines, io);
            }
            FileBlock::HeaderOnly { rel_path } => {
                out.push_str(rel_path);
                out.push_str(":\n");
                out.push_str(ELISION);
                out.push('\n');
                out.push('\n');
            }
        }
    }
    out
}

fn render_expanded(out: &mut String, rel_path: &str, abs_path: &PathBuf, anchors: &BTreeSet<usize>, io: &dyn IoFacade) {
    out.push_str(rel_path);
    out.push_str(":\n");

    let Ok(text) = io.read_text(abs_path) else {
        out.push_str(ELISION);
        out.push('\n');
        out.push('\n');
        return;
    };

    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        out.push_str(ELISION);
        out.push('\n');
        out.push('\n');
        return;
    }

    let mut kept = BTreeSet::new();
    for &anchor in anchors {
        if anchor < lines.len() {
            kept.extend(hoist_context(&lines, anchor));
        }
    }

    if kept.is_empty() {
        out.push_str(ELISION);
        out.push('\n');
        out.push('\n');
        return;
    }

    let first = *kept.iter().next().unwrap();
    let last = *kept.iter().last().unwrap();
    if first > 0 {
        out.push_str(ELISION);
        out.push('\n');
    }

    let mut prev: Option<usize> = None;
    for &idx in &kept {
        if let Some(p) = prev {
            if idx > p + 1 {
                out.push_str(ELISION);
                out.push('\n');
            }
        }
        out.push('\u{2502}');
        out.push_str(lines[idx]);
        out.push('\n');
        prev = Some(idx);
    }

    if last + 1 < lines.len() {
        out.push_str(ELISION);
        out.push('\n');
    }
    out.push('\n');
}

/// Computes the kept-line set for one anchor: the anchor itself, plus
/// recursively each preceding line whose indentation is strictly less than
/// the current threshold, stopping at column 0 or a blank line.
fn hoist_context(lines: &[&str], anchor: usize) -> BTreeSet<usize> {
    let mut kept = BTreeSet::new();
    kept.insert(anchor);

    let mut threshold = indent_of(lines[anchor]);
    let mut i = anchor;
    while i > 0 {
        i -= 1;
        let line = lines[i];
        if line.trim().is_empty() {
            break;
        }
        let indent = indent_of(line);
        if indent < threshold {
            kept.insert(i);
            threshold = indent;
            if threshold == 0 {
                break;
            }
        }
    }
    kept
}

fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}
