// tests/end_to_end.rs
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use repomap_core::config::MapConfig;
use repomap_core::io::FsIo;
use repomap_core::progress::NoopProgress;
use repomap_core::{generate_map, GenerateMapInputs};

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn run(
    repo_root: PathBuf,
    chat_files: Vec<PathBuf>,
    other_files: Vec<PathBuf>,
    mentioned_fnames: HashSet<PathBuf>,
    mentioned_identifiers: HashSet<String>,
    map_tokens: i64,
) -> String {
    let io = FsIo;
    let mut progress = NoopProgress;
    let should_stop = || false;
    let inputs = GenerateMapInputs {
        chat_files,
        other_files,
        mentioned_fnames,
        mentioned_identifiers,
        map_tokens: Some(map_tokens),
        max_context_tokens: None,
        config: MapConfig::new(repo_root),
        io: &io,
        token_count: &word_count,
        progress: &mut progress,
        should_stop: &should_stop,
    };
    generate_map(inputs).expect("valid nonnegative budget")
}

#[test]
fn empty_repo_returns_empty_string() {
    let dir = tempdir().unwrap();
    let out = run(dir.path().to_path_buf(), vec![], vec![], HashSet::new(), HashSet::new(), 1024);
    assert_eq!(out, "");
}

#[test]
fn single_file_repo_renders_its_definition() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("greet.py");
    fs::write(&file, "\"\"\"doc\"\"\"\ndef greet():\n    print(\"hi\")\n").unwrap();

    let out = run(dir.path().to_path_buf(), vec![], vec![file], HashSet::new(), HashSet::new(), 4096);
    assert!(out.contains("greet.py:"));
    assert!(out.contains("def greet():"));
    assert!(out.contains('\u{22ee}'));
}

#[test]
fn cross_file_reference_ranks_the_definer_and_excludes_chat_files() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.py");
    let b = dir.path().join("b.py");
    fs::write(&a, "class Foo:\n    pass\n").unwrap();
    fs::write(&b, "f = Foo()\n").unwrap();

    let out = run(
        dir.path().to_path_buf(),
        vec![b.clone()],
        vec![a, b],
        HashSet::new(),
        HashSet::new(),
        4096,
    );
    assert!(out.contains("a.py:"));
    assert!(!out.contains("b.py:"));
}

#[test]
fn underscored_symbol_ranks_below_identically_referenced_public_symbol() {
    use repomap_core::graph::{build_graph, rank};
    use repomap_core::tag::{Tag, TagKind};

    let x = PathBuf::from("x.py");
    let y = PathBuf::from("y.py");
    let z = PathBuf::from("z.py");
    let tags = vec![
        Tag::new("x.py", x.clone(), "_internal", 0, TagKind::Def),
        Tag::new("y.py", y.clone(), "_internal", 0, TagKind::Ref),
        Tag::new("z.py", z.clone(), "Public", 0, TagKind::Def),
        Tag::new("y.py", y.clone(), "Public", 1, TagKind::Ref),
    ];
    let graph = build_graph(&tags, &[x, y, z], &[], &HashSet::new(), &HashSet::new());
    let ranked = rank(&graph);

    let internal = ranked.iter().find(|t| t.name == "_internal").unwrap();
    let public = ranked.iter().find(|t| t.name == "Public").unwrap();
    assert!(internal.score < public.score);
}

#[test]
fn small_budget_forces_some_files_to_header_only() {
    let dir = tempdir().unwrap();
    let mut files = Vec::new();
    for i in 0..10 {
        let path = dir.path().join(format!("mod_{i}.py"));
        fs::write(&path, format!("def func_{i}():\n    return {i}\n")).unwrap();
        files.push(path);
    }

    let out = run(dir.path().to_path_buf(), vec![], files, HashSet::new(), HashSet::new(), 20);
    assert!(word_count(&out) as f64 <= 20.0 * 1.15 + 1.0);
    assert!(out.contains(".py:"));
}

#[test]
fn rewriting_a_file_with_identical_content_reextracts_but_output_is_stable() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("stable.py");
    let content = "def stable():\n    pass\n";
    fs::write(&file, content).unwrap();

    let first = run(
        dir.path().to_path_buf(),
        vec![],
        vec![file.clone()],
        HashSet::new(),
        HashSet::new(),
        4096,
    );

    fs::write(&file, content).unwrap();

    let second = run(dir.path().to_path_buf(), vec![], vec![file], HashSet::new(), HashSet::new(), 4096);
    assert_eq!(first, second);
}

#[test]
fn mentioned_identifier_outranks_the_same_run_without_it() {
    use repomap_core::graph::{build_graph, rank};
    use repomap_core::tag::{Tag, TagKind};

    let a = PathBuf::from("a.py");
    let b = PathBuf::from("b.py");
    let tags = vec![
        Tag::new("a.py", a.clone(), "Thing", 0, TagKind::Def),
        Tag::new("b.py", b.clone(), "Thing", 0, TagKind::Ref),
    ];

    let baseline_graph = build_graph(&tags, &[a.clone(), b.clone()], &[], &HashSet::new(), &HashSet::new());
    let baseline_rank = rank(&baseline_graph);
    let baseline_score = baseline_rank.iter().find(|t| t.name == "Thing").unwrap().score;

    let mentioned: HashSet<String> = ["Thing".to_string()].into_iter().collect();
    let boosted_graph = build_graph(&tags, &[a, b], &[], &HashSet::new(), &mentioned);
    let boosted_rank = rank(&boosted_graph);
    let boosted_score = boosted_rank.iter().find(|t| t.name == "Thing").unwrap().score;

    assert!(boosted_score >= baseline_score);
}

#[test]
fn negative_budget_is_a_programmer_contract_error() {
    let dir = tempdir().unwrap();
    let io = FsIo;
    let mut progress = NoopProgress;
    let should_stop = || false;
    let inputs = GenerateMapInputs {
        chat_files: vec![],
        other_files: vec![],
        mentioned_fnames: HashSet::new(),
        mentioned_identifiers: HashSet::new(),
        map_tokens: Some(-1),
        max_context_tokens: None,
        config: MapConfig::new(dir.path().to_path_buf()),
        io: &io,
        token_count: &word_count,
        progress: &mut progress,
        should_stop: &should_stop,
    };
    assert!(generate_map(inputs).is_err());
}

#[test]
fn absent_map_tokens_falls_back_to_max_context_tokens() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("greet.py");
    fs::write(&file, "def greet():\n    pass\n").unwrap();

    let io = FsIo;
    let mut progress = NoopProgress;
    let should_stop = || false;
    let inputs = GenerateMapInputs {
        chat_files: vec![],
        other_files: vec![file],
        mentioned_fnames: HashSet::new(),
        mentioned_identifiers: HashSet::new(),
        map_tokens: None,
        max_context_tokens: Some(4096),
        config: MapConfig::new(dir.path().to_path_buf()),
        io: &io,
        token_count: &word_count,
        progress: &mut progress,
        should_stop: &should_stop,
    };
    let out = generate_map(inputs).expect("valid fallback budget");
    assert!(out.contains("greet.py:"));
}

#[test]
fn cancellation_before_any_file_still_returns_ok() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.py");
    fs::write(&file, "def a():\n    pass\n").unwrap();

    let io = FsIo;
    let mut progress = NoopProgress;
    let should_stop = || true;
    let inputs = GenerateMapInputs {
        chat_files: vec![],
        other_files: vec![file],
        mentioned_fnames: HashSet::new(),
        mentioned_identifiers: HashSet::new(),
        map_tokens: Some(4096),
        max_context_tokens: None,
        config: MapConfig::new(dir.path().to_path_buf()),
        io: &io,
        token_count: &word_count,
        progress: &mut progress,
        should_stop: &should_stop,
    };
    let out = generate_map(inputs).expect("cancellation is not an error");
    assert_eq!(out, "");
}
