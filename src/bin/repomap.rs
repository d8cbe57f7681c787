// src/bin/repomap.rs
use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use repomap_core::config::{MapConfig, RefreshMode};
use repomap_core::io::FsIo;
use repomap_core::lang::Lang;
use repomap_core::progress::NoopProgress;
use repomap_core::tokens::Tokenizer;
use repomap_core::{generate_map, GenerateMapInputs};

/// Thin CLI front-end over the ranked-tag engine; flag parsing and file
/// discovery live here, outside the core's scope.
#[derive(Parser)]
#[command(name = "repomap", version, about = "Ranked, token-budgeted repository maps")]
struct Cli {
    /// Files already visible to the downstream consumer (excluded from output).
    #[arg(long = "chat", value_name = "PATH")]
    chat_files: Vec<PathBuf>,

    /// Files explicitly named in surrounding context; ranked higher.
    #[arg(long = "mention-file", value_name = "PATH")]
    mentioned_fnames: Vec<PathBuf>,

    /// Identifiers explicitly named in surrounding context; ranked higher.
    #[arg(long = "mention-id", value_name = "NAME")]
    mentioned_identifiers: Vec<String>,

    /// Token budget for the rendered map. Defaults to `--max-context-tokens`
    /// when omitted.
    #[arg(long)]
    map_tokens: Option<i64>,

    /// The model's context window, consulted only when `--map-tokens` is
    /// omitted.
    #[arg(long, default_value_t = 4096)]
    max_context_tokens: i64,

    /// Restrict grammar-based extraction to these languages (others still
    /// fall through to the identifier lexer). Repeatable.
    #[arg(long = "lang", value_name = "NAME")]
    language_allow_list: Vec<String>,

    /// Root the cache directory under this path instead of `--root`.
    #[arg(long)]
    cache_root: Option<PathBuf>,

    /// Cache refresh policy.
    #[arg(long, value_enum, default_value_t = RefreshArg::Auto)]
    refresh: RefreshArg,

    /// Drop and rebuild the cache before this run.
    #[arg(long)]
    force_refresh: bool,

    /// Repository root the cache directory is rooted under.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Files to scan. Defaults to every argument not otherwise recognized.
    files: Vec<PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum RefreshArg {
    Auto,
    Files,
    Manual,
    Always,
}

impl From<RefreshArg> for RefreshMode {
    fn from(arg: RefreshArg) -> Self {
        match arg {
            RefreshArg::Auto => Self::Auto,
            RefreshArg::Files => Self::Files,
            RefreshArg::Manual => Self::Manual,
            RefreshArg::Always => Self::Always,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:?}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = MapConfig::new(cli.root);
    config.refresh = cli.refresh.into();
    config.force_refresh = cli.force_refresh;
    config.cache_root = cli.cache_root;
    if !cli.language_allow_list.is_empty() {
        config.language_allow_list = Some(
            cli.language_allow_list
                .iter()
                .filter_map(|name| parse_lang(name))
                .collect(),
        );
    }

    let io = FsIo;
    let token_count = |text: &str| Tokenizer::count(text);
    let mut progress = NoopProgress;
    let should_stop = || false;

    let inputs = GenerateMapInputs {
        chat_files: cli.chat_files,
        other_files: cli.files,
        mentioned_fnames: cli.mentioned_fnames.into_iter().collect::<HashSet<_>>(),
        mentioned_identifiers: cli.mentioned_identifiers.into_iter().collect::<HashSet<_>>(),
        map_tokens: cli.map_tokens,
        max_context_tokens: Some(cli.max_context_tokens),
        config,
        io: &io,
        token_count: &token_count,
        progress: &mut progress,
        should_stop: &should_stop,
    };

    let map = generate_map(inputs)?;
    print!("{map}");
    Ok(())
}

/// Maps a `--lang` CLI value to a [`Lang`] by extension equivalence, so
/// callers can write `--lang rs` the same way they'd write a file extension.
fn parse_lang(name: &str) -> Option<Lang> {
    Lang::from_ext(name)
}
