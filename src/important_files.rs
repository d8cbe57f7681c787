//! The "important files" heuristic list.
//!
//! External collaborator: callers may consult this when building
//! `other_files`, but the core never reads it. Listed here only because it
//! is frequently mistaken for core logic (spec §9).

/// Filenames (exact, case-sensitive) commonly worth surfacing regardless of
/// rank: READMEs, licenses, CI configs, and other repo-root dotfiles.
pub const IMPORTANT_FILENAMES: &[&str] = &[
    "README.md",
    "README.rst",
    "README.txt",
    "README",
    "LICENSE",
    "LICENSE.md",
    "LICENSE.txt",
    "CONTRIBUTING.md",
    "CHANGELOG.md",
    "Cargo.toml",
    "package.json",
    "pyproject.toml",
    "go.mod",
    ".gitignore",
    ".github/workflows",
    "Dockerfile",
    "docker-compose.yml",
    "Makefile",
];
