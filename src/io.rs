//! Injected I/O facade: `read_text` plus non-fatal diagnostics.
//!
//! The concrete filesystem policy (what counts as readable, ignore rules,
//! etc.) is an external collaborator per spec; this module only supplies the
//! trait seam and a plain `std::fs`-backed default, in the teacher's style of
//! talking to the filesystem directly (`map.rs`, `skeleton.rs`) and
//! reporting problems with `colored`-prefixed `eprintln!` (`main.rs`).

use std::fs;
use std::path::Path;

use colored::Colorize;

/// Collaborator the core calls for file reads and non-fatal diagnostics.
///
/// `Send + Sync` so a single facade can be shared across the extractor's
/// parallel file-read phase.
pub trait IoFacade: Send + Sync {
    /// Reads a file's full text contents.
    ///
    /// # Errors
    /// Returns an error string on any read failure; callers treat this as a
    /// class-1 recoverable condition and skip the file.
    fn read_text(&self, path: &Path) -> Result<String, String>;

    /// Emits a non-fatal warning (recoverable conditions, classes 1-2).
    fn tool_warning(&self, msg: &str);

    /// Emits a non-fatal error notice (still does not abort the run).
    fn tool_error(&self, msg: &str);
}

/// Default filesystem-backed [`IoFacade`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FsIo;

impl IoFacade for FsIo {
    fn read_text(&self, path: &Path) -> Result<String, String> {
        fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))
    }

    fn tool_warning(&self, msg: &str) {
        eprintln!("{} {msg}", "warning:".yellow().bold());
    }

    fn tool_error(&self, msg: &str) {
        eprintln!("{} {msg}", "error:".red().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_existing_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "hello").unwrap();
        let io = FsIo;
        let text = io.read_text(f.path()).unwrap();
        assert_eq!(text.trim(), "hello");
    }

    #[test]
    fn missing_file_is_recoverable_error_value() {
        let io = FsIo;
        assert!(io.read_text(Path::new("/does/not/exist")).is_err());
    }
}
