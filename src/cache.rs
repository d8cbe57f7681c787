//! Tag Cache (spec §4.3): persists extracted tags keyed by the exact
//! `(mtime_ns, size)` pair observed at extraction time, so a changed-then-
//! reverted file with identical stat metadata is treated as a hit without
//! ever hashing content.
//!
//! Backed by `rusqlite` under `.repomap.tags.cache.v<N>/index.db`, the same
//! shape as `.dimpact/cache/v1`'s schema-versioned SQLite store. If the
//! store can't be opened (locked, corrupt, read-only filesystem) extraction
//! still works: a single warning is emitted and the cache falls back to an
//! in-memory map for the rest of the run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use colored::Colorize;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::tag::{Tag, TagKind};

#[derive(Debug, Serialize, Deserialize)]
struct StoredTag {
    name: String,
    line: usize,
    def: bool,
}

impl StoredTag {
    fn to_tag(&self, rel_path: &str, abs_path: &Path) -> Tag {
        let kind = if self.def { TagKind::Def } else { TagKind::Ref };
        Tag::new(rel_path, abs_path.to_path_buf(), self.name.clone(), self.line, kind)
    }

    fn from_tag(tag: &Tag) -> Self {
        Self {
            name: tag.name.clone(),
            line: tag.line,
            def: tag.kind == TagKind::Def,
        }
    }
}

struct MemEntry {
    mtime_ns: i64,
    size: u64,
    tags_json: String,
}

enum Backend {
    Sqlite(Connection),
    Memory(HashMap<String, MemEntry>),
}

/// The persistent per-file tag store.
pub struct TagCache {
    backend: Backend,
}

impl TagCache {
    /// Opens (creating if absent) the cache directory's SQLite store.
    /// Falls back to an in-memory map, with a single warning, on any
    /// failure to create the directory, open the database, or migrate
    /// its schema.
    pub fn open(cache_dir: &Path) -> Self {
        match Self::try_open_sqlite(cache_dir) {
            Ok(conn) => Self { backend: Backend::Sqlite(conn) },
            Err(e) => {
                eprintln!("{} tag cache unavailable ({e}), using in-memory cache for this run", "warning:".yellow().bold());
                Self { backend: Backend::Memory(HashMap::new()) }
            }
        }
    }

    /// An always-in-memory cache, useful for tests and one-shot callers
    /// that pass `refresh = Manual`-equivalent ephemeral runs.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { backend: Backend::Memory(HashMap::new()) }
    }

    fn try_open_sqlite(cache_dir: &Path) -> rusqlite::Result<Connection> {
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| rusqlite::Error::InvalidPath(PathBuf::from(e.to_string())))?;
        let conn = Connection::open(cache_dir.join("index.db"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tags (
                rel_path TEXT PRIMARY KEY,
                mtime_ns INTEGER NOT NULL,
                size INTEGER NOT NULL,
                tags_json TEXT NOT NULL
            )",
        )?;
        Ok(conn)
    }

    /// Returns the cached tags for `rel_path` if its stored `(mtime_ns,
    /// size)` matches exactly, `None` on a miss (absent, stale, or
    /// deserialization failure).
    #[must_use]
    pub fn get(&self, rel_path: &str, abs_path: &Path, mtime_ns: i64, size: u64) -> Option<Vec<Tag>> {
        match &self.backend {
            Backend::Sqlite(conn) => {
                let row: rusqlite::Result<(i64, u64, String)> = conn.query_row(
                    "SELECT mtime_ns, size, tags_json FROM tags WHERE rel_path = ?1",
                    params![rel_path],
                    |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
                );
                let (stored_mtime, stored_size, json) = row.ok()?;
                if stored_mtime != mtime_ns || stored_size != size {
                    return None;
                }
                decode(&json, rel_path, abs_path)
            }
            Backend::Memory(map) => {
                let entry = map.get(rel_path)?;
                if entry.mtime_ns != mtime_ns || entry.size != size {
                    return None;
                }
                decode(&entry.tags_json, rel_path, abs_path)
            }
        }
    }

    /// Returns the stored tags for `rel_path` regardless of their recorded
    /// `(mtime_ns, size)`, or `None` if nothing is stored. Used by
    /// `RefreshMode::Manual`, which trusts the cache unconditionally rather
    /// than treating a stat mismatch as a miss.
    #[must_use]
    pub fn get_unchecked(&self, rel_path: &str, abs_path: &Path) -> Option<Vec<Tag>> {
        match &self.backend {
            Backend::Sqlite(conn) => {
                let json: rusqlite::Result<String> = conn.query_row(
                    "SELECT tags_json FROM tags WHERE rel_path = ?1",
                    params![rel_path],
                    |r| r.get(0),
                );
                decode(&json.ok()?, rel_path, abs_path)
            }
            Backend::Memory(map) => decode(&map.get(rel_path)?.tags_json, rel_path, abs_path),
        }
    }

    /// Stores `tags` for `rel_path` under the given `(mtime_ns, size)` key,
    /// replacing any previous entry.
    pub fn put(&mut self, rel_path: &str, mtime_ns: i64, size: u64, tags: &[Tag]) {
        let stored: Vec<StoredTag> = tags.iter().map(StoredTag::from_tag).collect();
        let Ok(json) = serde_json::to_string(&stored) else { return };

        match &mut self.backend {
            Backend::Sqlite(conn) => {
                let _ = conn.execute(
                    "INSERT INTO tags (rel_path, mtime_ns, size, tags_json) VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(rel_path) DO UPDATE SET mtime_ns = excluded.mtime_ns, size = excluded.size, tags_json = excluded.tags_json",
                    params![rel_path, mtime_ns, size, json],
                );
            }
            Backend::Memory(map) => {
                map.insert(rel_path.to_string(), MemEntry { mtime_ns, size, tags_json: json });
            }
        }
    }

    /// Drops every entry, used for `RefreshMode::Always`.
    pub fn clear(&mut self) {
        match &mut self.backend {
            Backend::Sqlite(conn) => {
                let _ = conn.execute("DELETE FROM tags", []);
            }
            Backend::Memory(map) => map.clear(),
        }
    }

    #[must_use]
    pub fn is_in_memory_fallback(&self) -> bool {
        matches!(self.backend, Backend::Memory(_))
    }
}

fn decode(json: &str, rel_path: &str, abs_path: &Path) -> Option<Vec<Tag>> {
    let stored: Vec<StoredTag> = serde_json::from_str(json).ok()?;
    Some(stored.iter().map(|s| s.to_tag(rel_path, abs_path)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tags() -> Vec<Tag> {
        vec![Tag::new("a.rs", PathBuf::from("a.rs"), "foo", 1, TagKind::Def)]
    }

    #[test]
    fn memory_cache_roundtrips() {
        let mut cache = TagCache::in_memory();
        cache.put("a.rs", 100, 10, &sample_tags());
        let hit = cache.get("a.rs", Path::new("a.rs"), 100, 10).unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].name, "foo");
    }

    #[test]
    fn stale_metadata_is_a_miss() {
        let mut cache = TagCache::in_memory();
        cache.put("a.rs", 100, 10, &sample_tags());
        assert!(cache.get("a.rs", Path::new("a.rs"), 101, 10).is_none());
        assert!(cache.get("a.rs", Path::new("a.rs"), 100, 11).is_none());
    }

    #[test]
    fn sqlite_cache_roundtrips_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TagCache::open(&dir.path().join(".repomap.tags.cache.v1"));
        assert!(!cache.is_in_memory_fallback());
        cache.put("a.rs", 100, 10, &sample_tags());
        let hit = cache.get("a.rs", Path::new("a.rs"), 100, 10).unwrap();
        assert_eq!(hit[0].name, "foo");
        assert!(cache.get("a.rs", Path::new("a.rs"), 999, 10).is_none());
    }

    #[test]
    fn get_unchecked_ignores_stale_metadata() {
        let mut cache = TagCache::in_memory();
        cache.put("a.rs", 100, 10, &sample_tags());
        let hit = cache.get_unchecked("a.rs", Path::new("a.rs")).unwrap();
        assert_eq!(hit[0].name, "foo");
        assert!(cache.get("a.rs", Path::new("a.rs"), 999, 999).is_none());
    }

    #[test]
    fn clear_empties_the_store() {
        let mut cache = TagCache::in_memory();
        cache.put("a.rs", 100, 10, &sample_tags());
        cache.clear();
        assert!(cache.get("a.rs", Path::new("a.rs"), 100, 10).is_none());
    }
}
