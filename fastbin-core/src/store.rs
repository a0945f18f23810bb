// fastbin-core/src/store.rs
//! Persistent record of installed binaries.
//!
//! One SQLite table keyed by binary name, each row holding the JSON form of an
//! [`InstallRecord`]. A sibling `.lock` file is held exclusively for as long
//! as the store is open.
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fastbin_common::error::{fs_context, FastbinError, Result};
use fastbin_common::InstallRecord;
use fs4::FileExt;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

const LOCK_POLL: Duration = Duration::from_millis(50);

pub struct MetadataStore {
    conn: Connection,
    path: PathBuf,
    // Released when the store is dropped.
    _lock: File,
}

fn acquire_lock(lock_path: &Path, db_path: &Path, timeout: Duration) -> Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(lock_path)
        .map_err(fs_context("open lock file", lock_path))?;

    let started = Instant::now();
    loop {
        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!("Acquired store lock {}", lock_path.display());
                return Ok(file);
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                if started.elapsed() >= timeout {
                    return Err(FastbinError::DatabaseLocked {
                        path: db_path.to_path_buf(),
                        timeout_ms: timeout.as_millis(),
                    });
                }
                thread::sleep(LOCK_POLL.min(timeout.saturating_sub(started.elapsed())));
            }
            Err(e) => return Err(FastbinError::filesystem("lock", lock_path, e)),
        }
    }
}

impl MetadataStore {
    /// Opens (creating if needed) the store at `path`, waiting at most
    /// `timeout` for another holder to let go of it.
    pub fn open(path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(fs_context("create directory", parent))?;
        }
        let lock = acquire_lock(&path.with_extension("lock"), path, timeout)?;

        let conn = Connection::open(path)?;
        conn.busy_timeout(timeout)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS binaries (
                name TEXT PRIMARY KEY NOT NULL,
                record TEXT NOT NULL
            );",
        )?;
        debug!("Opened metadata store {}", path.display());

        Ok(Self {
            conn,
            path: path.to_path_buf(),
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts or replaces the record for `record.name` in one transaction.
    pub fn upsert(&mut self, record: &InstallRecord) -> Result<()> {
        if record.name.is_empty() {
            return Err(FastbinError::InvalidRecord {
                name: record.name.clone(),
                reason: "name is empty".to_string(),
            });
        }
        if record.hash.is_empty() {
            return Err(FastbinError::InvalidRecord {
                name: record.name.clone(),
                reason: "hash is empty".to_string(),
            });
        }
        let json = serde_json::to_string(record)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO binaries (name, record) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET record = excluded.record",
            params![record.name, json],
        )?;
        tx.commit()?;
        debug!("Recorded {} in {}", record.name, self.path.display());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Option<InstallRecord>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT record FROM binaries WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| serde_json::from_str(&j).map_err(FastbinError::from))
            .transpose()
    }

    /// All records, ordered by name.
    pub fn list(&self) -> Result<Vec<InstallRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT record FROM binaries ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut records = Vec::new();
        for row in rows {
            records.push(serde_json::from_str(&row?)?);
        }
        Ok(records)
    }

    /// Deletes the record for `name`; returns whether one existed.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM binaries WHERE name = ?1", params![name])?;
        tx.commit()?;
        debug!("Removed {} record(s) for {}", deleted, name);
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn record(name: &str, hash: &str) -> InstallRecord {
        InstallRecord {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            source_url: format!("https://example.com/{name}"),
            location: format!("/home/u/.local/bin/{name}"),
            hash: hash.to_string(),
            last_updated: Utc::now(),
            scripts: Vec::new(),
            man_page: String::new(),
            size: 3,
            architecture: "x86_64".to_string(),
            os: "linux".to_string(),
        }
    }

    fn open(dir: &Path) -> MetadataStore {
        MetadataStore::open(&dir.join("fastbin.db"), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn upsert_replaces_instead_of_duplicating() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        store.upsert(&record("tool", "aaa")).unwrap();
        store.upsert(&record("tool", "bbb")).unwrap();

        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].hash, "bbb");
        assert_eq!(store.get("tool").unwrap().unwrap().hash, "bbb");
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let written = record("tool", "abc");
        {
            let mut store = open(dir.path());
            store.upsert(&written).unwrap();
        }
        let store = open(dir.path());
        assert_eq!(store.get("tool").unwrap(), Some(written));
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[test]
    fn list_is_ordered_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        for name in ["zeta", "alpha", "mid"] {
            store.upsert(&record(name, "h")).unwrap();
        }
        let names: Vec<String> = store.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn incomplete_records_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        let err = store.upsert(&record("tool", "")).unwrap_err();
        assert!(matches!(err, FastbinError::InvalidRecord { .. }));
        let err = store.upsert(&record("", "abc")).unwrap_err();
        assert!(matches!(err, FastbinError::InvalidRecord { .. }));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn remove_reports_whether_anything_was_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        store.upsert(&record("tool", "abc")).unwrap();
        assert!(store.remove("tool").unwrap());
        assert!(!store.remove("tool").unwrap());
        assert!(store.get("tool").unwrap().is_none());
    }

    #[test]
    fn second_opener_times_out_while_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fastbin.db");
        let holder = MetadataStore::open(&path, Duration::from_secs(1)).unwrap();

        let started = Instant::now();
        let err = match MetadataStore::open(&path, Duration::from_millis(150)) {
            Err(e) => e,
            Ok(_) => panic!("lock should still be held"),
        };
        assert!(matches!(err, FastbinError::DatabaseLocked { .. }), "{err:?}");
        assert!(started.elapsed() >= Duration::from_millis(150));
        assert!(started.elapsed() < Duration::from_secs(5));

        drop(holder);
        MetadataStore::open(&path, Duration::from_millis(150)).unwrap();
    }
}
