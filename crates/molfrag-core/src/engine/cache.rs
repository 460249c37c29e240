//! Flat-file cache of build aggregates.
//!
//! Each aggregate is one JSON file in the cache directory, keyed by name
//! (`<repository>-s<shell>-<molecule-id>.off` when a numeric molecule id
//! is known). The cache is write-once per key and best-effort: the
//! existence check is advisory, and two racing builds of the same key
//! simply overwrite each other with identical content. In-process
//! duplicate work is avoided separately by the build registry.

use super::error::LoadError;
use crate::core::models::fragment::Aggregate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

const CACHE_EXTENSION: &str = "off";

/// Name-keyed store of aggregate records in a single directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The deterministic cache key for a build with a known numeric
    /// molecule id.
    pub fn key_for(repository: &str, shell_size: u32, molecule_id: u64) -> String {
        format!("{repository}-s{shell_size}-{molecule_id}.{CACHE_EXTENSION}")
    }

    /// A fresh key for builds without a numeric molecule id: a
    /// timestamp-derived identifier, decremented until it does not
    /// collide with an existing file.
    pub fn unique_key(&self, repository: &str, shell_size: u32) -> String {
        let mut stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros())
            .unwrap_or(0);
        loop {
            let key = format!("{repository}-s{shell_size}-t{stamp}.{CACHE_EXTENSION}");
            if !self.path_of(&key).exists() {
                return key;
            }
            stamp = stamp.saturating_sub(1);
        }
    }

    pub fn path_of(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Loads the record under `key`, distinguishing "absent" from
    /// "present but unparsable".
    pub fn load(&self, key: &str) -> Result<Aggregate, LoadError> {
        let path = self.path_of(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound { path });
            }
            Err(source) => return Err(LoadError::Io { path, source }),
        };
        serde_json::from_str(&text).map_err(|source| LoadError::Malformed { path, source })
    }

    /// Persists the record under `key`, creating the cache directory on
    /// first use. Last writer wins.
    pub fn store(&self, key: &str, aggregate: &Aggregate) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_of(key);
        let text = serde_json::to_string(aggregate).map_err(io::Error::other)?;
        fs::write(&path, text)?;
        debug!(key = %key, path = %path.display(), "Stored aggregate record");
        Ok(())
    }
}
