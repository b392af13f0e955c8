use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Path segment that carries the API version; it is dropped from cache keys.
const API_VERSION_SEGMENT: &str = "/v0/";

/// Derive the cache file name for a resource locator.
///
/// The scheme and host are dropped, the first `/v0/` segment is stripped and
/// the remaining path separators become `-`:
/// `https://hacker-news.firebaseio.com/v0/item/8863.json` -> `item-8863.json`.
pub fn cache_key(locator: &str) -> String {
    let path = match locator.find("://") {
        Some(idx) => {
            let rest = &locator[idx + 3..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        None => locator,
    };
    let path = path.replacen(API_VERSION_SEGMENT, "", 1);
    path.trim_start_matches('/').replace('/', "-")
}

/// Raw response bodies persisted on disk, one file per resource.
///
/// Entries never expire. Several processes may share the directory, so
/// writes land in a per-process temporary file that is renamed into place.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Use `dir` as the cache directory, creating it when missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create cache directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, locator: &str) -> PathBuf {
        self.dir.join(cache_key(locator))
    }

    /// Stored bytes for `locator`, if any.
    pub fn get(&self, locator: &str) -> Option<Vec<u8>> {
        let path = self.path_for(locator);
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), hit = true, "cache.get");
                Some(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), hit = false, "cache.get");
                None
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), hit = false, error = %e, "cache.get");
                None
            }
        }
    }

    /// Best-effort store; failures are logged and otherwise ignored.
    pub fn set(&self, locator: &str, bytes: &[u8]) {
        let path = self.path_for(locator);
        if let Err(e) = self.write_atomically(&path, bytes) {
            tracing::debug!(path = %path.display(), error = %e, "cache.set failed");
        } else {
            tracing::debug!(path = %path.display(), len = bytes.len(), "cache.set");
        }
    }

    /// Remove the entry for `locator`. Missing entries are not an error.
    pub fn invalidate(&self, locator: &str) {
        let path = self.path_for(locator);
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "cache.invalidate"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cache.invalidate failed")
            }
        }
    }

    fn write_atomically(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(format!(".{}.tmp", std::process::id()));
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path).inspect_err(|_| {
            let _ = fs::remove_file(&tmp);
        })
    }
}
