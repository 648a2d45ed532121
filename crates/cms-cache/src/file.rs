//! File-based cache implementation.
//!
//! [`FileCache`] stores cache entries as files on disk, organized into buckets
//! (subdirectories). Each entry file holds the raw value; its modification
//! time decides whether it is still fresh. An entry whose age reaches the
//! cache lifetime is treated as a miss and removed.
//!
//! On construction, [`FileCache`] validates a `VERSION` file in the cache root.
//! If the version mismatches or is missing, the entire cache directory is wiped
//! and recreated.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::{Cache, CacheBucket};

/// File-based [`Cache`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION            # contains the cache version string
/// +-- pages/             # bucket "pages"
/// |   +-- 66726f6e74     # cache entry
/// +-- page-lists/        # bucket "page-lists"
///     +-- ...
/// ```
pub struct FileCache {
    root: PathBuf,
    lifetime: Duration,
}

impl FileCache {
    /// Create a new file-based cache at `root`, validating the cache version.
    ///
    /// Entries older than `lifetime` are misses. Errors during version
    /// validation are logged but never fatal.
    #[must_use]
    pub fn new(root: PathBuf, version: &str, lifetime: Duration) -> Self {
        validate_version(&root, version);
        Self { root, lifetime }
    }

    /// Cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
            lifetime: self.lifetime,
        })
    }
}

/// A single bucket backed by a directory on disk.
struct FileCacheBucket {
    dir: PathBuf,
    lifetime: Duration,
}

impl FileCacheBucket {
    fn is_fresh(&self, path: &Path) -> Option<bool> {
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
        // an mtime in the future counts as age zero
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        Some(age < self.lifetime)
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.dir.join(key);

        if !self.is_fresh(&path)? {
            tracing::debug!(key, "Cache entry expired");
            if let Err(e) = fs::remove_file(&path)
                && e.kind() != ErrorKind::NotFound
            {
                tracing::warn!(key, error = %e, "Failed to remove expired cache entry");
            }
            return None;
        }

        fs::read(&path).ok()
    }

    fn set(&self, key: &str, value: &[u8]) {
        let path = self.dir.join(key);

        let Some(parent) = path.parent() else {
            return;
        };
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::warn!(error = %e, "Failed to create cache bucket directory");
            return;
        }
        if let Err(e) = fs::write(&path, value) {
            tracing::warn!(key, error = %e, "Failed to write cache entry");
        }
    }
}

/// Make sure `root` holds a cache written by `version`.
///
/// A root with a different or missing `VERSION` stamp is wiped and
/// re-stamped.
fn validate_version(root: &Path, version: &str) {
    let stamp = root.join("VERSION");
    let stored = fs::read_to_string(&stamp).ok();
    if stored.as_deref() == Some(version) {
        return;
    }

    tracing::info!(
        root = %root.display(),
        stored = stored.as_deref().unwrap_or("none"),
        current = version,
        "Resetting page cache"
    );

    let reset = match fs::remove_dir_all(root) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => fs::create_dir_all(root).and_then(|()| fs::write(&stamp, version)),
    };
    if let Err(e) = reset {
        tracing::warn!(root = %root.display(), error = %e, "Failed to reset page cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const HOUR: Duration = Duration::from_secs(3600);

    fn cache_in(tmp: &TempDir, version: &str, lifetime: Duration) -> FileCache {
        FileCache::new(tmp.path().join("cache"), version, lifetime)
    }

    #[test]
    fn test_entries_round_trip_raw_bytes() {
        let tmp = TempDir::new().unwrap();
        let pages = cache_in(&tmp, "v1", HOUR).bucket("pages");

        assert_eq!(pages.get("front"), None);

        pages.set("front", b"first");
        pages.set("front", &[0x00, 0xe6, 0xff]);
        assert_eq!(pages.get("front"), Some(vec![0x00, 0xe6, 0xff]));
    }

    #[test]
    fn test_buckets_do_not_share_keys() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp, "v1", HOUR);

        cache.bucket("pages").set("news", b"page");
        assert_eq!(cache.bucket("page-lists").get("news"), None);
        assert_eq!(cache.bucket("pages").get("news"), Some(b"page".to_vec()));
    }

    #[test]
    fn test_zero_lifetime_always_expires() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp, "v1", Duration::ZERO);
        let pages = cache.bucket("pages");

        pages.set("front", b"stale");
        assert_eq!(pages.get("front"), None);
        assert!(!cache.root().join("pages/front").exists());
    }

    #[test]
    fn test_entry_older_than_lifetime_expires() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp, "v1", HOUR);
        let pages = cache.bucket("pages");

        pages.set("fresh", b"new");
        pages.set("old", b"old");
        fs::File::options()
            .write(true)
            .open(cache.root().join("pages/old"))
            .unwrap()
            .set_modified(SystemTime::now() - 2 * HOUR)
            .unwrap();

        assert_eq!(pages.get("old"), None);
        assert_eq!(pages.get("fresh"), Some(b"new".to_vec()));
    }

    #[test]
    fn test_same_version_reuses_entries() {
        let tmp = TempDir::new().unwrap();
        cache_in(&tmp, "1.0.0", HOUR).bucket("pages").set("front", b"kept");

        let reopened = cache_in(&tmp, "1.0.0", HOUR);
        assert_eq!(reopened.bucket("pages").get("front"), Some(b"kept".to_vec()));
    }

    #[test]
    fn test_new_version_resets_cache() {
        let tmp = TempDir::new().unwrap();
        cache_in(&tmp, "1.0.0", HOUR).bucket("pages").set("front", b"old");

        let upgraded = cache_in(&tmp, "1.1.0", HOUR);
        assert_eq!(upgraded.bucket("pages").get("front"), None);
        assert_eq!(
            fs::read_to_string(upgraded.root().join("VERSION")).unwrap(),
            "1.1.0"
        );
    }

    #[test]
    fn test_unstamped_directory_is_reset() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("deeply/nested/cache");
        fs::create_dir_all(root.join("pages")).unwrap();
        fs::write(root.join("pages/orphan"), b"stray").unwrap();

        let cache = FileCache::new(root.clone(), "1.0.0", HOUR);
        assert_eq!(cache.root(), root.as_path());
        assert_eq!(cache.bucket("pages").get("orphan"), None);
        assert_eq!(fs::read_to_string(root.join("VERSION")).unwrap(), "1.0.0");
    }
}
