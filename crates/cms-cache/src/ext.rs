//! Extension trait for [`CacheBucket`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheBucket;

/// Typed convenience methods for [`CacheBucket`].
///
/// Implemented for every bucket through a blanket impl, so [`CacheBucket`]
/// stays object-safe and implementors only handle raw bytes.
///
/// # Example
///
/// ```
/// use cms_cache::{Cache, CacheBucketExt, NullCache};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Page { title: String }
///
/// let cache = NullCache;
/// let bucket = cache.bucket("pages");
///
/// bucket.set_json("front", &Page { title: "Hello".into() });
/// let page: Option<Page> = bucket.get_json("front");
/// assert!(page.is_none());
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve a JSON-deserialized value.
    ///
    /// Returns `None` on cache miss, expiry, or deserialization failure.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.get(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Store a value as JSON.
    ///
    /// Does nothing if serialization fails.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(bytes) = serde_json::to_vec(value) {
            self.set(key, &bytes);
        }
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cache, FileCache};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::time::Duration;
    use tempfile::TempDir;

    fn cache(tmp: &TempDir) -> FileCache {
        FileCache::new(tmp.path().join("cache"), "v1", Duration::from_secs(60))
    }

    #[test]
    fn test_json_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let bucket = cache(&tmp).bucket("pages");

        let page = json!({"title": "Forside", "sections": []});
        bucket.set_json("front", &page);
        assert_eq!(bucket.get_json::<Value>("front"), Some(page));
    }

    #[test]
    fn test_json_undecodable_entry_misses() {
        let tmp = TempDir::new().unwrap();
        let bucket = cache(&tmp).bucket("pages");

        bucket.set("front", b"not json");
        assert_eq!(bucket.get_json::<Value>("front"), None);
    }
}
