//! Cache abstraction layer for cmsfront.
//!
//! Page payloads fetched from the CMS are cached so that repeated requests do
//! not hit the XML-RPC endpoint. Two traits form the core API:
//!
//! - [`Cache`]: Factory for named cache buckets
//! - [`CacheBucket`]: Key-value store with fixed-lifetime entries
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: No-op implementations (always miss)
//! - [`FileCache`]: File-based implementation with expiry and version validation
//!
//! # Example
//!
//! ```
//! use cms_cache::{Cache, NullCache};
//!
//! let cache = NullCache;
//! let bucket = cache.bucket("pages");
//! bucket.set("front", b"<html>hello</html>");
//! assert_eq!(bucket.get("front"), None); // NullCache always misses
//! ```

mod ext;
mod file;

pub use ext::CacheBucketExt;
pub use file::FileCache;

/// A named partition within a [`Cache`].
///
/// Entries are only returned while they are younger than the lifetime the
/// backing cache was created with.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `None` on cache miss or when the entry has expired.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store a value in the cache, overwriting any existing entry.
    ///
    /// Failures are logged and otherwise ignored.
    fn set(&self, key: &str, value: &[u8]);
}

/// Factory for named cache [`CacheBucket`]s.
///
/// Buckets are logically isolated from each other.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket (e.g. "pages", "page-lists").
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _value: &[u8]) {}
}

/// No-op [`Cache`] that always returns [`NullCacheBucket`]s.
///
/// Used when caching is disabled.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cache_always_misses() {
        let cache = NullCache;
        let bucket = cache.bucket("pages");

        assert_eq!(bucket.get("key"), None);

        bucket.set("key", b"hello");
        assert_eq!(bucket.get("key"), None);
    }
}
