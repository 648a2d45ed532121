//! Page sources: where content trees come from.

use cms_cache::{Cache, CacheBucket, CacheBucketExt};
use cms_content::{ContentTree, PageSummary};
use tracing::debug;

use crate::error::ClientError;
use crate::search::PageSearch;

/// A source of raw CMS page payloads.
///
/// Implementors return decoded but unvalidated payloads; the provided
/// `get_*` methods turn them into typed values.
pub trait PageSource: Send + Sync {
    /// Raw `getPage` payload for a page identifier (`""` is the front page).
    fn page(&self, identifier: &str) -> Result<serde_json::Value, ClientError>;

    /// Raw `getPageList` payload for a search.
    fn page_list(&self, search: &PageSearch) -> Result<serde_json::Value, ClientError>;

    /// Fetch and validate a page.
    ///
    /// # Errors
    ///
    /// Returns the source's fetch error, or [`ClientError::Content`] if the
    /// payload is not a valid content tree.
    fn get_page(&self, identifier: &str) -> Result<ContentTree, ClientError> {
        Ok(ContentTree::from_value(self.page(identifier)?)?)
    }

    /// Fetch and parse a page list.
    ///
    /// # Errors
    ///
    /// Returns the source's fetch error, or [`ClientError::Content`] if the
    /// payload is not a list of page summaries.
    fn get_page_list(&self, search: &PageSearch) -> Result<Vec<PageSummary>, ClientError> {
        Ok(PageSummary::list_from_value(self.page_list(search)?)?)
    }
}

/// [`PageSource`] that caches another source's payloads.
///
/// Payloads are cached as JSON, keyed by the hex-encoded identifier or search
/// so that any identifier maps to a plain file name inside the bucket.
/// Failed fetches are not cached.
pub struct CachedSource<S> {
    inner: S,
    pages: Box<dyn CacheBucket>,
    lists: Box<dyn CacheBucket>,
}

impl<S: PageSource> CachedSource<S> {
    pub fn new(inner: S, cache: &dyn Cache) -> Self {
        Self {
            inner,
            pages: cache.bucket("pages"),
            lists: cache.bucket("page-lists"),
        }
    }

    /// The wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: PageSource> PageSource for CachedSource<S> {
    fn page(&self, identifier: &str) -> Result<serde_json::Value, ClientError> {
        let key = cache_key(identifier);
        if let Some(payload) = self.pages.get_json(&key) {
            debug!(identifier, "Page cache hit");
            return Ok(payload);
        }

        debug!(identifier, "Page cache miss");
        let payload = self.inner.page(identifier)?;
        self.pages.set_json(&key, &payload);
        Ok(payload)
    }

    fn page_list(&self, search: &PageSearch) -> Result<serde_json::Value, ClientError> {
        let canonical = search.canonical();
        let key = cache_key(&canonical);
        if let Some(payload) = self.lists.get_json(&key) {
            debug!(search = %canonical, "Page list cache hit");
            return Ok(payload);
        }

        debug!(search = %canonical, "Page list cache miss");
        let payload = self.inner.page_list(search)?;
        self.lists.set_json(&key, &payload);
        Ok(payload)
    }
}

/// File-safe cache key; the suffix keeps the empty identifier non-empty.
fn cache_key(raw: &str) -> String {
    format!("{}.json", hex::encode(raw))
}
