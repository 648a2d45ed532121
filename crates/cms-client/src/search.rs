//! Search criteria for `getPageList`.

use std::collections::BTreeMap;

use crate::xmlrpc::Value;

/// Filter passed to `getPageList`, sent as a struct of strings.
///
/// An empty search lists every published page of the site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSearch(BTreeMap<String, String>);

impl PageSearch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion, replacing an earlier one with the same key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Parse a `key=value` criterion.
    ///
    /// Returns `None` when there is no `=` or the key is empty.
    #[must_use]
    pub fn parse_pair(pair: &str) -> Option<(String, String)> {
        let (key, value) = pair.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key.to_owned(), value.trim().to_owned()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stable textual form, used as cache key.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub(crate) fn to_value(&self) -> Value {
        Value::structure(self.0.iter().map(|(k, v)| (k.as_str(), Value::from(v.as_str()))))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PageSearch {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
