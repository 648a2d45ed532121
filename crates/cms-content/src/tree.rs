//! Page payload returned by `getPage`.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::ContentError;
use crate::loose;
use crate::section::Section;

/// The full page payload for one request.
///
/// Field names follow the CMS wire format (`navigation_toplevel`,
/// `http_header_status`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentTree {
    /// Identifier of the page itself, compared against navigation entries.
    #[serde(default, deserialize_with = "loose::string")]
    pub id: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub language: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub title: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub content_type: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub description: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub keywords: String,
    /// Stylesheet placing the page's elements (trusted).
    #[serde(default, deserialize_with = "loose::string")]
    pub css: String,
    /// Status line for the HTTP response, e.g. `HTTP/1.0 404 Not Found`.
    #[serde(default, deserialize_with = "loose::string")]
    pub http_header_status: String,
    #[serde(
        default,
        rename = "navigation_toplevel",
        deserialize_with = "loose::list"
    )]
    pub navigation_top: Vec<NavEntry>,
    #[serde(
        default,
        rename = "navigation_sublevel",
        deserialize_with = "loose::list"
    )]
    pub navigation_sub: Vec<NavEntry>,
    /// `None` when the CMS sent no section list at all.
    #[serde(default, deserialize_with = "loose::optional_list")]
    pub sections: Option<Vec<Section>>,
}

impl ContentTree {
    /// Build and validate a tree from a decoded `getPage` response.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Malformed`] if the value is not a record or a
    /// section/element is structurally invalid, and
    /// [`ContentError::DuplicateSection`] if two sections share an identifier.
    pub fn from_value(value: Value) -> Result<Self, ContentError> {
        if !value.is_object() {
            return Err(ContentError::Malformed(
                "page payload is not a structured record".to_owned(),
            ));
        }
        let tree: Self =
            serde_json::from_value(value).map_err(|e| ContentError::Malformed(e.to_string()))?;
        tree.validate()?;
        Ok(tree)
    }

    /// Check tree-level invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::DuplicateSection`] if section identifiers repeat.
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for section in self.sections.iter().flatten() {
            if !seen.insert(section.identifier.as_str()) {
                return Err(ContentError::DuplicateSection(section.identifier.clone()));
            }
        }
        Ok(())
    }

    /// Numeric HTTP status from [`Self::http_header_status`].
    ///
    /// Accepts a full status line (`HTTP/1.1 404 Not Found`) or a bare code.
    /// Returns `None` when the field is empty or holds no valid status code.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.http_header_status
            .split_whitespace()
            .find_map(|token| token.parse::<u16>().ok())
            .filter(|code| (100..=599).contains(code))
    }
}

/// One link in a navigation list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NavEntry {
    #[serde(default, deserialize_with = "loose::string")]
    pub id: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub url: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub navigation_name: String,
}

/// Page summary as returned by `getPageList` and embedded in page lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageSummary {
    #[serde(default, deserialize_with = "loose::string")]
    pub id: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub identifier: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub url: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub title: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub description: String,
}

impl PageSummary {
    /// Parse a `getPageList` response.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Malformed`] if an entry is not a record.
    pub fn list_from_value(value: Value) -> Result<Vec<Self>, ContentError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    serde_json::from_value(item).map_err(|e| ContentError::Malformed(e.to_string()))
                })
                .collect(),
            // An empty PHP array may arrive as an empty struct or `false`.
            Value::Object(ref entries) if entries.is_empty() => Ok(Vec::new()),
            Value::Bool(false) | Value::Null => Ok(Vec::new()),
            _ => Err(ContentError::Malformed(
                "page list is not a list".to_owned(),
            )),
        }
    }
}
