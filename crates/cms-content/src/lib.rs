//! Content tree model for pages fetched from the Intraface CMS.
//!
//! The CMS returns each page as a loosely-typed record: page metadata,
//! navigation lists and an ordered sequence of sections, some of which hold
//! an ordered sequence of elements. This crate turns that record into
//! explicit types:
//!
//! - [`ContentTree`]: page metadata, navigation and sections
//! - [`Section`] / [`SectionBody`]: one variant per section type
//! - [`Element`] / [`ElementBody`]: one variant per element type
//!
//! Unknown `type` discriminators are preserved as `Unsupported` variants so
//! the renderer can reject them by name. Missing or oddly-typed fields fall
//! back to empty values instead of failing.
//!
//! # Example
//!
//! ```
//! use cms_content::{ContentTree, SectionBody};
//! use serde_json::json;
//!
//! let tree = ContentTree::from_value(json!({
//!     "title": "Home",
//!     "sections": [{"section_identifier": "a", "type": "shorttext", "text": "Hi"}]
//! }))
//! .unwrap();
//!
//! let sections = tree.sections.unwrap();
//! assert!(matches!(sections[0].body, SectionBody::ShortText(_)));
//! ```

mod element;
mod loose;
mod section;
mod tree;

pub use element::{
    Delicious, DeliciousItem, Element, ElementBody, FileEntry, FileList, FileType, Flickr,
    FlickrSet, FlickrSetInfo, Gallery, GalleryPicture, HtmlText, ImageFile, MapEmbed, PageList,
    PictureElement, Video,
};
pub use section::{LongText, Mixed, PictureSection, Section, SectionBody, ShortText};
pub use tree::{ContentTree, NavEntry, PageSummary};

/// Error returned when a CMS payload cannot be turned into a [`ContentTree`].
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The payload is missing or structurally wrong.
    #[error("Malformed page content: {0}")]
    Malformed(String),
    /// Two sections share the same identifier.
    #[error("Duplicate section identifier: {0}")]
    DuplicateSection(String),
}
