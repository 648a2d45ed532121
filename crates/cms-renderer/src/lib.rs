//! XHTML renderer for CMS content trees.
//!
//! Turns a [`ContentTree`](cms_content::ContentTree) into XHTML 1.0 Strict
//! markup. Rendering dispatches on the section and element variants of the
//! tree:
//!
//! - [`render_section`] / [`render_sections`]: one fragment per section
//! - [`render_element`] / [`render_elements`]: `<div>`-wrapped element
//!   fragments inside mixed sections
//! - [`render_navigation`]: top and sub navigation lists
//! - [`PageRenderer`]: metadata, stylesheet, section lookup and the full
//!   document
//!
//! CMS-authored text is escaped with [`escape`]. Fields that the CMS delivers
//! as ready-made markup (`html`, `css`, embed payloads) are emitted verbatim.
//!
//! # Example
//!
//! ```
//! use cms_content::ContentTree;
//! use cms_renderer::PageRenderer;
//! use serde_json::json;
//!
//! let tree = ContentTree::from_value(json!({
//!     "title": "Home",
//!     "sections": [{"section_identifier": "a", "type": "shorttext", "text": "Hello"}]
//! }))
//! .unwrap();
//!
//! let renderer = PageRenderer::new(&tree);
//! assert_eq!(renderer.section("a").unwrap().html, "<h2>Hello</h2>");
//! assert!(renderer.render_page().unwrap().contains("<h1>Home</h1>"));
//! ```

mod element;
mod escape;
mod navigation;
mod page;
mod section;

pub use element::{render_element, render_elements};
pub use escape::escape;
pub use navigation::{NavigationLevel, render_navigation};
pub use page::{PageRenderer, SectionView};
pub use section::{render_section, render_sections};

/// Error raised while rendering a content tree.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A section carries a type with no renderer.
    #[error("Unsupported section type '{section_type}' in section '{section}'")]
    UnsupportedSectionType {
        section_type: String,
        section: String,
    },
    /// An element inside a mixed section carries a type with no renderer.
    #[error("Unsupported element type '{element_type}'")]
    UnsupportedElementType { element_type: String },
    /// The page has no section list.
    #[error("No sections found")]
    MissingSections,
    /// No section has the requested identifier.
    #[error("Invalid section identifier '{0}'")]
    UnknownSection(String),
}
