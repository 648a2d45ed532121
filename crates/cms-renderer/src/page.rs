//! Page-level rendering: metadata, stylesheet, navigation and the full
//! XHTML document.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use cms_content::{ContentTree, Section};

use crate::RenderError;
use crate::escape::escape;
use crate::navigation::{NavigationLevel, render_navigation};
use crate::section::{render_section, render_sections};

const DOCTYPE: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#;

/// A section together with its rendered markup.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView<'a> {
    pub section: &'a Section,
    pub html: String,
}

impl SectionView<'_> {
    /// Canonical section type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.section.body.type_name()
    }
}

/// Renderer for one page, borrowing its content tree.
///
/// The identifier-to-section mapping is built on first use and reused for
/// later lookups on the same renderer.
pub struct PageRenderer<'a> {
    tree: &'a ContentTree,
    sections: OnceCell<BTreeMap<&'a str, SectionView<'a>>>,
}

impl<'a> PageRenderer<'a> {
    #[must_use]
    pub fn new(tree: &'a ContentTree) -> Self {
        Self {
            tree,
            sections: OnceCell::new(),
        }
    }

    /// The tree being rendered.
    #[must_use]
    pub fn tree(&self) -> &'a ContentTree {
        self.tree
    }

    /// HTTP status for the response, 200 unless the page says otherwise.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.tree.status_code().unwrap_or(200)
    }

    /// `<title>` and `<meta>` tags for the document head.
    #[must_use]
    pub fn render_meta(&self) -> String {
        let tree = self.tree;
        format!(
            concat!(
                "<title>{}</title>",
                r#"<meta http-equiv="content-type" content="{}" />"#,
                r#"<meta name="description" content="{}" />"#,
                r#"<meta name="keywords" content="{}" />"#,
            ),
            escape(&tree.title),
            escape(&tree.content_type),
            escape(&tree.description),
            escape(&tree.keywords)
        )
    }

    /// `<style>` tag carrying the page's element placement rules.
    #[must_use]
    pub fn render_css(&self) -> String {
        format!(r#"<style type="text/css">{}</style>"#, self.tree.css)
    }

    /// Navigation list for `level`, marking the page itself as current.
    #[must_use]
    pub fn render_navigation(&self, level: NavigationLevel) -> String {
        let entries = match level {
            NavigationLevel::Toplevel => &self.tree.navigation_top,
            NavigationLevel::Sublevel => &self.tree.navigation_sub,
        };
        render_navigation(entries, level, &self.tree.id)
    }

    /// All sections in page order.
    ///
    /// # Errors
    ///
    /// Fails on the first section that cannot be rendered.
    pub fn render_sections(&self) -> Result<String, RenderError> {
        render_sections(self.tree.sections.as_deref())
    }

    /// Sections keyed by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingSections`] if the page has no section
    /// list, or the render error of the first section that cannot be
    /// rendered.
    pub fn sections(&self) -> Result<&BTreeMap<&'a str, SectionView<'a>>, RenderError> {
        if let Some(sections) = self.sections.get() {
            return Ok(sections);
        }
        let built = self.build_sections()?;
        Ok(self.sections.get_or_init(|| built))
    }

    /// Look up one section by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownSection`] if no section has that
    /// identifier, or any error from [`Self::sections`].
    pub fn section(&self, identifier: &str) -> Result<&SectionView<'a>, RenderError> {
        self.sections()?
            .get(identifier)
            .ok_or_else(|| RenderError::UnknownSection(identifier.to_owned()))
    }

    fn build_sections(&self) -> Result<BTreeMap<&'a str, SectionView<'a>>, RenderError> {
        let sections = self
            .tree
            .sections
            .as_deref()
            .ok_or(RenderError::MissingSections)?;

        tracing::debug!(count = sections.len(), "Building sections map");
        sections
            .iter()
            .map(|section| -> Result<_, RenderError> {
                let html = render_section(section)?;
                Ok((section.identifier.as_str(), SectionView { section, html }))
            })
            .collect()
    }

    /// Full XHTML 1.0 Strict document for the page.
    ///
    /// # Errors
    ///
    /// Fails if any section or element cannot be rendered.
    pub fn render_page(&self) -> Result<String, RenderError> {
        let tree = self.tree;
        let sections = self.render_sections()?;

        let mut out = String::with_capacity(sections.len() + tree.css.len() + 1024);
        out.push_str(DOCTYPE);
        out.push('\n');
        out.push_str(&format!(
            r#"<html xml:lang="{}" xmlns="http://www.w3.org/1999/xhtml">"#,
            escape(&tree.language)
        ));
        out.push_str("<head>");
        out.push_str(&self.render_meta());
        out.push_str(&self.render_css());
        out.push_str("</head>");
        out.push_str(r#"<body><div id="container">"#);
        out.push_str(&format!(
            r#"<div id="branding"><h1>{}</h1></div>"#,
            escape(&tree.title)
        ));
        out.push_str(&self.render_navigation(NavigationLevel::Toplevel));
        out.push_str(&self.render_navigation(NavigationLevel::Sublevel));
        out.push_str(r#"<div id="content"><div id="content-main">"#);
        out.push_str(&sections);
        out.push_str("</div></div>");
        out.push_str(r#"<div id="siteinfo"></div>"#);
        out.push_str("</div></body></html>\n");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn tree(value: Value) -> ContentTree {
        ContentTree::from_value(value).unwrap()
    }

    fn sample() -> ContentTree {
        tree(json!({
            "id": 2,
            "language": "da",
            "title": "Om os & dem",
            "content_type": "text/html; charset=utf-8",
            "description": "About \"us\"",
            "keywords": "a, b",
            "css": "#e1 { float: left; }",
            "http_header_status": "HTTP/1.0 200 OK",
            "navigation_toplevel": [
                {"id": 1, "url": "/", "navigation_name": "Home"},
                {"id": 2, "url": "/about", "navigation_name": "About"}
            ],
            "navigation_sublevel": [],
            "sections": [
                {"section_identifier": "headline", "type": "shorttext", "text": "Hello"},
                {
                    "section_identifier": "main",
                    "type": "mixed",
                    "elements": [
                        {"type": "htmltext", "html": "<p>One</p>"},
                        {"type": "htmltext", "html": "<p>Two</p>"}
                    ]
                },
                {"section_identifier": "footer", "type": "longtext", "html": "<p>Bye</p>"}
            ]
        }))
    }

    #[test]
    fn test_render_meta() {
        let tree = sample();
        let renderer = PageRenderer::new(&tree);
        assert_eq!(
            renderer.render_meta(),
            concat!(
                "<title>Om os &amp; dem</title>",
                r#"<meta http-equiv="content-type" content="text/html; charset=utf-8" />"#,
                r#"<meta name="description" content="About &quot;us&quot;" />"#,
                r#"<meta name="keywords" content="a, b" />"#,
            )
        );
    }

    #[test]
    fn test_render_css_is_verbatim() {
        let tree = sample();
        assert_eq!(
            PageRenderer::new(&tree).render_css(),
            r#"<style type="text/css">#e1 { float: left; }</style>"#
        );
    }

    #[test]
    fn test_render_navigation_marks_own_page() {
        let tree = sample();
        let renderer = PageRenderer::new(&tree);
        let top = renderer.render_navigation(NavigationLevel::Toplevel);
        assert!(top.contains(r#"<li id="navigation-current"><a href="/about">About</a></li>"#));
        assert_eq!(renderer.render_navigation(NavigationLevel::Sublevel), "");
    }

    #[test]
    fn test_render_page_structure() {
        let tree = sample();
        let html = PageRenderer::new(&tree).render_page().unwrap();

        assert!(html.starts_with(DOCTYPE));
        assert!(html.contains(r#"<html xml:lang="da" xmlns="http://www.w3.org/1999/xhtml">"#));
        assert_eq!(html.matches("<title>").count(), 1);
        assert_eq!(html.matches("<h1>").count(), 1);
        assert!(html.contains(r#"<div id="branding"><h1>Om os &amp; dem</h1></div>"#));
        assert!(html.contains(r#"<ul id="navigation-toplevel">"#));
        assert!(!html.contains("navigation-sublevel"));
        assert!(html.contains(r#"<div id="siteinfo"></div>"#));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_render_page_keeps_section_and_element_order() {
        let tree = sample();
        let html = PageRenderer::new(&tree).render_page().unwrap();
        let positions: Vec<usize> = ["<h2>Hello</h2>", "<p>One</p>", "<p>Two</p>", "<p>Bye</p>"]
            .iter()
            .map(|needle| html.find(needle).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_render_page_without_sections() {
        let tree = tree(json!({"title": "Empty"}));
        let html = PageRenderer::new(&tree).render_page().unwrap();
        assert!(html.contains(r#"<div id="content-main"></div>"#));
        assert!(!html.contains(">0<"));

        let tree = self::tree(json!({"title": "Empty", "sections": []}));
        let html = PageRenderer::new(&tree).render_page().unwrap();
        assert!(html.contains(r#"<div id="content-main"></div>"#));
    }

    #[test]
    fn test_render_page_unsupported_section() {
        let tree = tree(json!({
            "sections": [{"section_identifier": "x", "type": "Bogus"}]
        }));
        let err = PageRenderer::new(&tree).render_page().unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnsupportedSectionType { ref section_type, .. } if section_type == "Bogus"
        ));
    }

    #[test]
    fn test_sections_map() {
        let tree = sample();
        let renderer = PageRenderer::new(&tree);
        let sections = renderer.sections().unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections["headline"].html, "<h2>Hello</h2>");
        assert_eq!(sections["main"].html, "<div><p>One</p></div><div><p>Two</p></div>");
        assert_eq!(sections["main"].type_name(), "Mixed");
    }

    #[test]
    fn test_sections_map_is_built_once() {
        let tree = sample();
        let renderer = PageRenderer::new(&tree);
        let first: *const _ = renderer.sections().unwrap();
        let second: *const _ = renderer.sections().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_section_lookup() {
        let tree = sample();
        let renderer = PageRenderer::new(&tree);
        assert_eq!(renderer.section("footer").unwrap().html, "<p>Bye</p>");

        let err = renderer.section("sidebar").unwrap_err();
        assert!(matches!(err, RenderError::UnknownSection(ref id) if id == "sidebar"));
    }

    #[test]
    fn test_sections_missing() {
        let tree = tree(json!({"title": "No sections"}));
        let renderer = PageRenderer::new(&tree);
        assert!(matches!(renderer.sections(), Err(RenderError::MissingSections)));
        assert!(matches!(renderer.section("a"), Err(RenderError::MissingSections)));
    }

    #[test]
    fn test_http_status() {
        let tree = sample();
        assert_eq!(PageRenderer::new(&tree).http_status(), 200);

        let tree = self::tree(json!({"http_header_status": "HTTP/1.0 404 Not Found"}));
        assert_eq!(PageRenderer::new(&tree).http_status(), 404);

        let tree = self::tree(json!({}));
        assert_eq!(PageRenderer::new(&tree).http_status(), 200);
    }
}
