//! Navigation list renderer.

use std::fmt;
use std::fmt::Write;

use cms_content::NavEntry;

use crate::escape::escape;

/// Which navigation list of a page to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationLevel {
    Toplevel,
    Sublevel,
}

impl NavigationLevel {
    /// Name used in the list's `id` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Toplevel => "toplevel",
            Self::Sublevel => "sublevel",
        }
    }
}

impl fmt::Display for NavigationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a navigation list as `<ul id="navigation-<level>">`.
///
/// The first item is marked with `class="navigation-first-item"`. The item
/// whose id equals `current_id` is marked with `id="navigation-current"`;
/// nothing is marked when either id is empty. Returns an empty string for an
/// empty list.
#[must_use]
pub fn render_navigation(entries: &[NavEntry], level: NavigationLevel, current_id: &str) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut out = format!(r#"<ul id="navigation-{level}">"#);
    for (index, entry) in entries.iter().enumerate() {
        out.push_str("<li");
        if !current_id.is_empty() && !entry.id.is_empty() && entry.id == current_id {
            out.push_str(r#" id="navigation-current""#);
        }
        if index == 0 {
            out.push_str(r#" class="navigation-first-item""#);
        }
        let _ = write!(
            out,
            r#"><a href="{}">{}</a></li>"#,
            escape(&entry.url),
            escape(&entry.navigation_name)
        );
    }
    out.push_str("</ul>");
    out
}
