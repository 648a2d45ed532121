//! Escaping for text embedded in XHTML.

/// Escape XHTML special characters.
///
/// Used for every CMS-authored text field placed in element content or an
/// attribute value. Pre-rendered payloads (`html`, `css`, embeds) are emitted
/// as-is and never pass through here.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            // &apos; is not an HTML 4 entity
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
