//! Section renderers.

use cms_content::{PictureSection, Section, SectionBody};

use crate::RenderError;
use crate::element::render_elements;
use crate::escape::escape;

/// Render one section to a markup fragment.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedSectionType`] for an unknown section
/// type, or [`RenderError::UnsupportedElementType`] for an unknown element
/// inside a mixed section.
pub fn render_section(section: &Section) -> Result<String, RenderError> {
    match &section.body {
        SectionBody::ShortText(short) => Ok(format!("<h2>{}</h2>", escape(&short.text))),
        SectionBody::LongText(long) => Ok(long.html.clone()),
        SectionBody::Picture(picture) => Ok(render_picture(picture)),
        SectionBody::Mixed(mixed) => render_elements(&mixed.elements),
        SectionBody::Unsupported(section_type) => Err(RenderError::UnsupportedSectionType {
            section_type: section_type.clone(),
            section: section.identifier.clone(),
        }),
    }
}

/// Render all sections in order.
///
/// A missing section list renders as the empty string.
///
/// # Errors
///
/// Fails on the first section that cannot be rendered.
pub fn render_sections(sections: Option<&[Section]>) -> Result<String, RenderError> {
    sections
        .unwrap_or_default()
        .iter()
        .map(render_section)
        .collect()
}

fn render_picture(section: &PictureSection) -> String {
    let picture = &section.picture;
    format!(
        r#"<img src="{}" alt="{}" width="{}" height="{}" />"#,
        escape(&picture.file_uri),
        escape(&section.pic_text),
        picture.width,
        picture.height
    )
}
