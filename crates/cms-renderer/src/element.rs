//! Element renderers for mixed sections.
//!
//! Each element is wrapped in a `<div>` that carries the element's optional
//! `extra_class` / `extra_style`. The payload inside the wrapper is produced
//! by one function per element type.

use std::fmt::Write;

use cms_content::{
    Delicious, Element, ElementBody, FileList, Flickr, Gallery, GalleryPicture, PageList,
    PictureElement,
};

use crate::RenderError;
use crate::escape::escape;

/// Inline style of the Flickr fallback link block.
const FLICKR_FALLBACK_STYLE: &str = "background: #eee; border: 2px solid #ccc; padding: 1em;";

/// Render elements in order, concatenating their wrapped fragments.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedElementType`] for the first element whose
/// type has no renderer.
pub fn render_elements(elements: &[Element]) -> Result<String, RenderError> {
    elements.iter().map(render_element).collect()
}

/// Render one element inside its wrapper `<div>`.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedElementType`] if the element type has no
/// renderer.
pub fn render_element(element: &Element) -> Result<String, RenderError> {
    let inner = render_body(&element.body)?;

    let mut out = String::from("<div");
    if let Some(class) = &element.extra_class {
        let _ = write!(out, r#" class="{}""#, escape(class));
    }
    if let Some(style) = &element.extra_style {
        let _ = write!(out, r#" style="{}""#, escape(style));
    }
    out.push('>');
    out.push_str(&inner);
    out.push_str("</div>");
    Ok(out)
}

fn render_body(body: &ElementBody) -> Result<String, RenderError> {
    Ok(match body {
        ElementBody::Delicious(delicious) => render_delicious(delicious),
        ElementBody::Flickr(flickr) => render_flickr(flickr),
        ElementBody::Gallery(gallery) => render_gallery(gallery),
        ElementBody::Htmltext(text) | ElementBody::Wikitext(text) => text.html.clone(),
        ElementBody::PageList(list) => render_page_list(list),
        ElementBody::Picture(picture) => render_picture(picture),
        ElementBody::Map(map) => map.map.clone(),
        ElementBody::Video(video) => video.player.clone(),
        ElementBody::FileList(list) => render_file_list(list),
        ElementBody::Unsupported(element_type) => {
            return Err(RenderError::UnsupportedElementType {
                element_type: element_type.clone(),
            });
        }
    })
}

fn render_delicious(delicious: &Delicious) -> String {
    if delicious.items.is_empty() {
        return String::new();
    }

    let mut out = String::from(r#"<ul class="cms-delicious">"#);
    for item in &delicious.items {
        let _ = write!(
            out,
            r#"<li><a href="{}" title="{}">{}</a></li>"#,
            escape(&item.link),
            escape(&item.description),
            escape(&item.title)
        );
    }
    out.push_str("</ul>");
    out
}

fn render_flickr(flickr: &Flickr) -> String {
    if !flickr.pictobrowser.is_empty() {
        return flickr.pictobrowser.clone();
    }

    match &flickr.set {
        Some(set) => format!(
            r#"<p style="{FLICKR_FALLBACK_STYLE}"><a href="{}">{}</a></p>"#,
            escape(&set.url),
            escape(&set.info.title)
        ),
        None => String::new(),
    }
}

fn render_gallery(gallery: &Gallery) -> String {
    let mut out = String::from(r#"<div class="cms-gallery">"#);
    for picture in &gallery.pictures {
        out.push_str(&render_gallery_item(gallery, picture));
    }
    out.push_str("</div>");
    out
}

/// A picture without a thumbnail rendition is skipped; one without a popup
/// rendition is shown unlinked.
fn render_gallery_item(gallery: &Gallery, picture: &GalleryPicture) -> String {
    let Some(thumbnail) = picture.instances.get(&gallery.thumbnail_size) else {
        tracing::debug!(
            picture = %picture.id,
            size = %gallery.thumbnail_size,
            "Gallery picture has no thumbnail instance"
        );
        return String::new();
    };

    let img = format!(
        r#"<img src="{}" alt="" id="gallery_{}" />"#,
        escape(&thumbnail.file_uri),
        escape(&picture.id)
    );

    let mut out = String::from(r#"<div class="cms-gallery-item">"#);
    match picture.instances.get(&gallery.popup_size) {
        Some(popup) => {
            let _ = write!(
                out,
                r#"<a href="{}" rel="lightbox[{}]" title="{}">{img}</a>"#,
                escape(&popup.file_uri),
                escape(&gallery.id),
                escape(&picture.description)
            );
        }
        None => out.push_str(&img),
    }
    if gallery.show_description == "show" {
        let _ = write!(out, "<p>{}</p>", escape(&picture.description));
    }
    out.push_str("</div>");
    out
}

fn render_page_list(list: &PageList) -> String {
    let mut out = String::from(r#"<div class="pagelist">"#);
    if !list.headline.is_empty() {
        let _ = write!(out, "<h2>{}</h2>", escape(&list.headline));
    }

    if list.pages.is_empty() {
        let _ = write!(out, "<p>{}</p>", escape(&list.no_results_text));
        out.push_str("</div>");
        return out;
    }

    let show_description = list.show == "description";
    out.push_str(r#"<dl class="pagelist">"#);
    for page in &list.pages {
        let url = escape(&page.url);
        let _ = write!(
            out,
            r#"<dt><a rel="bookmark" href="{url}">{}</a></dt>"#,
            escape(&page.title)
        );
        if show_description {
            let _ = write!(
                out,
                r#"<dd>{} <a href="{url}">{}</a></dd>"#,
                escape(&page.description),
                escape(&list.read_more_text)
            );
        }
    }
    out.push_str("</dl></div>");
    out
}

fn render_picture(element: &PictureElement) -> String {
    let Some(picture) = &element.picture else {
        return String::new();
    };

    let src = escape(&picture.file_uri);
    let alt = escape(&element.pic_text);

    let mut out = if picture.has_dimensions() {
        format!(r#"<div class="image" style="width: {}px;">"#, picture.width)
    } else {
        String::from(r#"<div class="image">"#)
    };

    let linked = !element.pic_url.is_empty();
    if linked {
        let _ = write!(out, r#"<a href="{}">"#, escape(&element.pic_url));
    }
    if picture.has_dimensions() {
        let _ = write!(
            out,
            r#"<img width="{}" height="{}" src="{src}" alt="{alt}" />"#,
            picture.width, picture.height
        );
    } else {
        let _ = write!(out, r#"<img src="{src}" alt="{alt}" />"#);
    }
    if linked {
        out.push_str("</a>");
    }

    let _ = write!(out, "<p>{alt}</p></div>");
    out
}

fn render_file_list(list: &FileList) -> String {
    if list.files.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    if !list.caption.is_empty() {
        let _ = write!(out, "<h2>{}</h2>", escape(&list.caption));
    }

    out.push_str(r#"<ul class="filelist">"#);
    for file in &list.files {
        let _ = write!(
            out,
            r#"<li>{}: <a href="{}">{}</a> (<em>{}, {}</em>)</li>"#,
            escape(&file.description),
            escape(&file.file_uri),
            escape(&file.file_name),
            escape(&file.file_type.mime_type),
            escape(&file.human_size)
        );
    }
    out.push_str("</ul>");
    out
}
