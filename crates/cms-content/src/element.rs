//! Elements nested inside mixed sections.

use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::loose;
use crate::tree::PageSummary;

/// A content unit inside a mixed section.
///
/// `extra_class` and `extra_style` are `None` when the CMS sent nothing (or an
/// empty string), so renderers never emit empty attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Additional CSS class for the element wrapper.
    pub extra_class: Option<String>,
    /// Additional inline style for the element wrapper.
    pub extra_style: Option<String>,
    /// Type-specific payload.
    pub body: ElementBody,
}

/// Payload of an [`Element`], selected by its `type` discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementBody {
    Delicious(Delicious),
    Flickr(Flickr),
    Gallery(Gallery),
    Htmltext(HtmlText),
    Wikitext(HtmlText),
    PageList(PageList),
    Picture(PictureElement),
    Map(MapEmbed),
    Video(Video),
    FileList(FileList),
    /// Discriminator the renderer does not know. Kept so rendering can fail
    /// with the offending name instead of silently dropping content.
    Unsupported(String),
}

impl ElementBody {
    fn from_fields(element_type: &str, fields: Map<String, Value>) -> Result<Self, serde_json::Error> {
        Ok(match element_type.to_ascii_lowercase().as_str() {
            "delicious" => Self::Delicious(payload(fields)?),
            "flickr" => Self::Flickr(payload(fields)?),
            "gallery" => Self::Gallery(payload(fields)?),
            "htmltext" => Self::Htmltext(payload(fields)?),
            "wikitext" => Self::Wikitext(payload(fields)?),
            "pagelist" => Self::PageList(payload(fields)?),
            "picture" => Self::Picture(payload(fields)?),
            "map" => Self::Map(payload(fields)?),
            "video" => Self::Video(payload(fields)?),
            "filelist" => Self::FileList(payload(fields)?),
            _ => Self::Unsupported(element_type.to_owned()),
        })
    }

    /// Canonical discriminator name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Delicious(_) => "Delicious",
            Self::Flickr(_) => "Flickr",
            Self::Gallery(_) => "Gallery",
            Self::Htmltext(_) => "Htmltext",
            Self::Wikitext(_) => "Wikitext",
            Self::PageList(_) => "PageList",
            Self::Picture(_) => "Picture",
            Self::Map(_) => "Map",
            Self::Video(_) => "Video",
            Self::FileList(_) => "FileList",
            Self::Unsupported(name) => name,
        }
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let text = |key: &str| fields.get(key).map(loose::value_to_string).unwrap_or_default();
        let non_empty = |s: String| (!s.is_empty()).then_some(s);

        let element_type = text("type");
        let extra_class = non_empty(text("extra_class"));
        let extra_style = non_empty(text("extra_style"));
        let body = ElementBody::from_fields(&element_type, fields).map_err(D::Error::custom)?;

        Ok(Self {
            extra_class,
            extra_style,
            body,
        })
    }
}

pub(crate) fn payload<T: DeserializeOwned>(fields: Map<String, Value>) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(fields))
}

/// del.icio.us bookmarks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Delicious {
    #[serde(default, deserialize_with = "loose::list")]
    pub items: Vec<DeliciousItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeliciousItem {
    #[serde(default, deserialize_with = "loose::string")]
    pub title: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub description: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub link: String,
}

/// Flickr photo set, either as an embeddable widget or as a plain link.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Flickr {
    /// Ready-made embed markup (trusted).
    #[serde(default, deserialize_with = "loose::string")]
    pub pictobrowser: String,
    #[serde(default, deserialize_with = "loose::optional_record")]
    pub set: Option<FlickrSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FlickrSet {
    #[serde(default, deserialize_with = "loose::string")]
    pub url: String,
    #[serde(default, deserialize_with = "loose::record")]
    pub info: FlickrSetInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FlickrSetInfo {
    #[serde(default, deserialize_with = "loose::string")]
    pub title: String,
}

/// Picture gallery with thumbnails linking to larger instances.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Gallery {
    #[serde(default, deserialize_with = "loose::string")]
    pub id: String,
    /// Instance name used for the linked, larger picture.
    #[serde(default, deserialize_with = "loose::string")]
    pub popup_size: String,
    /// Instance name used for the inline thumbnail.
    #[serde(default, deserialize_with = "loose::string")]
    pub thumbnail_size: String,
    /// Captions are shown only when this is `"show"`.
    #[serde(default, deserialize_with = "loose::string")]
    pub show_description: String,
    #[serde(default, deserialize_with = "loose::list")]
    pub pictures: Vec<GalleryPicture>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GalleryPicture {
    #[serde(default, deserialize_with = "loose::string")]
    pub id: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub description: String,
    /// Available renditions keyed by size name.
    #[serde(default, deserialize_with = "loose::map")]
    pub instances: BTreeMap<String, ImageFile>,
}

/// An uploaded image (or one rendition of it).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageFile {
    #[serde(default, deserialize_with = "loose::string")]
    pub file_uri: String,
    #[serde(default, deserialize_with = "loose::int")]
    pub width: i64,
    #[serde(default, deserialize_with = "loose::int")]
    pub height: i64,
}

impl ImageFile {
    /// Both dimensions are known (non-zero).
    #[must_use]
    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Pre-rendered HTML (`Htmltext` and `Wikitext` elements).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HtmlText {
    #[serde(default, deserialize_with = "loose::string")]
    pub html: String,
}

/// List of pages matching the element's criteria.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageList {
    #[serde(default, deserialize_with = "loose::string")]
    pub headline: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub no_results_text: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub read_more_text: String,
    /// Descriptions are shown only when this is `"description"`.
    #[serde(default, deserialize_with = "loose::string")]
    pub show: String,
    #[serde(default, deserialize_with = "loose::list")]
    pub pages: Vec<PageSummary>,
}

/// Single picture with caption and optional link.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PictureElement {
    #[serde(default, deserialize_with = "loose::optional_record")]
    pub picture: Option<ImageFile>,
    #[serde(default, deserialize_with = "loose::string")]
    pub pic_text: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub pic_url: String,
}

/// Embedded map markup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapEmbed {
    #[serde(default, deserialize_with = "loose::string")]
    pub map: String,
}

/// Embedded video player markup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Video {
    #[serde(default, deserialize_with = "loose::string")]
    pub player: String,
}

/// Downloadable files.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileList {
    #[serde(default, deserialize_with = "loose::string")]
    pub caption: String,
    #[serde(default, deserialize_with = "loose::list")]
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileEntry {
    #[serde(default, deserialize_with = "loose::string")]
    pub description: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub file_uri: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub file_name: String,
    #[serde(default, deserialize_with = "loose::record")]
    pub file_type: FileType,
    /// Size formatted for humans by the CMS (e.g. `"1,2 MB"`).
    #[serde(
        default,
        rename = "dk_file_size",
        alias = "file_size",
        deserialize_with = "loose::string"
    )]
    pub human_size: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileType {
    #[serde(default, deserialize_with = "loose::string")]
    pub mime_type: String,
}
