//! Top-level page sections.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::element::{Element, ImageFile, payload};
use crate::loose;

/// A top-level content block of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Key of the section within its page (`section_identifier`).
    pub identifier: String,
    /// Type-specific payload.
    pub body: SectionBody,
}

/// Payload of a [`Section`], selected by its `type` discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    ShortText(ShortText),
    LongText(LongText),
    Picture(PictureSection),
    Mixed(Mixed),
    /// Discriminator the renderer does not know.
    Unsupported(String),
}

impl SectionBody {
    fn from_fields(section_type: &str, fields: Map<String, Value>) -> Result<Self, serde_json::Error> {
        Ok(match section_type.to_ascii_lowercase().as_str() {
            "shorttext" => Self::ShortText(payload(fields)?),
            "longtext" => Self::LongText(payload(fields)?),
            "picture" => Self::Picture(payload(fields)?),
            "mixed" => Self::Mixed(payload(fields)?),
            _ => Self::Unsupported(section_type.to_owned()),
        })
    }

    /// Canonical discriminator name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::ShortText(_) => "ShortText",
            Self::LongText(_) => "LongText",
            Self::Picture(_) => "Picture",
            Self::Mixed(_) => "Mixed",
            Self::Unsupported(name) => name,
        }
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let text = |key: &str| fields.get(key).map(loose::value_to_string).unwrap_or_default();

        let identifier = text("section_identifier");
        let section_type = text("type");
        let body = SectionBody::from_fields(&section_type, fields).map_err(D::Error::custom)?;

        Ok(Self { identifier, body })
    }
}

/// Headline text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShortText {
    #[serde(default, deserialize_with = "loose::string")]
    pub text: String,
}

/// Body text, already rendered to HTML by the CMS.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LongText {
    #[serde(default, deserialize_with = "loose::string")]
    pub html: String,
}

/// A single picture with alternative text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PictureSection {
    #[serde(default, deserialize_with = "loose::record")]
    pub picture: ImageFile,
    #[serde(default, deserialize_with = "loose::string")]
    pub pic_text: String,
}

/// Container of elements, rendered in order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Mixed {
    #[serde(default, deserialize_with = "loose::list")]
    pub elements: Vec<Element>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementBody;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn section(value: Value) -> Section {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_short_text() {
        let s = section(json!({
            "section_identifier": "headline",
            "type": "shorttext",
            "text": "Hello"
        }));
        assert_eq!(s.identifier, "headline");
        assert_eq!(
            s.body,
            SectionBody::ShortText(ShortText {
                text: "Hello".to_owned()
            })
        );
    }

    #[test]
    fn test_picture_with_string_dimensions() {
        let s = section(json!({
            "section_identifier": "pic",
            "type": "Picture",
            "picture": {"file_uri": "/a.jpg", "width": "100", "height": "50"},
            "pic_text": "A"
        }));
        let SectionBody::Picture(picture) = s.body else {
            panic!("expected picture section");
        };
        assert_eq!(picture.picture.file_uri, "/a.jpg");
        assert_eq!(picture.picture.width, 100);
        assert_eq!(picture.picture.height, 50);
        assert_eq!(picture.pic_text, "A");
    }

    #[test]
    fn test_picture_missing_record_defaults() {
        let s = section(json!({"section_identifier": "pic", "type": "picture"}));
        let SectionBody::Picture(picture) = s.body else {
            panic!("expected picture section");
        };
        assert_eq!(picture.picture, ImageFile::default());
    }

    #[test]
    fn test_mixed_preserves_element_order() {
        let s = section(json!({
            "section_identifier": "main",
            "type": "mixed",
            "elements": [
                {"type": "htmltext", "html": "first"},
                {"type": "video", "player": "second"},
                {"type": "map", "map": "third"}
            ]
        }));
        let SectionBody::Mixed(mixed) = s.body else {
            panic!("expected mixed section");
        };
        let names: Vec<&str> = mixed.elements.iter().map(|e| e.body.type_name()).collect();
        assert_eq!(names, vec!["Htmltext", "Video", "Map"]);
        assert!(matches!(mixed.elements[0].body, ElementBody::Htmltext(_)));
    }

    #[test]
    fn test_unknown_section_type() {
        let s = section(json!({"section_identifier": "x", "type": "Bogus"}));
        assert_eq!(s.body, SectionBody::Unsupported("Bogus".to_owned()));
        assert_eq!(s.body.type_name(), "Bogus");
    }

    #[test]
    fn test_numeric_identifier() {
        let s = section(json!({"section_identifier": 12, "type": "longtext", "html": "<p/>"}));
        assert_eq!(s.identifier, "12");
    }

    #[test]
    fn test_non_record_section_is_rejected() {
        let result: Result<Section, _> = serde_json::from_value(json!("shorttext"));
        assert!(result.is_err());
    }
}
