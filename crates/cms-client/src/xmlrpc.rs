//! Minimal XML-RPC codec.
//!
//! Encodes `<methodCall>` documents and decodes `<methodResponse>` documents
//! into [`Value`]s. Decoding first builds a small element tree from
//! `quick-xml` events, then interprets that tree according to the XML-RPC
//! value grammar.

use std::collections::BTreeMap;
use std::fmt::Write;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// An XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Boolean(bool),
    String(String),
    Double(f64),
    /// ISO 8601 timestamp, kept as sent.
    DateTime(String),
    Base64(Vec<u8>),
    Struct(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Nil,
}

/// Error while decoding an XML-RPC response.
#[derive(Debug, thiserror::Error)]
pub enum XmlRpcError {
    /// The server answered with a `<fault>`.
    #[error("XML-RPC fault {code}: {message}")]
    Fault {
        /// `faultCode` member of the fault struct.
        code: i64,
        /// `faultString` member of the fault struct.
        message: String,
    },

    /// XML parsing error.
    #[error("XML parse error")]
    XmlParse(#[from] quick_xml::Error),

    /// Encoding error during XML parsing.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Well-formed XML that is not a valid XML-RPC response.
    #[error("malformed XML-RPC response: {0}")]
    Malformed(String),
}

impl Value {
    /// Build a struct value from key/value pairs.
    pub fn structure<K, I>(members: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Struct(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Convert into a JSON value for typed deserialization.
    ///
    /// Base64 payloads become strings (lossily for non-UTF-8 bytes); doubles
    /// that JSON cannot represent become `null`.
    #[must_use]
    pub fn into_json(self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Int(i) => Json::from(i),
            Self::Boolean(b) => Json::Bool(b),
            Self::String(s) | Self::DateTime(s) => Json::String(s),
            Self::Double(d) => serde_json::Number::from_f64(d).map_or(Json::Null, Json::Number),
            Self::Base64(bytes) => Json::String(String::from_utf8_lossy(&bytes).into_owned()),
            Self::Struct(members) => Json::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
            Self::Array(items) => Json::Array(items.into_iter().map(Self::into_json).collect()),
            Self::Nil => Json::Null,
        }
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<value>");
        match self {
            Self::Int(i) => {
                let _ = write!(out, "<int>{i}</int>");
            }
            Self::Boolean(b) => {
                let _ = write!(out, "<boolean>{}</boolean>", u8::from(*b));
            }
            Self::String(s) => {
                let _ = write!(out, "<string>{}</string>", escape(s.as_str()));
            }
            Self::Double(d) => {
                let _ = write!(out, "<double>{d}</double>");
            }
            Self::DateTime(s) => {
                let _ = write!(
                    out,
                    "<dateTime.iso8601>{}</dateTime.iso8601>",
                    escape(s.as_str())
                );
            }
            Self::Base64(bytes) => {
                let _ = write!(out, "<base64>{}</base64>", BASE64_STANDARD.encode(bytes));
            }
            Self::Struct(members) => {
                out.push_str("<struct>");
                for (name, value) in members {
                    let _ = write!(out, "<member><name>{}</name>", escape(name.as_str()));
                    value.write_xml(out);
                    out.push_str("</member>");
                }
                out.push_str("</struct>");
            }
            Self::Array(items) => {
                out.push_str("<array><data>");
                for item in items {
                    item.write_xml(out);
                }
                out.push_str("</data></array>");
            }
            Self::Nil => out.push_str("<nil/>"),
        }
        out.push_str("</value>");
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// Encode a `<methodCall>` document.
///
/// `encoding` is written into the XML declaration; the caller is responsible
/// for transcoding the returned string to that encoding.
#[must_use]
pub fn encode_call(method: &str, params: &[Value], encoding: &str) -> String {
    let mut out = format!(
        "<?xml version=\"1.0\" encoding=\"{}\"?>\n<methodCall><methodName>{}</methodName><params>",
        escape(encoding),
        escape(method)
    );
    for param in params {
        out.push_str("<param>");
        param.write_xml(&mut out);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>\n");
    out
}

/// Decode a `<methodResponse>` document.
///
/// # Errors
///
/// Returns [`XmlRpcError::Fault`] if the response carries a fault, and a
/// parse or [`XmlRpcError::Malformed`] error if the document is not a valid
/// response.
pub fn decode_response(xml: &str) -> Result<Value, XmlRpcError> {
    let root = parse_document(xml)?;
    if root.name != "methodResponse" {
        return Err(XmlRpcError::Malformed(format!(
            "expected <methodResponse>, found <{}>",
            root.name
        )));
    }

    if let Some(fault) = root.child("fault") {
        return Err(fault_from(fault)?);
    }

    let value = root
        .child("params")
        .and_then(|params| params.child("param"))
        .and_then(|param| param.child("value"))
        .ok_or_else(|| XmlRpcError::Malformed("response has no return value".to_owned()))?;
    value_from(value)
}

fn fault_from(fault: &Node) -> Result<XmlRpcError, XmlRpcError> {
    let value = fault
        .child("value")
        .ok_or_else(|| XmlRpcError::Malformed("fault has no value".to_owned()))?;
    let Value::Struct(mut members) = value_from(value)? else {
        return Err(XmlRpcError::Malformed("fault value is not a struct".to_owned()));
    };

    let code = match members.remove("faultCode") {
        Some(Value::Int(code)) => code,
        _ => 0,
    };
    let message = match members.remove("faultString") {
        Some(Value::String(message)) => message,
        _ => String::new(),
    };
    Ok(XmlRpcError::Fault { code, message })
}

fn value_from(node: &Node) -> Result<Value, XmlRpcError> {
    // a value without a type element is a string
    let Some(typed) = node.children.first() else {
        return Ok(Value::String(node.text.clone()));
    };
    let text = typed.text.trim();

    Ok(match typed.name.as_str() {
        "int" | "i4" | "i8" => Value::Int(
            text.parse()
                .map_err(|_| XmlRpcError::Malformed(format!("invalid integer '{text}'")))?,
        ),
        "boolean" => match text {
            "1" => Value::Boolean(true),
            "0" => Value::Boolean(false),
            _ => return Err(XmlRpcError::Malformed(format!("invalid boolean '{text}'"))),
        },
        "string" => Value::String(typed.text.clone()),
        "double" => Value::Double(
            text.parse()
                .map_err(|_| XmlRpcError::Malformed(format!("invalid double '{text}'")))?,
        ),
        "dateTime.iso8601" => Value::DateTime(text.to_owned()),
        "base64" => {
            let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            Value::Base64(
                BASE64_STANDARD
                    .decode(compact)
                    .map_err(|e| XmlRpcError::Malformed(format!("invalid base64: {e}")))?,
            )
        }
        "struct" => {
            let mut members = BTreeMap::new();
            for member in typed.children_named("member") {
                let name = member
                    .child("name")
                    .ok_or_else(|| XmlRpcError::Malformed("struct member without name".to_owned()))?;
                let value = member.child("value").ok_or_else(|| {
                    XmlRpcError::Malformed(format!("struct member '{}' without value", name.text))
                })?;
                members.insert(name.text.clone(), value_from(value)?);
            }
            Value::Struct(members)
        }
        "array" => {
            let items = typed
                .child("data")
                .map(|data| {
                    data.children_named("value")
                        .map(value_from)
                        .collect::<Result<Vec<_>, _>>()
                })
                .transpose()?
                .unwrap_or_default();
            Value::Array(items)
        }
        "nil" => Value::Nil,
        other => return Err(XmlRpcError::Malformed(format!("unknown value type <{other}>"))),
    })
}

/// Element of the parsed response document.
#[derive(Debug, Default)]
struct Node {
    name: String,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn parse_document(xml: &str) -> Result<Node, XmlRpcError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    // stack[0] is the document itself
    let mut stack = vec![Node::default()];

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
                stack.push(Node::named(name));
            }
            Event::Empty(e) => {
                let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
                push_child(&mut stack, Node::named(name));
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                append_text(&mut stack, &text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                append_text(&mut stack, &decode_entity(&entity));
            }
            Event::CData(e) => {
                let text = reader.decoder().decode(&e)?;
                append_text(&mut stack, &text);
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(XmlRpcError::Malformed("unbalanced end tag".to_owned()));
                }
                if let Some(node) = stack.pop() {
                    push_child(&mut stack, node);
                }
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if stack.len() != 1 {
        return Err(XmlRpcError::Malformed("unexpected end of document".to_owned()));
    }
    stack
        .pop()
        .and_then(|document| document.children.into_iter().next())
        .ok_or_else(|| XmlRpcError::Malformed("empty document".to_owned()))
}

fn push_child(stack: &mut [Node], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn append_text(stack: &mut [Node], text: &str) {
    if let Some(node) = stack.last_mut() {
        node.text.push_str(text);
    }
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        // unknown entity, preserved as-is
        _ => format!("&{entity};"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(value: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?>\n<methodResponse>\n  <params>\n    <param>\n      {value}\n    </param>\n  </params>\n</methodResponse>"
        )
    }

    #[test]
    fn test_encode_call() {
        let params = [
            Value::structure([("private_key", Value::from("k&y")), ("session_id", Value::from("s"))]),
            Value::from(12),
            Value::from("<front>"),
        ];
        assert_eq!(
            encode_call("cms.getPage", &params, "utf-8"),
            concat!(
                "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
                "<methodCall><methodName>cms.getPage</methodName><params>",
                "<param><value><struct>",
                "<member><name>private_key</name><value><string>k&amp;y</string></value></member>",
                "<member><name>session_id</name><value><string>s</string></value></member>",
                "</struct></value></param>",
                "<param><value><int>12</int></value></param>",
                "<param><value><string>&lt;front&gt;</string></value></param>",
                "</params></methodCall>\n"
            )
        );
    }

    #[test]
    fn test_encode_other_scalars() {
        let params = [
            Value::Boolean(true),
            Value::Double(1.5),
            Value::Base64(b"hi".to_vec()),
            Value::Array(vec![Value::Nil]),
        ];
        let xml = encode_call("m", &params, "utf-8");
        assert!(xml.contains("<value><boolean>1</boolean></value>"));
        assert!(xml.contains("<value><double>1.5</double></value>"));
        assert!(xml.contains("<value><base64>aGk=</base64></value>"));
        assert!(xml.contains("<value><array><data><value><nil/></value></data></array></value>"));
    }

    #[test]
    fn test_decode_scalars() {
        let cases = [
            ("<value><int>42</int></value>", Value::Int(42)),
            ("<value><i4>-7</i4></value>", Value::Int(-7)),
            ("<value><boolean>1</boolean></value>", Value::Boolean(true)),
            ("<value><double>2.5</double></value>", Value::Double(2.5)),
            ("<value><string> padded </string></value>", Value::String(" padded ".to_owned())),
            ("<value>untyped</value>", Value::String("untyped".to_owned())),
            ("<value></value>", Value::String(String::new())),
            ("<value><string/></value>", Value::String(String::new())),
            ("<value><nil/></value>", Value::Nil),
            (
                "<value><dateTime.iso8601>20080101T12:00:00</dateTime.iso8601></value>",
                Value::DateTime("20080101T12:00:00".to_owned()),
            ),
            ("<value><base64>aGk=</base64></value>", Value::Base64(b"hi".to_vec())),
        ];
        for (xml, expected) in cases {
            assert_eq!(decode_response(&response(xml)).unwrap(), expected, "{xml}");
        }
    }

    #[test]
    fn test_decode_entities() {
        let value =
            decode_response(&response("<value><string>&lt;p&gt;Tom &amp; Jerry&#39;s &#xE6;</string></value>"))
                .unwrap();
        assert_eq!(value, Value::String("<p>Tom & Jerry's æ".to_owned()));
    }

    #[test]
    fn test_decode_struct_and_array() {
        let xml = response(
            r"<value><struct>
                <member><name>title</name><value><string>Forside</string></value></member>
                <member><name>sections</name><value><array><data>
                    <value><struct>
                        <member><name>type</name><value>shorttext</value></member>
                    </struct></value>
                    <value><int>2</int></value>
                </data></array></value></member>
                <member><name>navigation_sublevel</name><value><boolean>0</boolean></value></member>
            </struct></value>",
        );
        let value = decode_response(&xml).unwrap();
        assert_eq!(
            value.into_json(),
            json!({
                "title": "Forside",
                "sections": [{"type": "shorttext"}, 2],
                "navigation_sublevel": false
            })
        );
    }

    #[test]
    fn test_decode_empty_array() {
        let value = decode_response(&response("<value><array><data/></array></value>")).unwrap();
        assert_eq!(value, Value::Array(Vec::new()));
    }

    #[test]
    fn test_decode_fault() {
        let xml = r"<?xml version='1.0'?>
<methodResponse>
  <fault>
    <value><struct>
      <member><name>faultCode</name><value><int>-1</int></value></member>
      <member><name>faultString</name><value><string>Invalid private key</string></value></member>
    </struct></value>
  </fault>
</methodResponse>";
        let err = decode_response(xml).unwrap_err();
        assert!(matches!(
            err,
            XmlRpcError::Fault { code: -1, ref message } if message == "Invalid private key"
        ));
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(
            decode_response("<html><body>500</body></html>"),
            Err(XmlRpcError::Malformed(_))
        ));
        assert!(matches!(
            decode_response("<methodResponse><params/></methodResponse>"),
            Err(XmlRpcError::Malformed(_))
        ));
        assert!(matches!(
            decode_response(&response("<value><int>x</int></value>")),
            Err(XmlRpcError::Malformed(_))
        ));
        assert!(matches!(
            decode_response(&response("<value><bogus>1</bogus></value>")),
            Err(XmlRpcError::Malformed(_))
        ));
        assert!(decode_response("<methodResponse><params>").is_err());
        assert!(decode_response("").is_err());
    }

    #[test]
    fn test_into_json_scalars() {
        assert_eq!(Value::Int(3).into_json(), json!(3));
        assert_eq!(Value::Double(f64::NAN).into_json(), json!(null));
        assert_eq!(Value::Base64(b"abc".to_vec()).into_json(), json!("abc"));
        assert_eq!(Value::Nil.into_json(), json!(null));
    }
}
