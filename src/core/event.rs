//! Normalized event record and its content-negotiation accessors.
//!
//! An [`Event`] is produced once by a protocol adapter and treated as a
//! value object afterwards. Accessors interpret the stored body lazily;
//! every mismatch or parse failure degrades to `None` rather than an
//! error, so downstream handlers never need their own fallback paths.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use url::form_urlencoded;

/// Body payload of a normalized [`Event`].
///
/// The variant reflects how the adapter decided to convert the raw
/// payload, not just the declared content-type: text-like payloads
/// arrive as `Text`, everything else stays `Bytes`. `Json` holds a value
/// that was parsed ahead of time, e.g. by a caller constructing events
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Bytes(Vec<u8>),
    Text(String),
    Json(Value),
}

/// A normalized event structure for multi-cloud serverless functions.
///
/// Header keys and values are always text; the adapter decodes raw
/// transport bytes before they get here. Keys keep their original case
/// and insertion order - case-insensitive lookup is provided by
/// [`Event::get_header`], not by the storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub method: String,
    pub path: String,
    pub headers: IndexMap<String, String>,
    /// Raw, undecoded query component.
    pub query_string: String,
    pub body: Option<Body>,
    /// Tag of the adapter that produced this event.
    pub source: String,
}

impl Event {
    /// Creates an event with an empty query string, no body, and an
    /// `"unknown"` source. Adapters stamp their own source tag.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        headers: IndexMap<String, String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers,
            query_string: String::new(),
            body: None,
            source: "unknown".to_string(),
        }
    }

    #[must_use]
    pub fn with_query_string(mut self, query_string: impl Into<String>) -> Self {
        self.query_string = query_string.into();
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Get a header value case-insensitively.
    ///
    /// When several stored keys differ only in case, the first one in
    /// insertion order wins.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Extract a query parameter by name.
    ///
    /// The query string is parsed as `application/x-www-form-urlencoded`
    /// on every call. Multi-valued parameters yield the first value;
    /// blank values are treated as absent.
    pub fn get_query_param(&self, name: &str) -> Option<String> {
        form_urlencoded::parse(self.query_string.as_bytes())
            .find(|(key, value)| key.as_ref() == name && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    }

    /// Whether the declared content-type is JSON.
    pub fn is_json(&self) -> bool {
        let content_type = self.content_type();
        content_type.contains("application/json") || content_type.contains("text/json")
    }

    /// Whether the declared content-type is XML.
    pub fn is_xml(&self) -> bool {
        let content_type = self.content_type();
        content_type.contains("application/xml") || content_type.contains("text/xml")
    }

    /// Whether the declared content-type is URL-encoded form data.
    pub fn is_form_data(&self) -> bool {
        self.content_type()
            .contains("application/x-www-form-urlencoded")
    }

    /// Whether the declared content-type is multipart form data.
    pub fn is_multipart(&self) -> bool {
        self.content_type().contains("multipart/form-data")
    }

    /// Whether the body is binary data. This inspects the body's actual
    /// representation, not the declared content-type.
    pub fn is_binary(&self) -> bool {
        matches!(self.body, Some(Body::Bytes(_)))
    }

    /// Get the body as a JSON value, parsing if necessary.
    ///
    /// An already-parsed body is returned as-is. A text body is parsed
    /// only when the content-type declares JSON; malformed JSON yields
    /// `None`, as does valid JSON under a non-JSON content-type.
    pub fn get_json(&self) -> Option<Value> {
        match &self.body {
            Some(Body::Json(value)) => Some(value.clone()),
            Some(Body::Text(text)) if self.is_json() => serde_json::from_str(text).ok(),
            _ => None,
        }
    }

    /// Get the body as parsed XML.
    ///
    /// Element attributes land under the reserved `"@attributes"` key. A
    /// childless element with non-empty text collapses to the trimmed
    /// text string; repeated child tags become an array in order of
    /// first appearance. Malformed XML yields `None`.
    pub fn get_xml(&self) -> Option<Value> {
        match &self.body {
            Some(Body::Text(text)) if self.is_xml() => {
                let document = roxmltree::Document::parse(text).ok()?;
                Some(xml_to_value(document.root_element()))
            }
            _ => None,
        }
    }

    /// Get the body as binary data.
    pub fn get_binary(&self) -> Option<&[u8]> {
        match &self.body {
            Some(Body::Bytes(bytes)) => Some(bytes),
            _ => None,
        }
    }

    /// Get the body as text, decoding UTF-8 bytes if necessary.
    pub fn get_text(&self) -> Option<String> {
        match &self.body {
            Some(Body::Text(text)) => Some(text.clone()),
            Some(Body::Bytes(bytes)) => String::from_utf8(bytes.clone()).ok(),
            _ => None,
        }
    }

    /// Get the body as text decoded with a named encoding.
    ///
    /// `label` is a WHATWG encoding label such as `"utf-8"` or
    /// `"latin1"`. An unknown label or malformed input yields `None`; a
    /// body that is already text is returned unchanged.
    pub fn get_text_with_encoding(&self, label: &str) -> Option<String> {
        match &self.body {
            Some(Body::Text(text)) => Some(text.clone()),
            Some(Body::Bytes(bytes)) => {
                let encoding = encoding_rs::Encoding::for_label(label.as_bytes())?;
                encoding
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .map(|decoded| decoded.into_owned())
            }
            _ => None,
        }
    }

    /// Get a binary body as a base64-encoded string.
    pub fn get_base64(&self) -> Option<String> {
        match &self.body {
            Some(Body::Bytes(bytes)) => Some(BASE64_STANDARD.encode(bytes)),
            _ => None,
        }
    }

    fn content_type(&self) -> String {
        self.get_header("content-type")
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

/// Convert an XML element into a JSON value.
fn xml_to_value(node: roxmltree::Node<'_, '_>) -> Value {
    let mut result = Map::new();

    let attributes: Map<String, Value> = node
        .attributes()
        .map(|attr| (attr.name().to_string(), Value::String(attr.value().to_string())))
        .collect();
    if !attributes.is_empty() {
        result.insert("@attributes".to_string(), Value::Object(attributes));
    }

    let children: Vec<_> = node.children().filter(|child| child.is_element()).collect();

    let text = node.text().map(str::trim).unwrap_or_default();
    if !text.is_empty() {
        if children.is_empty() {
            return Value::String(text.to_string());
        }
        result.insert("text".to_string(), Value::String(text.to_string()));
    }

    for child in children {
        let tag = child.tag_name().name().to_string();
        let child_value = xml_to_value(child);
        match result.get_mut(&tag) {
            // Repeated tags collect into an array, order of first appearance.
            Some(Value::Array(items)) => items.push(child_value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, child_value]);
            }
            None => {
                result.insert(tag, child_value);
            }
        }
    }

    Value::Object(result)
}
