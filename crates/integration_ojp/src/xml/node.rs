//! Owned XML element tree
//!
//! Responses are small (tens to hundreds of kilobytes), so the whole document
//! is read into an immutable tree first. Decoders then work on `&XmlNode`,
//! which keeps every decode attempt free of reader state.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::DecodeError;
use crate::xml::keys::normalize;
use crate::xml::time::{parse_duration, parse_timestamp};
use crate::xml::FromXml;

/// An XML element with its attributes, child elements and text content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    /// Parse a complete document and return its root element
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let source = std::str::from_utf8(bytes)
            .map_err(|e| DecodeError::Malformed(format!("invalid UTF-8: {e}")))?;

        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Self> = Vec::new();
        let mut root: Option<Self> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(DecodeError::Malformed(format!(
                        "at byte {}: {e}",
                        reader.buffer_position()
                    )));
                },
            };

            match event {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let node = Self::from_start(&start)?;
                    Self::attach(&mut stack, &mut root, node)?;
                },
                Event::End(_) => {
                    let node = stack.pop().ok_or_else(|| {
                        DecodeError::Malformed("closing tag without an open element".to_string())
                    })?;
                    Self::attach(&mut stack, &mut root, node)?;
                },
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| DecodeError::Malformed(e.to_string()))?;
                    Self::append_text(&mut stack, &text)?;
                },
                Event::CData(data) => {
                    let text = std::str::from_utf8(data.as_ref())
                        .map_err(|e| DecodeError::Malformed(e.to_string()))?;
                    Self::append_text(&mut stack, text)?;
                },
                Event::Eof => break,
                _ => {},
            }
        }

        if let Some(open) = stack.last() {
            return Err(DecodeError::Malformed(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }
        root.ok_or_else(|| DecodeError::Malformed("document has no root element".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, DecodeError> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| DecodeError::Malformed(e.to_string()))?
            .to_string();

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| DecodeError::Malformed(e.to_string()))?;
            let key = std::str::from_utf8(attribute.key.as_ref())
                .map_err(|e| DecodeError::Malformed(e.to_string()))?
                .to_string();
            let value = attribute
                .unescape_value()
                .map_err(|e| DecodeError::Malformed(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn attach(stack: &mut [Self], root: &mut Option<Self>, node: Self) -> Result<(), DecodeError> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        if root.is_some() {
            return Err(DecodeError::Malformed(format!(
                "second root element <{}>",
                node.name
            )));
        }
        *root = Some(node);
        Ok(())
    }

    fn append_text(stack: &mut [Self], text: &str) -> Result<(), DecodeError> {
        match stack.last_mut() {
            Some(node) => {
                node.text.push_str(text);
                Ok(())
            },
            None if text.trim().is_empty() => Ok(()),
            None => Err(DecodeError::Malformed(
                "text outside of the root element".to_string(),
            )),
        }
    }

    /// Element name as it appeared on the wire
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical element name
    #[must_use]
    pub fn key(&self) -> &str {
        normalize(&self.name)
    }

    /// Trimmed text content
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Attribute value by exact name
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child whose canonical name is `key`
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&Self> {
        let key = normalize(key);
        self.children.iter().find(|child| child.key() == key)
    }

    /// All children whose canonical name is `key`, in document order
    pub fn children<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        let key = normalize(key);
        self.children.iter().filter(move |child| child.key() == key)
    }

    /// Whether a child with canonical name `key` exists
    #[must_use]
    pub fn has_child(&self, key: &str) -> bool {
        self.child(key).is_some()
    }

    /// Child that must be present
    pub fn require(&self, key: &str) -> Result<&Self, DecodeError> {
        self.child(key)
            .ok_or_else(|| DecodeError::missing(self.key(), normalize(key)))
    }

    /// Text of an optional child
    #[must_use]
    pub fn child_text(&self, key: &str) -> Option<&str> {
        self.child(key).map(Self::text)
    }

    /// Text of a required child
    pub fn required_text(&self, key: &str) -> Result<&str, DecodeError> {
        self.require(key).map(Self::text)
    }

    /// Owned text of an optional child
    #[must_use]
    pub fn optional_string(&self, key: &str) -> Option<String> {
        self.child_text(key).map(str::to_string)
    }

    /// Owned text of a required child
    pub fn required_string(&self, key: &str) -> Result<String, DecodeError> {
        self.required_text(key).map(str::to_string)
    }

    /// Parse the text of an optional child with [`FromStr`]
    pub fn parse_child<T>(&self, key: &str) -> Result<Option<T>, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.child(key).map(Self::parse_text).transpose()
    }

    /// Parse the text of a required child with [`FromStr`]
    pub fn parse_required<T>(&self, key: &str) -> Result<T, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.require(key).and_then(Self::parse_text)
    }

    /// Parse this node's text with [`FromStr`]
    pub fn parse_text<T>(&self) -> Result<T, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.text()
            .parse()
            .map_err(|e: T::Err| DecodeError::invalid(self.key(), self.text(), e.to_string()))
    }

    /// Parse an optional `xsd:boolean` child (`true`/`false`/`1`/`0`)
    pub fn child_bool(&self, key: &str) -> Result<Option<bool>, DecodeError> {
        self.child(key).map(Self::bool_text).transpose()
    }

    /// Parse a required `xsd:boolean` child
    pub fn required_bool(&self, key: &str) -> Result<bool, DecodeError> {
        self.require(key).and_then(Self::bool_text)
    }

    fn bool_text(&self) -> Result<bool, DecodeError> {
        match self.text() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(DecodeError::invalid(self.key(), other, "expected a boolean")),
        }
    }

    /// Parse an optional timestamp child
    pub fn child_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, DecodeError> {
        self.child(key).map(Self::timestamp_text).transpose()
    }

    /// Parse a required timestamp child
    pub fn required_timestamp(&self, key: &str) -> Result<DateTime<Utc>, DecodeError> {
        self.require(key).and_then(Self::timestamp_text)
    }

    fn timestamp_text(&self) -> Result<DateTime<Utc>, DecodeError> {
        parse_timestamp(self.text()).map_err(|e| DecodeError::invalid(self.key(), self.text(), e))
    }

    /// Parse an optional ISO-8601 duration child
    pub fn child_duration(&self, key: &str) -> Result<Option<Duration>, DecodeError> {
        self.child(key).map(Self::duration_text).transpose()
    }

    /// Parse a required ISO-8601 duration child
    pub fn required_duration(&self, key: &str) -> Result<Duration, DecodeError> {
        self.require(key).and_then(Self::duration_text)
    }

    fn duration_text(&self) -> Result<Duration, DecodeError> {
        parse_duration(self.text()).map_err(|e| DecodeError::invalid(self.key(), self.text(), e))
    }

    /// Decode an optional child with its [`FromXml`] implementation
    pub fn decode_child<T: FromXml>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        self.child(key).map(T::from_xml).transpose()
    }

    /// Decode a required child with its [`FromXml`] implementation
    pub fn decode_required<T: FromXml>(&self, key: &str) -> Result<T, DecodeError> {
        self.require(key).and_then(T::from_xml)
    }

    /// Decode every child named `key`
    pub fn decode_all<T: FromXml>(&self, key: &str) -> Result<Vec<T>, DecodeError> {
        self.children(key).map(T::from_xml).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OJP xmlns="http://www.vdv.de/ojp" xmlns:siri="http://www.siri.org.uk/siri" version="2.0">
  <!-- comment -->
  <Place>
    <siri:StopPointRef>8507000</siri:StopPointRef>
    <Name><Text xml:lang="de">Bern &amp; Umgebung</Text></Name>
    <Complete>1</Complete>
    <Empty/>
    <Desc><![CDATA[a < b]]></Desc>
  </Place>
  <Place><Id>2</Id></Place>
</OJP>"#;

    #[test]
    fn parses_tree_and_attributes() {
        let root = XmlNode::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(root.name(), "OJP");
        assert_eq!(root.attribute("version"), Some("2.0"));
        assert_eq!(root.children("Place").count(), 2);
    }

    #[test]
    fn lookups_normalize_prefixes() {
        let root = XmlNode::parse(SAMPLE.as_bytes()).unwrap();
        let place = root.require("Place").unwrap();
        assert_eq!(place.required_text("StopPointRef").unwrap(), "8507000");
        assert_eq!(place.required_text("siri:StopPointRef").unwrap(), "8507000");
        assert_eq!(place.child("StopPointRef").unwrap().name(), "siri:StopPointRef");
    }

    #[test]
    fn unescapes_text_and_cdata() {
        let root = XmlNode::parse(SAMPLE.as_bytes()).unwrap();
        let place = root.require("Place").unwrap();
        let text = place.require("Name").unwrap().require("Text").unwrap();
        assert_eq!(text.text(), "Bern & Umgebung");
        assert_eq!(text.attribute("xml:lang"), Some("de"));
        assert_eq!(place.child_text("Desc"), Some("a < b"));
        assert_eq!(place.child_text("Empty"), Some(""));
    }

    #[test]
    fn typed_accessors() {
        let root = XmlNode::parse(SAMPLE.as_bytes()).unwrap();
        let place = root.require("Place").unwrap();
        assert!(place.required_bool("Complete").unwrap());
        assert_eq!(place.parse_required::<u64>("StopPointRef").unwrap(), 8_507_000);
        assert_eq!(place.child_bool("Missing").unwrap(), None);
    }

    #[test]
    fn missing_child_reports_parent_and_element() {
        let root = XmlNode::parse(SAMPLE.as_bytes()).unwrap();
        let err = root.require("siri:ServiceDelivery").unwrap_err();
        assert_eq!(err, DecodeError::missing("OJP", "ServiceDelivery"));
    }

    #[test]
    fn invalid_value_carries_raw_text() {
        let root = XmlNode::parse(SAMPLE.as_bytes()).unwrap();
        let place = root.require("Place").unwrap();
        let err = place.required_bool("StopPointRef").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidValue { ref value, .. } if value == "8507000"));
    }

    #[test]
    fn rejects_non_xml() {
        assert!(matches!(
            XmlNode::parse(b"this is not xml"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(XmlNode::parse(b""), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(matches!(
            XmlNode::parse(b"<OJP><A></B></OJP>"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_unclosed_document() {
        assert!(matches!(
            XmlNode::parse(b"<OJP><A>text</A>"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(matches!(
            XmlNode::parse(&[0x3c, 0xff, 0xfe, 0x3e]),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_two_roots() {
        assert!(matches!(
            XmlNode::parse(b"<A/><B/>"),
            Err(DecodeError::Malformed(_))
        ));
    }
}
