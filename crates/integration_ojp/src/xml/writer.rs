//! Ordered XML emission
//!
//! The remote service validates element order against the schema, so the
//! writer is append-only: whatever order the model writes is the wire order.
//! Element names are given canonically and prefixed via [`prefixed`].

use std::fmt::Display;

use chrono::{DateTime, Duration, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::EncodeError;
use crate::xml::ToXml;
use crate::xml::keys::prefixed;
use crate::xml::time::{format_duration, format_timestamp};

/// Append-only XML writer over an in-memory buffer
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl std::fmt::Debug for XmlWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlWriter")
            .field("bytes_written", &self.writer.get_ref().len())
            .finish()
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    /// Create a writer with an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    /// Consume the writer and return the written bytes
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), EncodeError> {
        self.writer
            .write_event(event)
            .map_err(|e| EncodeError::Write(e.to_string()))
    }

    /// Write the `<?xml version="1.0" encoding="UTF-8"?>` declaration
    pub fn declaration(&mut self) -> Result<(), EncodeError> {
        self.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    /// Write `<tag attrs…>`, the children written by `body`, then `</tag>`
    pub fn element_with_attributes<F>(
        &mut self,
        tag: &str,
        attributes: &[(&str, &str)],
        body: F,
    ) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        let name = prefixed(tag);
        let mut start = BytesStart::new(name.as_ref());
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        self.emit(Event::Start(start))?;
        body(self)?;
        self.emit(Event::End(BytesEnd::new(name.as_ref())))
    }

    /// Write `<tag>`, the children written by `body`, then `</tag>`
    pub fn element<F>(&mut self, tag: &str, body: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        self.element_with_attributes(tag, &[], body)
    }

    /// Write `<tag attrs…>text</tag>`
    pub fn text_with_attributes(
        &mut self,
        tag: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> Result<(), EncodeError> {
        self.element_with_attributes(tag, attributes, |w| {
            if text.is_empty() {
                Ok(())
            } else {
                w.emit(Event::Text(BytesText::new(text)))
            }
        })
    }

    /// Write `<tag>text</tag>`
    pub fn text(&mut self, tag: &str, text: &str) -> Result<(), EncodeError> {
        self.text_with_attributes(tag, &[], text)
    }

    /// Write `<tag>text</tag>` when a value is present
    pub fn optional_text(&mut self, tag: &str, text: Option<&str>) -> Result<(), EncodeError> {
        text.map_or(Ok(()), |text| self.text(tag, text))
    }

    /// Write a value using its [`Display`] form
    pub fn display<T: Display>(&mut self, tag: &str, value: &T) -> Result<(), EncodeError> {
        self.text(tag, &value.to_string())
    }

    /// Write a value using its [`Display`] form when present
    pub fn optional_display<T: Display>(
        &mut self,
        tag: &str,
        value: Option<&T>,
    ) -> Result<(), EncodeError> {
        value.map_or(Ok(()), |value| self.display(tag, value))
    }

    /// Write an `xsd:boolean` when present
    pub fn optional_bool(&mut self, tag: &str, value: Option<bool>) -> Result<(), EncodeError> {
        value.map_or(Ok(()), |value| self.display(tag, &value))
    }

    /// Write a timestamp in request format
    pub fn timestamp(&mut self, tag: &str, value: &DateTime<Utc>) -> Result<(), EncodeError> {
        self.text(tag, &format_timestamp(value))
    }

    /// Write a timestamp when present
    pub fn optional_timestamp(
        &mut self,
        tag: &str,
        value: Option<&DateTime<Utc>>,
    ) -> Result<(), EncodeError> {
        value.map_or(Ok(()), |value| self.timestamp(tag, value))
    }

    /// Write an ISO-8601 duration
    pub fn duration(&mut self, tag: &str, value: &Duration) -> Result<(), EncodeError> {
        self.text(tag, &format_duration(value))
    }

    /// Write an ISO-8601 duration when present
    pub fn optional_duration(
        &mut self,
        tag: &str,
        value: Option<&Duration>,
    ) -> Result<(), EncodeError> {
        value.map_or(Ok(()), |value| self.duration(tag, value))
    }

    /// Write a nested structure under `tag`
    pub fn write<T: ToXml>(&mut self, tag: &str, value: &T) -> Result<(), EncodeError> {
        value.to_xml(self, tag)
    }

    /// Write a nested structure under `tag` when present
    pub fn optional<T: ToXml>(&mut self, tag: &str, value: Option<&T>) -> Result<(), EncodeError> {
        value.map_or(Ok(()), |value| value.to_xml(self, tag))
    }

    /// Write each item under its own `tag` element
    pub fn each<T: ToXml>(&mut self, tag: &str, items: &[T]) -> Result<(), EncodeError> {
        items.iter().try_for_each(|item| item.to_xml(self, tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut XmlWriter) -> Result<(), EncodeError>) -> String {
        let mut w = XmlWriter::new();
        f(&mut w).unwrap();
        String::from_utf8(w.into_bytes()).unwrap()
    }

    #[test]
    fn prefixes_siri_elements() {
        let xml = written(|w| {
            w.element("PlaceRef", |w| {
                w.text("StopPointRef", "8507000")?;
                w.text("StopPointName", "Bern")
            })
        });
        assert_eq!(
            xml,
            "<PlaceRef><siri:StopPointRef>8507000</siri:StopPointRef>\
             <StopPointName>Bern</StopPointName></PlaceRef>"
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let xml = written(|w| w.text_with_attributes("Text", &[("xml:lang", "de")], "A & <B>"));
        assert_eq!(xml, r#"<Text xml:lang="de">A &amp; &lt;B&gt;</Text>"#);
    }

    #[test]
    fn skips_absent_optionals() {
        let xml = written(|w| {
            w.element("Params", |w| {
                w.optional_bool("IncludeCalls", None)?;
                w.optional_bool("IncludeService", Some(true))?;
                w.optional_text("Name", None)
            })
        });
        assert_eq!(xml, "<Params><IncludeService>true</IncludeService></Params>");
    }

    #[test]
    fn preserves_emission_order() {
        let xml = written(|w| {
            w.text("B", "2")?;
            w.text("A", "1")
        });
        assert_eq!(xml, "<B>2</B><A>1</A>");
    }

    #[test]
    fn writes_durations_and_timestamps() {
        use chrono::TimeZone;
        let ts = Utc.with_ymd_and_hms(2024, 5, 13, 8, 0, 0).unwrap();
        let xml = written(|w| {
            w.timestamp("StartTime", &ts)?;
            w.duration("Duration", &Duration::minutes(62))
        });
        assert_eq!(
            xml,
            "<StartTime>2024-05-13T08:00:00.000Z</StartTime><Duration>PT1H2M</Duration>"
        );
    }
}
