//! Building blocks shared by several message types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use domain::GeoLocation;

use crate::error::{DecodeError, EncodeError};
use crate::model::place::Place;
use crate::xml::choice::{Variant, any_present, decode_choice};
use crate::xml::{FromXml, ToXml, XmlNode, XmlWriter};

/// Text with an optional language tag, `<X><Text xml:lang="de">…</Text></X>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternationalText {
    /// The text itself
    pub text: String,
    /// BCP 47 language tag from `xml:lang`
    pub lang: Option<String>,
}

impl InternationalText {
    /// Text without a language tag
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: None,
        }
    }

    /// Text tagged with a language
    pub fn with_lang(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: Some(lang.into()),
        }
    }
}

impl fmt::Display for InternationalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromXml for InternationalText {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        let text = node.require("Text")?;
        Ok(Self {
            text: text.text().to_string(),
            lang: text.attribute("xml:lang").map(str::to_string),
        })
    }
}

impl ToXml for InternationalText {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| match &self.lang {
            Some(lang) => w.text_with_attributes("Text", &[("xml:lang", lang)], &self.text),
            None => w.text("Text", &self.text),
        })
    }
}

/// WGS84 coordinate as carried on the wire (longitude first)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    /// Degrees east
    pub longitude: f64,
    /// Degrees north
    pub latitude: f64,
}

impl GeoPosition {
    /// Create a position from longitude and latitude
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// The position as a domain location
    ///
    /// Decoded positions are range-checked; positions built with [`new`](Self::new)
    /// are trusted as given.
    #[must_use]
    pub const fn location(&self) -> GeoLocation {
        GeoLocation::new_unchecked(self.latitude, self.longitude)
    }
}

impl From<GeoLocation> for GeoPosition {
    fn from(location: GeoLocation) -> Self {
        Self::new(location.longitude(), location.latitude())
    }
}

impl FromXml for GeoPosition {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        let longitude: f64 = node.parse_required("Longitude")?;
        let latitude: f64 = node.parse_required("Latitude")?;
        let location = GeoLocation::new(latitude, longitude).map_err(|e| {
            DecodeError::invalid(
                node.key(),
                format!("{longitude}, {latitude}"),
                e.to_string(),
            )
        })?;
        Ok(location.into())
    }
}

impl ToXml for GeoPosition {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.display("Longitude", &self.longitude)?;
            w.display("Latitude", &self.latitude)
        })
    }
}

/// Public transport mode (`PtMode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PtMode {
    Air,
    Bus,
    TrolleyBus,
    Tram,
    Coach,
    Rail,
    IntercityRail,
    UrbanRail,
    Metro,
    Water,
    Cableway,
    Funicular,
    Taxi,
    SelfDrive,
    All,
    Unknown,
}

impl PtMode {
    const ALL_MODES: [Self; 16] = [
        Self::Air,
        Self::Bus,
        Self::TrolleyBus,
        Self::Tram,
        Self::Coach,
        Self::Rail,
        Self::IntercityRail,
        Self::UrbanRail,
        Self::Metro,
        Self::Water,
        Self::Cableway,
        Self::Funicular,
        Self::Taxi,
        Self::SelfDrive,
        Self::All,
        Self::Unknown,
    ];

    /// Wire value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Bus => "bus",
            Self::TrolleyBus => "trolleyBus",
            Self::Tram => "tram",
            Self::Coach => "coach",
            Self::Rail => "rail",
            Self::IntercityRail => "intercityRail",
            Self::UrbanRail => "urbanRail",
            Self::Metro => "metro",
            Self::Water => "water",
            Self::Cableway => "cableway",
            Self::Funicular => "funicular",
            Self::Taxi => "taxi",
            Self::SelfDrive => "selfDrive",
            Self::All => "all",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PtMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PtMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_MODES
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown PtMode {s:?}"))
    }
}

/// SIRI submode, a closed union keyed by the element that carries it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submode {
    Rail(String),
    Bus(String),
    Tram(String),
    Metro(String),
    Funicular(String),
    Telecabin(String),
    Water(String),
    Air(String),
}

impl Submode {
    /// Element names in decoding order
    pub const KEYS: [&'static str; 8] = [
        "RailSubmode",
        "BusSubmode",
        "TramSubmode",
        "MetroSubmode",
        "FunicularSubmode",
        "TelecabinSubmode",
        "WaterSubmode",
        "AirSubmode",
    ];

    /// Element name and value as written
    #[must_use]
    pub fn element(&self) -> (&'static str, &str) {
        match self {
            Self::Rail(v) => (Self::KEYS[0], v),
            Self::Bus(v) => (Self::KEYS[1], v),
            Self::Tram(v) => (Self::KEYS[2], v),
            Self::Metro(v) => (Self::KEYS[3], v),
            Self::Funicular(v) => (Self::KEYS[4], v),
            Self::Telecabin(v) => (Self::KEYS[5], v),
            Self::Water(v) => (Self::KEYS[6], v),
            Self::Air(v) => (Self::KEYS[7], v),
        }
    }

    /// Decode the submode present in `node`, if any
    pub fn decode_in(node: &XmlNode) -> Result<Option<Self>, DecodeError> {
        if !any_present(node, &Self::KEYS) {
            return Ok(None);
        }
        let variants: [Variant<Self>; 8] = [
            ("RailSubmode", |n| n.required_string("RailSubmode").map(Self::Rail)),
            ("BusSubmode", |n| n.required_string("BusSubmode").map(Self::Bus)),
            ("TramSubmode", |n| n.required_string("TramSubmode").map(Self::Tram)),
            ("MetroSubmode", |n| n.required_string("MetroSubmode").map(Self::Metro)),
            ("FunicularSubmode", |n| {
                n.required_string("FunicularSubmode").map(Self::Funicular)
            }),
            ("TelecabinSubmode", |n| {
                n.required_string("TelecabinSubmode").map(Self::Telecabin)
            }),
            ("WaterSubmode", |n| n.required_string("WaterSubmode").map(Self::Water)),
            ("AirSubmode", |n| n.required_string("AirSubmode").map(Self::Air)),
        ];
        decode_choice(node, &variants).map(Some)
    }
}

/// Transport mode of a service or place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode {
    pub pt_mode: PtMode,
    pub submode: Option<Submode>,
    pub name: Option<InternationalText>,
    pub short_name: Option<InternationalText>,
}

impl Mode {
    /// A mode without submode or names
    #[must_use]
    pub const fn new(pt_mode: PtMode) -> Self {
        Self {
            pt_mode,
            submode: None,
            name: None,
            short_name: None,
        }
    }
}

impl FromXml for Mode {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            pt_mode: node.parse_required("PtMode")?,
            submode: Submode::decode_in(node)?,
            name: node.decode_child("Name")?,
            short_name: node.decode_child("ShortName")?,
        })
    }
}

impl ToXml for Mode {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.display("PtMode", &self.pt_mode)?;
            if let Some(submode) = &self.submode {
                let (key, value) = submode.element();
                w.text(key, value)?;
            }
            w.optional("Name", self.name.as_ref())?;
            w.optional("ShortName", self.short_name.as_ref())
        })
    }
}

/// How the server should use realtime data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UseRealtimeData {
    Full,
    #[default]
    Explanatory,
    None,
}

impl UseRealtimeData {
    /// Wire value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Explanatory => "explanatory",
            Self::None => "none",
        }
    }
}

impl fmt::Display for UseRealtimeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UseRealtimeData {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "explanatory" => Ok(Self::Explanatory),
            "none" => Ok(Self::None),
            other => Err(format!("unknown realtime policy {other:?}")),
        }
    }
}

/// A timetabled time with its optional realtime estimate
///
/// The two live under different keys and are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTime {
    pub timetabled_time: DateTime<Utc>,
    pub estimated_time: Option<DateTime<Utc>>,
}

impl ServiceTime {
    /// A timetabled time without an estimate
    #[must_use]
    pub const fn timetabled(timetabled_time: DateTime<Utc>) -> Self {
        Self {
            timetabled_time,
            estimated_time: None,
        }
    }

    /// Estimate when known, else the timetable
    #[must_use]
    pub fn best(&self) -> DateTime<Utc> {
        self.estimated_time.unwrap_or(self.timetabled_time)
    }
}

impl FromXml for ServiceTime {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            timetabled_time: node.required_timestamp("TimetabledTime")?,
            estimated_time: node.child_timestamp("EstimatedTime")?,
        })
    }
}

impl ToXml for ServiceTime {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.timestamp("TimetabledTime", &self.timetabled_time)?;
            w.optional_timestamp("EstimatedTime", self.estimated_time.as_ref())
        })
    }
}

/// Fields every delivery starts with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryHeader {
    pub response_timestamp: DateTime<Utc>,
    pub request_message_ref: Option<String>,
    pub status: Option<bool>,
    pub default_language: Option<String>,
    /// Server calculation time in milliseconds
    pub calc_time: Option<u64>,
}

impl DeliveryHeader {
    /// Header with only a response timestamp
    #[must_use]
    pub const fn new(response_timestamp: DateTime<Utc>) -> Self {
        Self {
            response_timestamp,
            request_message_ref: None,
            status: None,
            default_language: None,
            calc_time: None,
        }
    }

    /// Read the header fields from a delivery element
    pub fn read(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            response_timestamp: node.required_timestamp("ResponseTimestamp")?,
            request_message_ref: node.optional_string("RequestMessageRef"),
            status: node.child_bool("Status")?,
            default_language: node.optional_string("DefaultLanguage"),
            calc_time: node.parse_child("CalcTime")?,
        })
    }

    /// Write the header fields inside an open delivery element
    pub fn write_fields(&self, w: &mut XmlWriter) -> Result<(), EncodeError> {
        w.timestamp("ResponseTimestamp", &self.response_timestamp)?;
        w.optional_text("RequestMessageRef", self.request_message_ref.as_deref())?;
        w.optional_bool("Status", self.status)?;
        w.optional_text("DefaultLanguage", self.default_language.as_deref())?;
        w.optional_display("CalcTime", self.calc_time.as_ref())
    }
}

/// Places referenced by the results of a delivery
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseContext {
    pub places: Vec<Place>,
}

impl ResponseContext {
    /// Find a context place by stop point or stop place reference
    #[must_use]
    pub fn place(&self, reference: &str) -> Option<&Place> {
        self.places
            .iter()
            .find(|place| place.place_type.reference() == Some(reference))
    }
}

impl FromXml for ResponseContext {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        let places = match node.child("Places") {
            Some(places) => places.decode_all("Place")?,
            None => Vec::new(),
        };
        Ok(Self { places })
    }
}

impl ToXml for ResponseContext {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            if self.places.is_empty() {
                return Ok(());
            }
            w.element("Places", |w| w.each("Place", &self.places))
        })
    }
}
