//! Location information request and delivery

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{DecodeError, EncodeError};
use crate::model::common::{DeliveryHeader, GeoPosition};
use crate::model::place::{PlaceRefChoice, PlaceResult};
use crate::xml::choice::{Variant, decode_choice, variant_child};
use crate::xml::{FromXml, ToXml, XmlNode, XmlWriter};

/// Area a place search is limited to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoRestriction {
    Rectangle {
        upper_left: GeoPosition,
        lower_right: GeoPosition,
    },
    Circle {
        center: GeoPosition,
        /// Radius in meters
        radius: f64,
    },
}

impl GeoRestriction {
    const VARIANTS: [Variant<Self>; 2] = [
        ("Rectangle", |n| {
            let rectangle = n.require("Rectangle")?;
            Ok(Self::Rectangle {
                upper_left: rectangle.decode_required("UpperLeft")?,
                lower_right: rectangle.decode_required("LowerRight")?,
            })
        }),
        ("Circle", |n| {
            let circle = n.require("Circle")?;
            Ok(Self::Circle {
                center: circle.decode_required("Center")?,
                radius: circle.parse_required("Radius")?,
            })
        }),
    ];
}

impl FromXml for GeoRestriction {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        decode_choice(node, &Self::VARIANTS)
    }
}

impl ToXml for GeoRestriction {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| match self {
            Self::Rectangle {
                upper_left,
                lower_right,
            } => w.element("Rectangle", |w| {
                w.write("UpperLeft", upper_left)?;
                w.write("LowerRight", lower_right)
            }),
            Self::Circle { center, radius } => w.element("Circle", |w| {
                w.write("Center", center)?;
                w.display("Radius", radius)
            }),
        })
    }
}

/// Free-text and/or area input of a place search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialInput {
    pub name: Option<String>,
    pub geo_restriction: Option<GeoRestriction>,
}

impl FromXml for InitialInput {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            name: node.optional_string("Name"),
            geo_restriction: node.decode_child("GeoRestriction")?,
        })
    }
}

impl ToXml for InitialInput {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.optional_text("Name", self.name.as_deref())?;
            w.optional("GeoRestriction", self.geo_restriction.as_ref())
        })
    }
}

/// What a place search starts from
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    Initial(InitialInput),
    PlaceRef(PlaceRefChoice),
}

impl LocationInput {
    const VARIANTS: [Variant<Self>; 2] = [
        ("InitialInput", |n| variant_child(n, "InitialInput").map(Self::Initial)),
        ("PlaceRef", |n| variant_child(n, "PlaceRef").map(Self::PlaceRef)),
    ];

    /// Search by name
    pub fn name(name: impl Into<String>) -> Self {
        Self::Initial(InitialInput {
            name: Some(name.into()),
            geo_restriction: None,
        })
    }

    /// Search inside an area
    #[must_use]
    pub const fn area(restriction: GeoRestriction) -> Self {
        Self::Initial(InitialInput {
            name: None,
            geo_restriction: Some(restriction),
        })
    }

    fn write_variant(&self, w: &mut XmlWriter) -> Result<(), EncodeError> {
        match self {
            Self::Initial(input) => w.write("InitialInput", input),
            Self::PlaceRef(place_ref) => w.write("PlaceRef", place_ref),
        }
    }
}

/// Kind of place a search may return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceTypeRestriction {
    Stop,
    Address,
    Poi,
    Location,
    TopographicPlace,
}

impl PlaceTypeRestriction {
    /// Wire value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Address => "address",
            Self::Poi => "poi",
            Self::Location => "location",
            Self::TopographicPlace => "topographicPlace",
        }
    }
}

impl fmt::Display for PlaceTypeRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceTypeRestriction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stop" => Ok(Self::Stop),
            "address" => Ok(Self::Address),
            "poi" => Ok(Self::Poi),
            "location" => Ok(Self::Location),
            "topographicPlace" => Ok(Self::TopographicPlace),
            other => Err(format!("unknown place type {other:?}")),
        }
    }
}

/// Restrictions of a place search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceParam {
    pub types: Vec<PlaceTypeRestriction>,
    pub number_of_results: Option<u32>,
    pub include_pt_modes: Option<bool>,
}

impl PlaceParam {
    /// Restrict to `types`, returning at most `limit` results
    #[must_use]
    pub fn new(types: Vec<PlaceTypeRestriction>, limit: u32) -> Self {
        Self {
            types,
            number_of_results: Some(limit),
            include_pt_modes: Some(true),
        }
    }
}

impl FromXml for PlaceParam {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            types: node
                .children("Type")
                .map(XmlNode::parse_text)
                .collect::<Result<_, _>>()?,
            number_of_results: node.parse_child("NumberOfResults")?,
            include_pt_modes: node.child_bool("IncludePtModes")?,
        })
    }
}

impl ToXml for PlaceParam {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            for place_type in &self.types {
                w.display("Type", place_type)?;
            }
            w.optional_display("NumberOfResults", self.number_of_results.as_ref())?;
            w.optional_bool("IncludePtModes", self.include_pt_modes)
        })
    }
}

/// `OJPLocationInformationRequest`
#[derive(Debug, Clone, PartialEq)]
pub struct LocationInformationRequest {
    pub request_timestamp: DateTime<Utc>,
    pub input: LocationInput,
    pub restrictions: Option<PlaceParam>,
}

impl FromXml for LocationInformationRequest {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            request_timestamp: node.required_timestamp("RequestTimestamp")?,
            input: decode_choice(node, &LocationInput::VARIANTS)?,
            restrictions: node.decode_child("Restrictions")?,
        })
    }
}

impl ToXml for LocationInformationRequest {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.timestamp("RequestTimestamp", &self.request_timestamp)?;
            self.input.write_variant(w)?;
            w.optional("Restrictions", self.restrictions.as_ref())
        })
    }
}

/// `OJPLocationInformationDelivery`
#[derive(Debug, Clone, PartialEq)]
pub struct LocationInformationDelivery {
    pub header: DeliveryHeader,
    pub place_results: Vec<PlaceResult>,
}

impl FromXml for LocationInformationDelivery {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            header: DeliveryHeader::read(node)?,
            place_results: node.decode_all("PlaceResult")?,
        })
    }
}

impl ToXml for LocationInformationDelivery {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            self.header.write_fields(w)?;
            w.each("PlaceResult", &self.place_results)
        })
    }
}
