//! Places and place references

use domain::{GeoLocation, HasLocation};

use crate::error::{DecodeError, EncodeError};
use crate::model::common::{GeoPosition, InternationalText, Mode};
use crate::xml::choice::{Variant, decode_choice, variant_child};
use crate::xml::{FromXml, ToXml, XmlNode, XmlWriter};

/// A station grouping one or more stop points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopPlace {
    pub stop_place_ref: String,
    pub stop_place_name: InternationalText,
    pub topographic_place_ref: Option<String>,
}

impl FromXml for StopPlace {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            stop_place_ref: node.required_string("StopPlaceRef")?,
            stop_place_name: node.decode_required("StopPlaceName")?,
            topographic_place_ref: node.optional_string("TopographicPlaceRef"),
        })
    }
}

impl ToXml for StopPlace {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("StopPlaceRef", &self.stop_place_ref)?;
            w.write("StopPlaceName", &self.stop_place_name)?;
            w.optional_text("TopographicPlaceRef", self.topographic_place_ref.as_deref())
        })
    }
}

/// A single boarding point (platform, quay or pole)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopPoint {
    pub stop_point_ref: String,
    pub stop_point_name: InternationalText,
    pub planned_quay: Option<InternationalText>,
    pub parent_ref: Option<String>,
    pub topographic_place_ref: Option<String>,
}

impl FromXml for StopPoint {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            stop_point_ref: node.required_string("StopPointRef")?,
            stop_point_name: node.decode_required("StopPointName")?,
            planned_quay: node.decode_child("PlannedQuay")?,
            parent_ref: node.optional_string("ParentRef"),
            topographic_place_ref: node.optional_string("TopographicPlaceRef"),
        })
    }
}

impl ToXml for StopPoint {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("StopPointRef", &self.stop_point_ref)?;
            w.write("StopPointName", &self.stop_point_name)?;
            w.optional("PlannedQuay", self.planned_quay.as_ref())?;
            w.optional_text("ParentRef", self.parent_ref.as_deref())?;
            w.optional_text("TopographicPlaceRef", self.topographic_place_ref.as_deref())
        })
    }
}

/// A town, district or other named area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopographicPlace {
    pub topographic_place_code: String,
    pub topographic_place_name: InternationalText,
}

impl FromXml for TopographicPlace {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            topographic_place_code: node.required_string("TopographicPlaceCode")?,
            topographic_place_name: node.decode_required("TopographicPlaceName")?,
        })
    }
}

impl ToXml for TopographicPlace {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("TopographicPlaceCode", &self.topographic_place_code)?;
            w.write("TopographicPlaceName", &self.topographic_place_name)
        })
    }
}

/// A postal address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub public_code: String,
    pub name: InternationalText,
    pub postal_code: Option<String>,
    pub topographic_place_name: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
}

impl FromXml for Address {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            public_code: node.required_string("PublicCode")?,
            name: node.decode_required("Name")?,
            postal_code: node.optional_string("PostalCode"),
            topographic_place_name: node.optional_string("TopographicPlaceName"),
            street: node.optional_string("Street"),
            house_number: node.optional_string("HouseNumber"),
        })
    }
}

impl ToXml for Address {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("PublicCode", &self.public_code)?;
            w.write("Name", &self.name)?;
            w.optional_text("PostalCode", self.postal_code.as_deref())?;
            w.optional_text("TopographicPlaceName", self.topographic_place_name.as_deref())?;
            w.optional_text("Street", self.street.as_deref())?;
            w.optional_text("HouseNumber", self.house_number.as_deref())
        })
    }
}

/// What kind of place a [`Place`] is, decided by which element is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceType {
    StopPlace(StopPlace),
    StopPoint(StopPoint),
    TopographicPlace(TopographicPlace),
    Address(Address),
}

impl PlaceType {
    /// Candidate shapes in decoding order
    pub const VARIANTS: [Variant<Self>; 4] = [
        ("StopPlace", |n| variant_child(n, "StopPlace").map(Self::StopPlace)),
        ("StopPoint", |n| variant_child(n, "StopPoint").map(Self::StopPoint)),
        ("TopographicPlace", |n| {
            variant_child(n, "TopographicPlace").map(Self::TopographicPlace)
        }),
        ("Address", |n| variant_child(n, "Address").map(Self::Address)),
    ];

    /// Stop point or stop place reference, if this is a stop
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::StopPlace(stop) => Some(&stop.stop_place_ref),
            Self::StopPoint(stop) => Some(&stop.stop_point_ref),
            Self::TopographicPlace(_) | Self::Address(_) => None,
        }
    }

    /// Write the variant element inside an open `<Place>`
    pub fn write_variant(&self, w: &mut XmlWriter) -> Result<(), EncodeError> {
        match self {
            Self::StopPlace(v) => w.write("StopPlace", v),
            Self::StopPoint(v) => w.write("StopPoint", v),
            Self::TopographicPlace(v) => w.write("TopographicPlace", v),
            Self::Address(v) => w.write("Address", v),
        }
    }
}

impl FromXml for PlaceType {
    /// Decodes from the enclosing `<Place>`
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        decode_choice(node, &Self::VARIANTS)
    }
}

/// A place returned by the server or referenced in a response context
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub place_type: PlaceType,
    pub name: InternationalText,
    pub geo_position: GeoPosition,
    pub modes: Vec<Mode>,
}

impl HasLocation for Place {
    fn location(&self) -> Option<GeoLocation> {
        Some(self.geo_position.location())
    }
}

impl FromXml for Place {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            place_type: PlaceType::from_xml(node)?,
            name: node.decode_required("Name")?,
            geo_position: node.decode_required("GeoPosition")?,
            modes: node.decode_all("Mode")?,
        })
    }
}

impl ToXml for Place {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            self.place_type.write_variant(w)?;
            w.write("Name", &self.name)?;
            w.write("GeoPosition", &self.geo_position)?;
            w.each("Mode", &self.modes)
        })
    }
}

/// One hit of a location information request
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceResult {
    pub place: Place,
    pub complete: bool,
    /// Match probability in `0.0..=1.0`, absent when the server does not rank
    pub probability: Option<f32>,
}

impl HasLocation for PlaceResult {
    fn location(&self) -> Option<GeoLocation> {
        self.place.location()
    }
}

impl FromXml for PlaceResult {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            place: node.decode_required("Place")?,
            complete: node.required_bool("Complete")?,
            probability: node.parse_child("Probability")?,
        })
    }
}

impl ToXml for PlaceResult {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.write("Place", &self.place)?;
            w.display("Complete", &self.complete)?;
            w.optional_display("Probability", self.probability.as_ref())
        })
    }
}

/// Reference to a place used as request input and echoed in responses
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceRefChoice {
    StopPoint {
        id: String,
        name: InternationalText,
    },
    StopPlace {
        id: String,
        name: InternationalText,
    },
    GeoPosition {
        position: GeoPosition,
        name: InternationalText,
    },
}

impl PlaceRefChoice {
    /// Candidate shapes in decoding order
    pub const VARIANTS: [Variant<Self>; 3] = [
        ("StopPointRef", |n| {
            Ok(Self::StopPoint {
                id: n.required_string("StopPointRef")?,
                name: n.decode_required("Name")?,
            })
        }),
        ("StopPlaceRef", |n| {
            Ok(Self::StopPlace {
                id: n.required_string("StopPlaceRef")?,
                name: n.decode_required("Name")?,
            })
        }),
        ("GeoPosition", |n| {
            Ok(Self::GeoPosition {
                position: n.decode_required("GeoPosition")?,
                name: n.decode_required("Name")?,
            })
        }),
    ];

    /// Reference a stop point by id
    pub fn stop_point(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::StopPoint {
            id: id.into(),
            name: InternationalText::new(name),
        }
    }

    /// Reference a stop place by id
    pub fn stop_place(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::StopPlace {
            id: id.into(),
            name: InternationalText::new(name),
        }
    }

    /// Reference a coordinate
    pub fn geo_position(position: GeoPosition, name: impl Into<String>) -> Self {
        Self::GeoPosition {
            position,
            name: InternationalText::new(name),
        }
    }

    /// Reference a place found by an earlier search
    ///
    /// Stops are referenced by id, anything else by its coordinate.
    #[must_use]
    pub fn from_place(place: &Place) -> Self {
        let name = place.name.clone();
        match &place.place_type {
            PlaceType::StopPoint(stop) => Self::StopPoint {
                id: stop.stop_point_ref.clone(),
                name,
            },
            PlaceType::StopPlace(stop) => Self::StopPlace {
                id: stop.stop_place_ref.clone(),
                name,
            },
            PlaceType::TopographicPlace(_) | PlaceType::Address(_) => Self::GeoPosition {
                position: place.geo_position,
                name,
            },
        }
    }

    /// Display name of the referenced place
    #[must_use]
    pub const fn name(&self) -> &InternationalText {
        match self {
            Self::StopPoint { name, .. }
            | Self::StopPlace { name, .. }
            | Self::GeoPosition { name, .. } => name,
        }
    }

    /// Stop id, if this references a stop
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::StopPoint { id, .. } | Self::StopPlace { id, .. } => Some(id),
            Self::GeoPosition { .. } => None,
        }
    }
}

impl FromXml for PlaceRefChoice {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        decode_choice(node, &Self::VARIANTS)
    }
}

impl ToXml for PlaceRefChoice {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| match self {
            Self::StopPoint { id, name } => {
                w.text("StopPointRef", id)?;
                w.write("Name", name)
            },
            Self::StopPlace { id, name } => {
                w.text("StopPlaceRef", id)?;
                w.write("Name", name)
            },
            Self::GeoPosition { position, name } => {
                w.write("GeoPosition", position)?;
                w.write("Name", name)
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "<Name><Text>Bern</Text></Name>\
        <GeoPosition><siri:Longitude>7.43913</siri:Longitude><siri:Latitude>46.94883</siri:Latitude></GeoPosition>";

    fn place(inner: &str) -> Result<Place, DecodeError> {
        let xml = format!("<Place>{inner}{NAME}</Place>");
        Place::from_xml(&XmlNode::parse(xml.as_bytes()).unwrap())
    }

    const STOP_PLACE: &str =
        "<StopPlace><StopPlaceRef>8507000</StopPlaceRef><StopPlaceName><Text>Bern</Text></StopPlaceName></StopPlace>";
    const STOP_POINT: &str =
        "<StopPoint><siri:StopPointRef>ch:1:sloid:7000:3</siri:StopPointRef><StopPointName><Text>Bern</Text></StopPointName></StopPoint>";

    #[test]
    fn decodes_stop_place() {
        let p = place(STOP_PLACE).unwrap();
        assert!(matches!(p.place_type, PlaceType::StopPlace(ref s) if s.stop_place_ref == "8507000"));
    }

    #[test]
    fn decodes_stop_point() {
        let p = place(STOP_POINT).unwrap();
        assert!(matches!(p.place_type, PlaceType::StopPoint(_)));
        assert_eq!(p.place_type.reference(), Some("ch:1:sloid:7000:3"));
    }

    #[test]
    fn decodes_topographic_place() {
        let p = place(
            "<TopographicPlace><TopographicPlaceCode>351</TopographicPlaceCode>\
             <TopographicPlaceName><Text>Bern</Text></TopographicPlaceName></TopographicPlace>",
        )
        .unwrap();
        assert!(matches!(p.place_type, PlaceType::TopographicPlace(_)));
        assert_eq!(p.place_type.reference(), None);
    }

    #[test]
    fn decodes_address() {
        let p = place(
            "<Address><PublicCode>a1</PublicCode><Name><Text>Bundesplatz 3</Text></Name>\
             <PostalCode>3005</PostalCode></Address>",
        )
        .unwrap();
        match p.place_type {
            PlaceType::Address(address) => assert_eq!(address.postal_code.as_deref(), Some("3005")),
            other => panic!("expected address, got {other:?}"),
        }
    }

    #[test]
    fn stop_place_wins_over_stop_point() {
        let p = place(&format!("{STOP_POINT}{STOP_PLACE}")).unwrap();
        assert!(matches!(p.place_type, PlaceType::StopPlace(_)));
    }

    #[test]
    fn broken_stop_place_falls_through_to_stop_point() {
        let p = place(&format!("<StopPlace><StopPlaceRef>x</StopPlaceRef></StopPlace>{STOP_POINT}"))
            .unwrap();
        assert!(matches!(p.place_type, PlaceType::StopPoint(_)));
    }

    #[test]
    fn place_without_variant_lists_all_attempts() {
        let err = place("").unwrap_err();
        assert_eq!(
            err,
            DecodeError::NoMatchingVariant {
                element: "Place".to_string(),
                attempted: vec!["StopPlace", "StopPoint", "TopographicPlace", "Address"],
            }
        );
    }

    #[test]
    fn missing_probability_is_none() {
        let xml = format!("<PlaceResult><Place>{STOP_PLACE}{NAME}</Place><Complete>true</Complete></PlaceResult>");
        let result = PlaceResult::from_xml(&XmlNode::parse(xml.as_bytes()).unwrap()).unwrap();
        assert_eq!(result.probability, None);
        assert!(result.complete);
    }

    #[test]
    fn place_ref_prefers_stop_point() {
        let n = XmlNode::parse(
            b"<PlaceRef><StopPlaceRef>8507000</StopPlaceRef><siri:StopPointRef>8507000:3</siri:StopPointRef>\
              <Name><Text>Bern</Text></Name></PlaceRef>",
        )
        .unwrap();
        assert_eq!(
            PlaceRefChoice::from_xml(&n).unwrap(),
            PlaceRefChoice::stop_point("8507000:3", "Bern")
        );
    }

    #[test]
    fn place_ref_from_address_uses_coordinates() {
        let p = place(
            "<Address><PublicCode>a1</PublicCode><Name><Text>Bundesplatz 3</Text></Name></Address>",
        )
        .unwrap();
        let reference = PlaceRefChoice::from_place(&p);
        assert!(matches!(reference, PlaceRefChoice::GeoPosition { .. }));
        assert_eq!(reference.name().text, "Bern");
        assert_eq!(reference.id(), None);
    }
}
