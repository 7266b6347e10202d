//! Trip and trip refine requests and deliveries

use chrono::{DateTime, Utc};

use crate::error::{DecodeError, EncodeError};
use crate::model::common::{DeliveryHeader, PtMode, ResponseContext, UseRealtimeData};
use crate::model::place::PlaceRefChoice;
use crate::model::trip::TripResult;
use crate::xml::choice::{Variant, any_present, decode_choice};
use crate::xml::{FromXml, ToXml, XmlNode, XmlWriter};

/// A place plus the time the traveller wants to leave or arrive there
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceContext {
    pub place_ref: PlaceRefChoice,
    pub dep_arr_time: Option<DateTime<Utc>>,
}

impl PlaceContext {
    /// Context without a time
    #[must_use]
    pub const fn new(place_ref: PlaceRefChoice) -> Self {
        Self {
            place_ref,
            dep_arr_time: None,
        }
    }

    /// Context with a departure or arrival time
    #[must_use]
    pub const fn at(place_ref: PlaceRefChoice, time: DateTime<Utc>) -> Self {
        Self {
            place_ref,
            dep_arr_time: Some(time),
        }
    }
}

impl FromXml for PlaceContext {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            place_ref: node.decode_required("PlaceRef")?,
            dep_arr_time: node.child_timestamp("DepArrTime")?,
        })
    }
}

impl ToXml for PlaceContext {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.write("PlaceRef", &self.place_ref)?;
            w.optional_timestamp("DepArrTime", self.dep_arr_time.as_ref())
        })
    }
}

/// A place the trip must pass through
#[derive(Debug, Clone, PartialEq)]
pub struct TripVia {
    pub via_point: PlaceRefChoice,
}

impl FromXml for TripVia {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            via_point: node.decode_required("ViaPoint")?,
        })
    }
}

impl ToXml for TripVia {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| w.write("ViaPoint", &self.via_point))
    }
}

/// How many trips to return relative to the requested time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberOfResults {
    /// Trips departing before the requested time
    Before(u32),
    /// Trips departing after the requested time
    After(u32),
    /// At least this many trips, placed by the server
    Minimum(u32),
}

impl NumberOfResults {
    const KEYS: [&'static str; 3] = [
        "NumberOfResultsBefore",
        "NumberOfResultsAfter",
        "NumberOfResults",
    ];

    const VARIANTS: [Variant<Self>; 3] = [
        ("NumberOfResultsBefore", |n| {
            n.parse_required("NumberOfResultsBefore").map(Self::Before)
        }),
        ("NumberOfResultsAfter", |n| {
            n.parse_required("NumberOfResultsAfter").map(Self::After)
        }),
        ("NumberOfResults", |n| n.parse_required("NumberOfResults").map(Self::Minimum)),
    ];

    /// Number of trips asked for, regardless of direction
    #[must_use]
    pub const fn count(&self) -> u32 {
        match self {
            Self::Before(n) | Self::After(n) | Self::Minimum(n) => *n,
        }
    }

    /// Decode the policy present in a params element, if any
    pub fn decode_in(node: &XmlNode) -> Result<Option<Self>, DecodeError> {
        if !any_present(node, &Self::KEYS) {
            return Ok(None);
        }
        decode_choice(node, &Self::VARIANTS).map(Some)
    }

    fn write_fields(&self, w: &mut XmlWriter) -> Result<(), EncodeError> {
        match self {
            Self::Before(n) => w.display(Self::KEYS[0], n),
            Self::After(n) => w.display(Self::KEYS[1], n),
            Self::Minimum(n) => w.display(Self::KEYS[2], n),
        }
    }
}

/// Include or exclude public transport modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeFilter {
    pub exclude: bool,
    pub pt_modes: Vec<PtMode>,
}

impl FromXml for ModeFilter {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            exclude: node.child_bool("Exclude")?.unwrap_or(false),
            pt_modes: node
                .children("PtMode")
                .map(XmlNode::parse_text)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl ToXml for ModeFilter {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.display("Exclude", &self.exclude)?;
            for mode in &self.pt_modes {
                w.display("PtMode", mode)?;
            }
            Ok(())
        })
    }
}

/// Parameters of a trip request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripParams {
    pub mode_filter: Option<ModeFilter>,
    pub number_of_results: Option<NumberOfResults>,
    pub use_realtime_data: Option<UseRealtimeData>,
    pub transfer_limit: Option<u32>,
    pub include_track_sections: Option<bool>,
    pub include_leg_projection: Option<bool>,
    pub include_intermediate_stops: Option<bool>,
    pub include_fare: Option<bool>,
}

impl TripParams {
    /// Parameters for a regular trip search
    #[must_use]
    pub fn new(number_of_results: NumberOfResults) -> Self {
        Self {
            number_of_results: Some(number_of_results),
            use_realtime_data: Some(UseRealtimeData::Explanatory),
            include_track_sections: Some(false),
            include_leg_projection: Some(false),
            include_intermediate_stops: Some(true),
            ..Self::default()
        }
    }

    /// Only the result policy, everything else left to the server
    #[must_use]
    pub fn minimal(number_of_results: NumberOfResults) -> Self {
        Self {
            number_of_results: Some(number_of_results),
            ..Self::default()
        }
    }
}

impl FromXml for TripParams {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            mode_filter: node.decode_child("ModeAndModeOfOperationFilter")?,
            number_of_results: NumberOfResults::decode_in(node)?,
            use_realtime_data: node.parse_child("UseRealtimeData")?,
            transfer_limit: node.parse_child("TransferLimit")?,
            include_track_sections: node.child_bool("IncludeTrackSections")?,
            include_leg_projection: node.child_bool("IncludeLegProjection")?,
            include_intermediate_stops: node.child_bool("IncludeIntermediateStops")?,
            include_fare: node.child_bool("IncludeFare")?,
        })
    }
}

impl ToXml for TripParams {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.optional("ModeAndModeOfOperationFilter", self.mode_filter.as_ref())?;
            if let Some(policy) = &self.number_of_results {
                policy.write_fields(w)?;
            }
            w.optional_display("UseRealtimeData", self.use_realtime_data.as_ref())?;
            w.optional_display("TransferLimit", self.transfer_limit.as_ref())?;
            w.optional_bool("IncludeTrackSections", self.include_track_sections)?;
            w.optional_bool("IncludeLegProjection", self.include_leg_projection)?;
            w.optional_bool("IncludeIntermediateStops", self.include_intermediate_stops)?;
            w.optional_bool("IncludeFare", self.include_fare)
        })
    }
}

/// `OJPTripRequest`
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub request_timestamp: DateTime<Utc>,
    pub origin: PlaceContext,
    pub destination: PlaceContext,
    pub via: Vec<TripVia>,
    pub params: Option<TripParams>,
}

impl FromXml for TripRequest {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            request_timestamp: node.required_timestamp("RequestTimestamp")?,
            origin: node.decode_required("Origin")?,
            destination: node.decode_required("Destination")?,
            via: node.decode_all("Via")?,
            params: node.decode_child("Params")?,
        })
    }
}

impl ToXml for TripRequest {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.timestamp("RequestTimestamp", &self.request_timestamp)?;
            w.write("Origin", &self.origin)?;
            w.write("Destination", &self.destination)?;
            w.each("Via", &self.via)?;
            w.optional("Params", self.params.as_ref())
        })
    }
}

/// `OJPTripDelivery`
#[derive(Debug, Clone, PartialEq)]
pub struct TripDelivery {
    pub header: DeliveryHeader,
    pub context: Option<ResponseContext>,
    pub trip_results: Vec<TripResult>,
}

impl FromXml for TripDelivery {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            header: DeliveryHeader::read(node)?,
            context: node.decode_child("TripResponseContext")?,
            trip_results: node.decode_all("TripResult")?,
        })
    }
}

impl ToXml for TripDelivery {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            self.header.write_fields(w)?;
            w.optional("TripResponseContext", self.context.as_ref())?;
            w.each("TripResult", &self.trip_results)
        })
    }
}

/// Parameters of a trip refine request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripRefineParams {
    pub include_track_sections: Option<bool>,
    pub include_leg_projection: Option<bool>,
    pub include_intermediate_stops: Option<bool>,
    pub use_realtime_data: Option<UseRealtimeData>,
}

impl FromXml for TripRefineParams {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            include_track_sections: node.child_bool("IncludeTrackSections")?,
            include_leg_projection: node.child_bool("IncludeLegProjection")?,
            include_intermediate_stops: node.child_bool("IncludeIntermediateStops")?,
            use_realtime_data: node.parse_child("UseRealtimeData")?,
        })
    }
}

impl ToXml for TripRefineParams {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.optional_bool("IncludeTrackSections", self.include_track_sections)?;
            w.optional_bool("IncludeLegProjection", self.include_leg_projection)?;
            w.optional_bool("IncludeIntermediateStops", self.include_intermediate_stops)?;
            w.optional_display("UseRealtimeData", self.use_realtime_data.as_ref())
        })
    }
}

/// `OJPTripRefineRequest`, re-asks the server about a trip it returned earlier
#[derive(Debug, Clone, PartialEq)]
pub struct TripRefineRequest {
    pub request_timestamp: DateTime<Utc>,
    pub refine_params: Option<TripRefineParams>,
    pub trip_result: TripResult,
}

impl FromXml for TripRefineRequest {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            request_timestamp: node.required_timestamp("RequestTimestamp")?,
            refine_params: node.decode_child("RefineParams")?,
            trip_result: node.decode_required("TripResult")?,
        })
    }
}

impl ToXml for TripRefineRequest {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.timestamp("RequestTimestamp", &self.request_timestamp)?;
            w.optional("RefineParams", self.refine_params.as_ref())?;
            w.write("TripResult", &self.trip_result)
        })
    }
}

/// `OJPTripRefineDelivery`
#[derive(Debug, Clone, PartialEq)]
pub struct TripRefineDelivery {
    pub header: DeliveryHeader,
    pub context: Option<ResponseContext>,
    pub trip_results: Vec<TripResult>,
}

impl FromXml for TripRefineDelivery {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            header: DeliveryHeader::read(node)?,
            context: node.decode_child("TripResponseContext")?,
            trip_results: node.decode_all("TripResult")?,
        })
    }
}

impl ToXml for TripRefineDelivery {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            self.header.write_fields(w)?;
            w.optional("TripResponseContext", self.context.as_ref())?;
            w.each("TripResult", &self.trip_results)
        })
    }
}
