//! Trip info request and delivery

use chrono::{DateTime, Utc};

use crate::error::{DecodeError, EncodeError};
use crate::model::common::{DeliveryHeader, ResponseContext, UseRealtimeData};
use crate::model::trip::{DatedJourney, StopCall};
use crate::xml::{FromXml, ToXml, XmlNode, XmlWriter};

/// Parameters of a trip info request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripInfoParams {
    pub use_realtime_data: Option<UseRealtimeData>,
    pub include_calls: Option<bool>,
    pub include_position: Option<bool>,
    pub include_service: Option<bool>,
}

impl TripInfoParams {
    /// Ask for calls and service details with explanatory realtime data
    #[must_use]
    pub const fn full() -> Self {
        Self {
            use_realtime_data: Some(UseRealtimeData::Explanatory),
            include_calls: Some(true),
            include_position: Some(false),
            include_service: Some(true),
        }
    }
}

impl FromXml for TripInfoParams {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            use_realtime_data: node.parse_child("UseRealtimeData")?,
            include_calls: node.child_bool("IncludeCalls")?,
            include_position: node.child_bool("IncludePosition")?,
            include_service: node.child_bool("IncludeService")?,
        })
    }
}

impl ToXml for TripInfoParams {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.optional_display("UseRealtimeData", self.use_realtime_data.as_ref())?;
            w.optional_bool("IncludeCalls", self.include_calls)?;
            w.optional_bool("IncludePosition", self.include_position)?;
            w.optional_bool("IncludeService", self.include_service)
        })
    }
}

/// `OJPTripInfoRequest`, looks up one vehicle journey
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripInfoRequest {
    pub request_timestamp: DateTime<Utc>,
    pub journey_ref: String,
    pub operating_day_ref: String,
    pub params: Option<TripInfoParams>,
}

impl FromXml for TripInfoRequest {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            request_timestamp: node.required_timestamp("RequestTimestamp")?,
            journey_ref: node.required_string("JourneyRef")?,
            operating_day_ref: node.required_string("OperatingDayRef")?,
            params: node.decode_child("Params")?,
        })
    }
}

impl ToXml for TripInfoRequest {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.timestamp("RequestTimestamp", &self.request_timestamp)?;
            w.text("JourneyRef", &self.journey_ref)?;
            w.text("OperatingDayRef", &self.operating_day_ref)?;
            w.optional("Params", self.params.as_ref())
        })
    }
}

/// Calls and service details of a vehicle journey
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripInfoResult {
    pub previous_calls: Vec<StopCall>,
    pub onward_calls: Vec<StopCall>,
    pub service: Option<DatedJourney>,
}

impl TripInfoResult {
    /// Every call of the journey in order
    pub fn calls(&self) -> impl Iterator<Item = &StopCall> {
        self.previous_calls.iter().chain(&self.onward_calls)
    }
}

impl FromXml for TripInfoResult {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            previous_calls: node.decode_all("PreviousCall")?,
            onward_calls: node.decode_all("OnwardCall")?,
            service: node.decode_child("Service")?,
        })
    }
}

impl ToXml for TripInfoResult {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.each("PreviousCall", &self.previous_calls)?;
            w.each("OnwardCall", &self.onward_calls)?;
            w.optional("Service", self.service.as_ref())
        })
    }
}

/// `OJPTripInfoDelivery`
#[derive(Debug, Clone, PartialEq)]
pub struct TripInfoDelivery {
    pub header: DeliveryHeader,
    pub context: Option<ResponseContext>,
    pub result: Option<TripInfoResult>,
}

impl FromXml for TripInfoDelivery {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            header: DeliveryHeader::read(node)?,
            context: node.decode_child("TripInfoResponseContext")?,
            result: node.decode_child("TripInfoResult")?,
        })
    }
}

impl ToXml for TripInfoDelivery {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            self.header.write_fields(w)?;
            w.optional("TripInfoResponseContext", self.context.as_ref())?;
            w.optional("TripInfoResult", self.result.as_ref())
        })
    }
}
