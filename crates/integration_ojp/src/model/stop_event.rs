//! Stop event request and delivery (departure and arrival boards)

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{DecodeError, EncodeError};
use crate::model::common::{DeliveryHeader, ResponseContext, UseRealtimeData};
use crate::model::trip::{DatedJourney, StopCall};
use crate::model::trip_request::PlaceContext;
use crate::xml::{FromXml, ToXml, XmlNode, XmlWriter};

/// Which events a board lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopEventType {
    #[default]
    Departure,
    Arrival,
    Both,
}

impl StopEventType {
    /// Wire value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Departure => "departure",
            Self::Arrival => "arrival",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for StopEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StopEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "departure" => Ok(Self::Departure),
            "arrival" => Ok(Self::Arrival),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown stop event type {other:?}")),
        }
    }
}

/// Parameters of a stop event request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopEventParams {
    pub number_of_results: Option<u32>,
    pub stop_event_type: Option<StopEventType>,
    pub include_previous_calls: Option<bool>,
    pub include_onward_calls: Option<bool>,
    pub use_realtime_data: Option<UseRealtimeData>,
}

impl StopEventParams {
    /// Board of `limit` events of one type, without previous or onward calls
    #[must_use]
    pub const fn board(stop_event_type: StopEventType, limit: u32) -> Self {
        Self {
            number_of_results: Some(limit),
            stop_event_type: Some(stop_event_type),
            include_previous_calls: Some(false),
            include_onward_calls: Some(false),
            use_realtime_data: Some(UseRealtimeData::Full),
        }
    }
}

impl FromXml for StopEventParams {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            number_of_results: node.parse_child("NumberOfResults")?,
            stop_event_type: node.parse_child("StopEventType")?,
            include_previous_calls: node.child_bool("IncludePreviousCalls")?,
            include_onward_calls: node.child_bool("IncludeOnwardCalls")?,
            use_realtime_data: node.parse_child("UseRealtimeData")?,
        })
    }
}

impl ToXml for StopEventParams {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.optional_display("NumberOfResults", self.number_of_results.as_ref())?;
            w.optional_display("StopEventType", self.stop_event_type.as_ref())?;
            w.optional_bool("IncludePreviousCalls", self.include_previous_calls)?;
            w.optional_bool("IncludeOnwardCalls", self.include_onward_calls)?;
            w.optional_display("UseRealtimeData", self.use_realtime_data.as_ref())
        })
    }
}

/// `OJPStopEventRequest`
#[derive(Debug, Clone, PartialEq)]
pub struct StopEventRequest {
    pub request_timestamp: DateTime<Utc>,
    pub location: PlaceContext,
    pub params: Option<StopEventParams>,
}

impl FromXml for StopEventRequest {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            request_timestamp: node.required_timestamp("RequestTimestamp")?,
            location: node.decode_required("Location")?,
            params: node.decode_child("Params")?,
        })
    }
}

impl ToXml for StopEventRequest {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.timestamp("RequestTimestamp", &self.request_timestamp)?;
            w.write("Location", &self.location)?;
            w.optional("Params", self.params.as_ref())
        })
    }
}

/// Calls are wrapped as `<PreviousCall><CallAtStop>…</CallAtStop></PreviousCall>`
struct CallAtStop<'a>(&'a StopCall);

impl ToXml for CallAtStop<'_> {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| w.write("CallAtStop", self.0))
    }
}

fn decode_calls(node: &XmlNode, key: &str) -> Result<Vec<StopCall>, DecodeError> {
    node.children(key)
        .map(|call| call.decode_required("CallAtStop"))
        .collect()
}

/// A service calling at the requested stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopEvent {
    pub previous_calls: Vec<StopCall>,
    pub this_call: StopCall,
    pub onward_calls: Vec<StopCall>,
    pub service: DatedJourney,
}

impl FromXml for StopEvent {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            previous_calls: decode_calls(node, "PreviousCall")?,
            this_call: node.require("ThisCall")?.decode_required("CallAtStop")?,
            onward_calls: decode_calls(node, "OnwardCall")?,
            service: node.decode_required("Service")?,
        })
    }
}

impl ToXml for StopEvent {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            for call in &self.previous_calls {
                w.write("PreviousCall", &CallAtStop(call))?;
            }
            w.write("ThisCall", &CallAtStop(&self.this_call))?;
            for call in &self.onward_calls {
                w.write("OnwardCall", &CallAtStop(call))?;
            }
            w.write("Service", &self.service)
        })
    }
}

/// One entry of a stop event delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopEventResult {
    pub id: String,
    pub stop_event: StopEvent,
}

impl FromXml for StopEventResult {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            id: node.required_string("Id")?,
            stop_event: node.decode_required("StopEvent")?,
        })
    }
}

impl ToXml for StopEventResult {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("Id", &self.id)?;
            w.write("StopEvent", &self.stop_event)
        })
    }
}

/// `OJPStopEventDelivery`
#[derive(Debug, Clone, PartialEq)]
pub struct StopEventDelivery {
    pub header: DeliveryHeader,
    pub context: Option<ResponseContext>,
    pub results: Vec<StopEventResult>,
}

impl StopEventDelivery {
    /// Results grouped by the name of the stop they call at, in first-seen order
    ///
    /// A station search can return events from several platforms of the same
    /// station; they share a stop point name and end up in one group.
    #[must_use]
    pub fn stop_events_grouped_by_station(&self) -> Vec<(String, Vec<&StopEventResult>)> {
        let mut groups: Vec<(String, Vec<&StopEventResult>)> = Vec::new();
        for result in &self.results {
            let station = &result.stop_event.this_call.stop_point_name.text;
            match groups.iter_mut().find(|(name, _)| name == station) {
                Some((_, members)) => members.push(result),
                None => groups.push((station.clone(), vec![result])),
            }
        }
        groups
    }

    /// True when every result calls at the same station
    #[must_use]
    pub fn is_same_stop(&self) -> bool {
        self.stop_events_grouped_by_station().len() <= 1
    }
}

impl FromXml for StopEventDelivery {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            header: DeliveryHeader::read(node)?,
            context: node.decode_child("StopEventResponseContext")?,
            results: node.decode_all("StopEventResult")?,
        })
    }
}

impl ToXml for StopEventDelivery {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            self.header.write_fields(w)?;
            w.optional("StopEventResponseContext", self.context.as_ref())?;
            w.each("StopEventResult", &self.results)
        })
    }
}
