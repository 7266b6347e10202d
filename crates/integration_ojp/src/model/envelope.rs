//! The `<OJP>` envelope and the service request/delivery unions it carries

use chrono::{DateTime, Utc};

use crate::error::{DecodeError, EncodeError};
use crate::model::location::{LocationInformationDelivery, LocationInformationRequest};
use crate::model::stop_event::{StopEventDelivery, StopEventRequest};
use crate::model::trip_info::{TripInfoDelivery, TripInfoRequest};
use crate::model::trip_request::{
    TripDelivery, TripRefineDelivery, TripRefineRequest, TripRequest,
};
use crate::xml::choice::{Variant, decode_choice, variant_child};
use crate::xml::{FromXml, ToXml, XmlNode, XmlWriter};

/// Namespace of OJP elements
pub const OJP_NAMESPACE: &str = "http://www.vdv.de/ojp";
/// Namespace bound to the `siri:` prefix
pub const SIRI_NAMESPACE: &str = "http://www.siri.org.uk/siri";
/// Schema version written on the root element
pub const OJP_VERSION: &str = "2.0";

/// The request a service request carries
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    LocationInformation(LocationInformationRequest),
    Trip(TripRequest),
    TripInfo(TripInfoRequest),
    TripRefine(TripRefineRequest),
    StopEvent(StopEventRequest),
}

impl RequestPayload {
    /// Candidate shapes in decoding order
    pub const VARIANTS: [Variant<Self>; 5] = [
        ("OJPLocationInformationRequest", |n| {
            variant_child(n, "OJPLocationInformationRequest").map(Self::LocationInformation)
        }),
        ("OJPTripRequest", |n| variant_child(n, "OJPTripRequest").map(Self::Trip)),
        ("OJPTripInfoRequest", |n| {
            variant_child(n, "OJPTripInfoRequest").map(Self::TripInfo)
        }),
        ("OJPTripRefineRequest", |n| {
            variant_child(n, "OJPTripRefineRequest").map(Self::TripRefine)
        }),
        ("OJPStopEventRequest", |n| {
            variant_child(n, "OJPStopEventRequest").map(Self::StopEvent)
        }),
    ];

    /// Element name of the variant
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::LocationInformation(_) => "OJPLocationInformationRequest",
            Self::Trip(_) => "OJPTripRequest",
            Self::TripInfo(_) => "OJPTripInfoRequest",
            Self::TripRefine(_) => "OJPTripRefineRequest",
            Self::StopEvent(_) => "OJPStopEventRequest",
        }
    }

    fn write_variant(&self, w: &mut XmlWriter) -> Result<(), EncodeError> {
        let tag = self.tag();
        match self {
            Self::LocationInformation(request) => w.write(tag, request),
            Self::Trip(request) => w.write(tag, request),
            Self::TripInfo(request) => w.write(tag, request),
            Self::TripRefine(request) => w.write(tag, request),
            Self::StopEvent(request) => w.write(tag, request),
        }
    }
}

/// `siri:ServiceRequest`
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    /// Preferred response language (`siri:ServiceRequestContext/siri:Language`)
    pub language: Option<String>,
    pub request_timestamp: DateTime<Utc>,
    pub requestor_ref: String,
    pub payload: RequestPayload,
}

impl FromXml for ServiceRequest {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            language: node
                .child("ServiceRequestContext")
                .and_then(|context| context.optional_string("Language")),
            request_timestamp: node.required_timestamp("RequestTimestamp")?,
            requestor_ref: node.required_string("RequestorRef")?,
            payload: decode_choice(node, &RequestPayload::VARIANTS)?,
        })
    }
}

impl ToXml for ServiceRequest {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            if let Some(language) = &self.language {
                w.element("ServiceRequestContext", |w| w.text("Language", language))?;
            }
            w.timestamp("RequestTimestamp", &self.request_timestamp)?;
            w.text("RequestorRef", &self.requestor_ref)?;
            self.payload.write_variant(w)
        })
    }
}

/// The delivery a service delivery carries
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryPayload {
    LocationInformation(LocationInformationDelivery),
    Trip(TripDelivery),
    TripInfo(TripInfoDelivery),
    TripRefinement(TripRefineDelivery),
    StopEvent(StopEventDelivery),
}

impl DeliveryPayload {
    /// Candidate shapes in decoding order
    pub const VARIANTS: [Variant<Self>; 5] = [
        ("OJPLocationInformationDelivery", |n| {
            variant_child(n, "OJPLocationInformationDelivery").map(Self::LocationInformation)
        }),
        ("OJPTripDelivery", |n| variant_child(n, "OJPTripDelivery").map(Self::Trip)),
        ("OJPTripInfoDelivery", |n| {
            variant_child(n, "OJPTripInfoDelivery").map(Self::TripInfo)
        }),
        ("OJPTripRefineDelivery", |n| {
            variant_child(n, "OJPTripRefineDelivery").map(Self::TripRefinement)
        }),
        ("OJPStopEventDelivery", |n| {
            variant_child(n, "OJPStopEventDelivery").map(Self::StopEvent)
        }),
    ];

    /// Element name of the variant
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::LocationInformation(_) => "OJPLocationInformationDelivery",
            Self::Trip(_) => "OJPTripDelivery",
            Self::TripInfo(_) => "OJPTripInfoDelivery",
            Self::TripRefinement(_) => "OJPTripRefineDelivery",
            Self::StopEvent(_) => "OJPStopEventDelivery",
        }
    }

    fn write_variant(&self, w: &mut XmlWriter) -> Result<(), EncodeError> {
        let tag = self.tag();
        match self {
            Self::LocationInformation(delivery) => w.write(tag, delivery),
            Self::Trip(delivery) => w.write(tag, delivery),
            Self::TripInfo(delivery) => w.write(tag, delivery),
            Self::TripRefinement(delivery) => w.write(tag, delivery),
            Self::StopEvent(delivery) => w.write(tag, delivery),
        }
    }
}

/// `siri:ServiceDelivery`
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDelivery {
    pub response_timestamp: DateTime<Utc>,
    pub producer_ref: Option<String>,
    pub delivery: DeliveryPayload,
}

impl FromXml for ServiceDelivery {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            response_timestamp: node.required_timestamp("ResponseTimestamp")?,
            producer_ref: node.optional_string("ProducerRef"),
            delivery: decode_choice(node, &DeliveryPayload::VARIANTS)?,
        })
    }
}

impl ToXml for ServiceDelivery {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.timestamp("ResponseTimestamp", &self.response_timestamp)?;
            w.optional_text("ProducerRef", self.producer_ref.as_deref())?;
            self.delivery.write_variant(w)
        })
    }
}

/// `OJPRequest`
#[derive(Debug, Clone, PartialEq)]
pub struct OjpRequest {
    pub service_request: ServiceRequest,
}

impl FromXml for OjpRequest {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            service_request: node.decode_required("ServiceRequest")?,
        })
    }
}

impl ToXml for OjpRequest {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| w.write("ServiceRequest", &self.service_request))
    }
}

/// `OJPResponse`
#[derive(Debug, Clone, PartialEq)]
pub struct OjpResponse {
    pub service_delivery: ServiceDelivery,
}

impl FromXml for OjpResponse {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            service_delivery: node.decode_required("ServiceDelivery")?,
        })
    }
}

impl ToXml for OjpResponse {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| w.write("ServiceDelivery", &self.service_delivery))
    }
}

/// The document root
///
/// Decoding accepts neither or both sides being present; deciding whether
/// that makes sense is left to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ojp {
    pub request: Option<OjpRequest>,
    pub response: Option<OjpResponse>,
}

impl Ojp {
    /// Envelope carrying a request
    #[must_use]
    pub const fn request(service_request: ServiceRequest) -> Self {
        Self {
            request: Some(OjpRequest { service_request }),
            response: None,
        }
    }

    /// Envelope carrying a response
    #[must_use]
    pub const fn response(service_delivery: ServiceDelivery) -> Self {
        Self {
            request: None,
            response: Some(OjpResponse { service_delivery }),
        }
    }
}

impl FromXml for Ojp {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        if node.key() != "OJP" {
            return Err(DecodeError::UnexpectedRoot(node.name().to_string()));
        }
        Ok(Self {
            request: node.decode_child("OJPRequest")?,
            response: node.decode_child("OJPResponse")?,
        })
    }
}

impl ToXml for Ojp {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        if self.request.is_none() && self.response.is_none() {
            return Err(EncodeError::EmptyEnvelope);
        }
        let attributes = [
            ("xmlns", OJP_NAMESPACE),
            ("xmlns:siri", SIRI_NAMESPACE),
            ("version", OJP_VERSION),
        ];
        w.element_with_attributes(tag, &attributes, |w| {
            w.optional("OJPRequest", self.request.as_ref())?;
            w.optional("OJPResponse", self.response.as_ref())
        })
    }
}
