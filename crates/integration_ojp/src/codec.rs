//! Envelope encoding and decoding
//!
//! The codec is stateless; both entry points may be called concurrently.

use tracing::{debug, trace};

use crate::error::OjpError;
use crate::model::{Ojp, ServiceDelivery, ServiceRequest};
use crate::xml::{FromXml, ToXml, XmlNode, XmlWriter};

/// Serialize an envelope, including the XML declaration
pub fn encode(envelope: &Ojp) -> Result<Vec<u8>, OjpError> {
    let mut w = XmlWriter::new();
    w.declaration()?;
    envelope.to_xml(&mut w, "OJP")?;
    let bytes = w.into_bytes();
    trace!(bytes = bytes.len(), "Encoded OJP envelope");
    Ok(bytes)
}

/// Serialize a service request wrapped in its envelope
pub fn encode_request(request: &ServiceRequest) -> Result<Vec<u8>, OjpError> {
    encode(&Ojp::request(request.clone()))
}

/// Parse an envelope
///
/// Any parse or shape failure is reported as [`OjpError::DecodingFailed`].
pub fn decode(bytes: &[u8]) -> Result<Ojp, OjpError> {
    let root = XmlNode::parse(bytes)?;
    let envelope = Ojp::from_xml(&root)?;
    debug!(
        has_request = envelope.request.is_some(),
        has_response = envelope.response.is_some(),
        "Decoded OJP envelope"
    );
    Ok(envelope)
}

/// Parse an envelope that must carry a service delivery
pub fn decode_delivery(bytes: &[u8]) -> Result<ServiceDelivery, OjpError> {
    decode(bytes)?
        .response
        .map(|response| response.service_delivery)
        .ok_or(OjpError::UnexpectedEmpty)
}
