//! Element key normalization
//!
//! OJP documents mix two namespaces: the OJP default namespace and the SIRI
//! namespace, bound to the `siri:` prefix. Producers are not consistent about
//! writing that prefix, so every key lookup goes through [`normalize`] and the
//! model only ever deals with canonical (unprefixed) names.

use std::borrow::Cow;

/// Prefix bound to the SIRI namespace
pub const SIRI_PREFIX: &str = "siri:";

/// Elements that live in the SIRI namespace and are written with [`SIRI_PREFIX`]
pub const SIRI_ELEMENTS: &[&str] = &[
    "ServiceRequest",
    "ServiceDelivery",
    "ServiceRequestContext",
    "Language",
    "RequestTimestamp",
    "RequestorRef",
    "ResponseTimestamp",
    "ProducerRef",
    "Status",
    "RequestMessageRef",
    "StopPointRef",
    "Longitude",
    "Latitude",
    "LineRef",
    "DirectionRef",
    "OperatorRef",
    "RailSubmode",
    "BusSubmode",
    "TramSubmode",
    "MetroSubmode",
    "FunicularSubmode",
    "TelecabinSubmode",
    "WaterSubmode",
    "AirSubmode",
];

/// Resolve a wire element name to its canonical key
///
/// Strips [`SIRI_PREFIX`] if present and returns every other key unchanged.
#[must_use]
pub fn normalize(wire_key: &str) -> &str {
    wire_key.trim_start_matches(SIRI_PREFIX)
}

/// Whether a canonical key belongs to the SIRI namespace
#[must_use]
pub fn is_siri_element(key: &str) -> bool {
    SIRI_ELEMENTS.contains(&normalize(key))
}

/// Wire name the encoder writes for a canonical key
#[must_use]
pub fn prefixed(key: &str) -> Cow<'_, str> {
    let key = normalize(key);
    if SIRI_ELEMENTS.contains(&key) {
        Cow::Owned(format!("{SIRI_PREFIX}{key}"))
    } else {
        Cow::Borrowed(key)
    }
}
