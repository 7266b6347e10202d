//! OJP 2.0 message model
//!
//! Every type decodes from and encodes to the element that carries it. Field
//! emission order in each `ToXml` impl follows the schema sequence.

pub mod common;
pub mod envelope;
pub mod location;
pub mod place;
pub mod stop_event;
pub mod trip;
pub mod trip_info;
pub mod trip_request;

pub use common::{
    DeliveryHeader, GeoPosition, InternationalText, Mode, PtMode, ResponseContext, ServiceTime,
    Submode, UseRealtimeData,
};
pub use envelope::{
    DeliveryPayload, OJP_NAMESPACE, OJP_VERSION, Ojp, OjpRequest, OjpResponse, RequestPayload,
    SIRI_NAMESPACE, ServiceDelivery, ServiceRequest,
};
pub use location::{
    GeoRestriction, InitialInput, LocationInformationDelivery, LocationInformationRequest,
    LocationInput, PlaceParam, PlaceTypeRestriction,
};
pub use place::{
    Address, Place, PlaceRefChoice, PlaceResult, PlaceType, StopPlace, StopPoint,
    TopographicPlace,
};
pub use stop_event::{
    StopEvent, StopEventDelivery, StopEventParams, StopEventRequest, StopEventResult,
    StopEventType,
};
pub use trip::{
    ContinuousLeg, ContinuousService, DatedJourney, FareProduct, Leg, LegType, ProductCategory,
    ServiceAttribute, StopCall, TimedLeg, TransferLeg, TransferType, Trip, TripFareResult,
    TripResult, TripSummary, TripType,
};
pub use trip_info::{TripInfoDelivery, TripInfoParams, TripInfoRequest, TripInfoResult};
pub use trip_request::{
    ModeFilter, NumberOfResults, PlaceContext, TripDelivery, TripParams, TripRefineDelivery,
    TripRefineParams, TripRefineRequest, TripRequest, TripVia,
};
