//! Query facade, one operation per OJP use case

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::{GeoLocation, sort_by_distance};
use tracing::{debug, instrument, warn};

use crate::codec;
use crate::config::OjpConfig;
use crate::error::OjpError;
use crate::model::{
    DeliveryPayload, GeoRestriction, LocationInformationDelivery, LocationInformationRequest,
    LocationInput, Ojp, PlaceContext, PlaceParam, PlaceRefChoice, PlaceResult,
    PlaceTypeRestriction, RequestPayload, ServiceRequest, StopEventDelivery, StopEventParams,
    StopEventRequest, TripDelivery, TripInfoDelivery, TripInfoParams, TripInfoRequest,
    TripParams, TripRefineDelivery, TripRefineParams, TripRefineRequest, TripRequest, TripResult,
    TripVia,
};
use crate::transport::{HttpTransport, Transport};

/// Whether a trip query's time is a departure or an arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripTime {
    /// Leave the origin at this time
    Departure(DateTime<Utc>),
    /// Reach the destination by this time
    Arrival(DateTime<Utc>),
}

/// Caller-side description of a trip search
#[derive(Debug, Clone, PartialEq)]
pub struct TripQuery {
    pub origin: PlaceRefChoice,
    pub destination: PlaceRefChoice,
    pub via: Vec<PlaceRefChoice>,
    pub time: TripTime,
    pub params: TripParams,
}

impl TripQuery {
    /// Trips leaving `origin` at `departure`
    #[must_use]
    pub fn departing(
        origin: PlaceRefChoice,
        destination: PlaceRefChoice,
        departure: DateTime<Utc>,
        params: TripParams,
    ) -> Self {
        Self {
            origin,
            destination,
            via: Vec::new(),
            time: TripTime::Departure(departure),
            params,
        }
    }

    /// Same query with another time
    #[must_use]
    pub fn at(&self, time: TripTime) -> Self {
        Self {
            time,
            ..self.clone()
        }
    }

    /// Build the wire request
    #[must_use]
    pub fn to_request(&self, request_timestamp: DateTime<Utc>) -> TripRequest {
        let (origin_time, destination_time) = match self.time {
            TripTime::Departure(time) => (Some(time), None),
            TripTime::Arrival(time) => (None, Some(time)),
        };
        TripRequest {
            request_timestamp,
            origin: PlaceContext {
                place_ref: self.origin.clone(),
                dep_arr_time: origin_time,
            },
            destination: PlaceContext {
                place_ref: self.destination.clone(),
                dep_arr_time: destination_time,
            },
            via: self
                .via
                .iter()
                .map(|via_point| TripVia {
                    via_point: via_point.clone(),
                })
                .collect(),
            params: Some(self.params.clone()),
        }
    }
}

/// OJP client
///
/// Each operation builds a request stamped with the current time and the
/// configured requestor, sends it through the [`Transport`] and unwraps the
/// one delivery it expects. Nothing is retried.
#[derive(Clone)]
pub struct OjpClient {
    transport: Arc<dyn Transport>,
    config: OjpConfig,
}

impl std::fmt::Debug for OjpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OjpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OjpClient {
    /// Create a client talking HTTP to the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: OjpConfig) -> Result<Self, OjpError> {
        config.validate().map_err(OjpError::InvalidConfig)?;
        let transport = HttpTransport::new(&config)
            .map_err(|e| OjpError::InvalidConfig(e.to_string()))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client on top of any transport
    #[must_use]
    pub fn with_transport(config: OjpConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &OjpConfig {
        &self.config
    }

    /// Send one request payload and return the delivery it produced
    ///
    /// Shared by every operation below.
    #[instrument(skip(self, payload), fields(request = payload.tag()))]
    pub async fn fetch(&self, payload: RequestPayload) -> Result<DeliveryPayload, OjpError> {
        let envelope = Ojp::request(ServiceRequest {
            language: Some(self.config.language.clone()),
            request_timestamp: Utc::now(),
            requestor_ref: self.config.requestor_ref.clone(),
            payload,
        });
        let body = codec::encode(&envelope)?;

        let response = self.transport.send(body).await?;
        if !response.is_success() {
            warn!(status = response.status, "OJP endpoint returned an error status");
            return Err(OjpError::UnexpectedHttpStatus(response.status));
        }

        let delivery = codec::decode_delivery(&response.body)?;
        debug!(delivery = delivery.delivery.tag(), "OJP delivery decoded");
        Ok(delivery.delivery)
    }

    /// Generic place search
    #[instrument(skip(self))]
    pub async fn place_results(
        &self,
        input: LocationInput,
        restrictions: Option<PlaceParam>,
    ) -> Result<LocationInformationDelivery, OjpError> {
        let request = LocationInformationRequest {
            request_timestamp: Utc::now(),
            input,
            restrictions,
        };
        match self
            .fetch(RequestPayload::LocationInformation(request))
            .await?
        {
            DeliveryPayload::LocationInformation(delivery) => Ok(delivery),
            other => Err(unexpected(&other)),
        }
    }

    /// Places whose name matches `name`
    #[instrument(skip(self))]
    pub async fn places_by_name(
        &self,
        name: &str,
        types: &[PlaceTypeRestriction],
        limit: u32,
    ) -> Result<Vec<PlaceResult>, OjpError> {
        let delivery = self
            .place_results(
                LocationInput::name(name),
                Some(PlaceParam::new(types.to_vec(), limit)),
            )
            .await?;
        debug!(count = delivery.place_results.len(), "Places found by name");
        Ok(delivery.place_results)
    }

    /// Places within `radius_m` meters of `center`, nearest first
    #[instrument(skip(self))]
    pub async fn places_near(
        &self,
        center: GeoLocation,
        radius_m: f64,
        types: &[PlaceTypeRestriction],
        limit: u32,
    ) -> Result<Vec<PlaceResult>, OjpError> {
        let restriction = GeoRestriction::Circle {
            center: center.into(),
            radius: radius_m,
        };
        let delivery = self
            .place_results(
                LocationInput::area(restriction),
                Some(PlaceParam::new(types.to_vec(), limit)),
            )
            .await?;
        debug!(count = delivery.place_results.len(), "Places found nearby");
        Ok(sort_by_distance(delivery.place_results, &center))
    }

    /// Trip search
    #[instrument(skip(self, query))]
    pub async fn trips(&self, query: &TripQuery) -> Result<TripDelivery, OjpError> {
        let request = query.to_request(Utc::now());
        match self.fetch(RequestPayload::Trip(request)).await? {
            DeliveryPayload::Trip(delivery) => {
                debug!(count = delivery.trip_results.len(), "Trips found");
                Ok(delivery)
            },
            other => Err(unexpected(&other)),
        }
    }

    /// Ask the server to update a trip it returned earlier
    #[instrument(skip(self, trip_result), fields(trip = %trip_result.id))]
    pub async fn refine_trip(
        &self,
        trip_result: TripResult,
        params: Option<TripRefineParams>,
    ) -> Result<TripRefineDelivery, OjpError> {
        let request = TripRefineRequest {
            request_timestamp: Utc::now(),
            refine_params: params,
            trip_result,
        };
        match self.fetch(RequestPayload::TripRefine(request)).await? {
            DeliveryPayload::TripRefinement(delivery) => Ok(delivery),
            other => Err(unexpected(&other)),
        }
    }

    /// Calls and service details of one vehicle journey
    #[instrument(skip(self))]
    pub async fn trip_info(
        &self,
        journey_ref: &str,
        operating_day_ref: &str,
        params: Option<TripInfoParams>,
    ) -> Result<TripInfoDelivery, OjpError> {
        let request = TripInfoRequest {
            request_timestamp: Utc::now(),
            journey_ref: journey_ref.to_string(),
            operating_day_ref: operating_day_ref.to_string(),
            params,
        };
        match self.fetch(RequestPayload::TripInfo(request)).await? {
            DeliveryPayload::TripInfo(delivery) => Ok(delivery),
            other => Err(unexpected(&other)),
        }
    }

    /// Departures or arrivals at a place
    #[instrument(skip(self))]
    pub async fn stop_events(
        &self,
        location: PlaceContext,
        params: Option<StopEventParams>,
    ) -> Result<StopEventDelivery, OjpError> {
        let request = StopEventRequest {
            request_timestamp: Utc::now(),
            location,
            params,
        };
        match self.fetch(RequestPayload::StopEvent(request)).await? {
            DeliveryPayload::StopEvent(delivery) => {
                debug!(count = delivery.results.len(), "Stop events found");
                Ok(delivery)
            },
            other => Err(unexpected(&other)),
        }
    }
}

fn unexpected(delivery: &DeliveryPayload) -> OjpError {
    warn!(received = delivery.tag(), "Response carried a different delivery");
    OjpError::UnexpectedEmpty
}
