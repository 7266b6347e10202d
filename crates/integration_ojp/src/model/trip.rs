//! Trips, legs and the calls they are made of

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use crate::error::{DecodeError, EncodeError};
use crate::model::common::{InternationalText, Mode, ServiceTime};
use crate::model::place::PlaceRefChoice;
use crate::xml::choice::{Variant, decode_choice, variant_child};
use crate::xml::{FromXml, ToXml, XmlNode, XmlWriter};

/// A service calling at a stop point
///
/// Shared by `LegBoard`, `LegIntermediate`, `LegAlight` and the calls of
/// stop events and trip info results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopCall {
    pub stop_point_ref: String,
    pub stop_point_name: InternationalText,
    pub planned_quay: Option<InternationalText>,
    pub estimated_quay: Option<InternationalText>,
    pub service_arrival: Option<ServiceTime>,
    pub service_departure: Option<ServiceTime>,
    pub order: Option<u32>,
    pub request_stop: Option<bool>,
    pub unplanned_stop: Option<bool>,
    pub not_serviced_stop: Option<bool>,
}

impl StopCall {
    /// A call with only its stop set
    pub fn new(stop_point_ref: impl Into<String>, stop_point_name: impl Into<String>) -> Self {
        Self {
            stop_point_ref: stop_point_ref.into(),
            stop_point_name: InternationalText::new(stop_point_name),
            planned_quay: None,
            estimated_quay: None,
            service_arrival: None,
            service_departure: None,
            order: None,
            request_stop: None,
            unplanned_stop: None,
            not_serviced_stop: None,
        }
    }

    /// Quay the service actually uses, falling back to the planned one
    #[must_use]
    pub fn quay(&self) -> Option<&InternationalText> {
        self.estimated_quay.as_ref().or(self.planned_quay.as_ref())
    }
}

impl FromXml for StopCall {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            stop_point_ref: node.required_string("StopPointRef")?,
            stop_point_name: node.decode_required("StopPointName")?,
            planned_quay: node.decode_child("PlannedQuay")?,
            estimated_quay: node.decode_child("EstimatedQuay")?,
            service_arrival: node.decode_child("ServiceArrival")?,
            service_departure: node.decode_child("ServiceDeparture")?,
            order: node.parse_child("Order")?,
            request_stop: node.child_bool("RequestStop")?,
            unplanned_stop: node.child_bool("UnplannedStop")?,
            not_serviced_stop: node.child_bool("NotServicedStop")?,
        })
    }
}

impl ToXml for StopCall {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("StopPointRef", &self.stop_point_ref)?;
            w.write("StopPointName", &self.stop_point_name)?;
            w.optional("PlannedQuay", self.planned_quay.as_ref())?;
            w.optional("EstimatedQuay", self.estimated_quay.as_ref())?;
            w.optional("ServiceArrival", self.service_arrival.as_ref())?;
            w.optional("ServiceDeparture", self.service_departure.as_ref())?;
            w.optional_display("Order", self.order.as_ref())?;
            w.optional_bool("RequestStop", self.request_stop)?;
            w.optional_bool("UnplannedStop", self.unplanned_stop)?;
            w.optional_bool("NotServicedStop", self.not_serviced_stop)
        })
    }
}

/// Product category of a service (`IC`, `S`, `B`…)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCategory {
    pub name: Option<InternationalText>,
    pub short_name: Option<InternationalText>,
    pub product_category_ref: Option<String>,
}

impl FromXml for ProductCategory {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            name: node.decode_child("Name")?,
            short_name: node.decode_child("ShortName")?,
            product_category_ref: node.optional_string("ProductCategoryRef"),
        })
    }
}

impl ToXml for ProductCategory {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.optional("Name", self.name.as_ref())?;
            w.optional("ShortName", self.short_name.as_ref())?;
            w.optional_text("ProductCategoryRef", self.product_category_ref.as_deref())
        })
    }
}

/// Service attribute such as "bicycles carried"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAttribute {
    pub user_text: InternationalText,
    pub code: String,
}

impl FromXml for ServiceAttribute {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            user_text: node.decode_required("UserText")?,
            code: node.required_string("Code")?,
        })
    }
}

impl ToXml for ServiceAttribute {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.write("UserText", &self.user_text)?;
            w.text("Code", &self.code)
        })
    }
}

/// A vehicle journey on one operating day (`Service`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedJourney {
    pub operating_day_ref: String,
    pub journey_ref: String,
    pub public_code: Option<String>,
    pub line_ref: String,
    pub direction_ref: Option<String>,
    pub mode: Mode,
    pub product_category: Option<ProductCategory>,
    pub published_service_name: InternationalText,
    pub train_number: Option<String>,
    pub attributes: Vec<ServiceAttribute>,
    pub origin_text: Option<InternationalText>,
    pub operator_ref: Option<String>,
    pub destination_text: Option<InternationalText>,
    pub unplanned: Option<bool>,
    pub cancelled: Option<bool>,
    pub deviation: Option<bool>,
}

impl FromXml for DatedJourney {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            operating_day_ref: node.required_string("OperatingDayRef")?,
            journey_ref: node.required_string("JourneyRef")?,
            public_code: node.optional_string("PublicCode"),
            line_ref: node.required_string("LineRef")?,
            direction_ref: node.optional_string("DirectionRef"),
            mode: node.decode_required("Mode")?,
            product_category: node.decode_child("ProductCategory")?,
            published_service_name: node.decode_required("PublishedServiceName")?,
            train_number: node.optional_string("TrainNumber"),
            attributes: node.decode_all("Attribute")?,
            origin_text: node.decode_child("OriginText")?,
            operator_ref: node.optional_string("OperatorRef"),
            destination_text: node.decode_child("DestinationText")?,
            unplanned: node.child_bool("Unplanned")?,
            cancelled: node.child_bool("Cancelled")?,
            deviation: node.child_bool("Deviation")?,
        })
    }
}

impl ToXml for DatedJourney {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("OperatingDayRef", &self.operating_day_ref)?;
            w.text("JourneyRef", &self.journey_ref)?;
            w.optional_text("PublicCode", self.public_code.as_deref())?;
            w.text("LineRef", &self.line_ref)?;
            w.optional_text("DirectionRef", self.direction_ref.as_deref())?;
            w.write("Mode", &self.mode)?;
            w.optional("ProductCategory", self.product_category.as_ref())?;
            w.write("PublishedServiceName", &self.published_service_name)?;
            w.optional_text("TrainNumber", self.train_number.as_deref())?;
            w.each("Attribute", &self.attributes)?;
            w.optional("OriginText", self.origin_text.as_ref())?;
            w.optional_text("OperatorRef", self.operator_ref.as_deref())?;
            w.optional("DestinationText", self.destination_text.as_ref())?;
            w.optional_bool("Unplanned", self.unplanned)?;
            w.optional_bool("Cancelled", self.cancelled)?;
            w.optional_bool("Deviation", self.deviation)
        })
    }
}

/// A ride on a scheduled public transport service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedLeg {
    pub leg_board: StopCall,
    pub leg_intermediates: Vec<StopCall>,
    pub leg_alight: StopCall,
    pub service: DatedJourney,
}

impl TimedLeg {
    /// Timetabled departure at the boarding stop
    #[must_use]
    pub fn departure(&self) -> Option<&ServiceTime> {
        self.leg_board.service_departure.as_ref()
    }

    /// Timetabled arrival at the alighting stop
    #[must_use]
    pub fn arrival(&self) -> Option<&ServiceTime> {
        self.leg_alight.service_arrival.as_ref()
    }
}

impl FromXml for TimedLeg {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        let leg_board: StopCall = node.decode_required("LegBoard")?;
        if leg_board.service_departure.is_none() {
            return Err(DecodeError::missing("LegBoard", "ServiceDeparture"));
        }
        let leg_alight: StopCall = node.decode_required("LegAlight")?;
        if leg_alight.service_arrival.is_none() {
            return Err(DecodeError::missing("LegAlight", "ServiceArrival"));
        }
        Ok(Self {
            leg_board,
            leg_intermediates: node.decode_all("LegIntermediate")?,
            leg_alight,
            service: node.decode_required("Service")?,
        })
    }
}

impl ToXml for TimedLeg {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.write("LegBoard", &self.leg_board)?;
            w.each("LegIntermediate", &self.leg_intermediates)?;
            w.write("LegAlight", &self.leg_alight)?;
            w.write("Service", &self.service)
        })
    }
}

/// How a transfer between two services is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferType {
    Walk,
    ShuttleBus,
    Taxi,
    ProtectedConnection,
    GuaranteedConnection,
    RemainInVehicle,
    ChangeWithinVehicle,
    CheckIn,
    CheckOut,
}

impl TransferType {
    const ALL_TYPES: [Self; 9] = [
        Self::Walk,
        Self::ShuttleBus,
        Self::Taxi,
        Self::ProtectedConnection,
        Self::GuaranteedConnection,
        Self::RemainInVehicle,
        Self::ChangeWithinVehicle,
        Self::CheckIn,
        Self::CheckOut,
    ];

    /// Wire value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::ShuttleBus => "shuttleBus",
            Self::Taxi => "taxi",
            Self::ProtectedConnection => "protectedConnection",
            Self::GuaranteedConnection => "guaranteedConnection",
            Self::RemainInVehicle => "remainInVehicle",
            Self::ChangeWithinVehicle => "changeWithinVehicle",
            Self::CheckIn => "checkIn",
            Self::CheckOut => "checkOut",
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_TYPES
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown transfer type {s:?}"))
    }
}

/// A change between two timed legs
#[derive(Debug, Clone, PartialEq)]
pub struct TransferLeg {
    pub transfer_types: Vec<TransferType>,
    pub leg_start: PlaceRefChoice,
    pub leg_end: PlaceRefChoice,
    pub duration: Duration,
}

impl FromXml for TransferLeg {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        let transfer_types: Vec<TransferType> = node
            .children("TransferType")
            .map(XmlNode::parse_text)
            .collect::<Result<_, _>>()?;
        if transfer_types.is_empty() {
            return Err(DecodeError::missing(node.key(), "TransferType"));
        }
        Ok(Self {
            transfer_types,
            leg_start: node.decode_required("LegStart")?,
            leg_end: node.decode_required("LegEnd")?,
            duration: node.required_duration("Duration")?,
        })
    }
}

impl ToXml for TransferLeg {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            for transfer_type in &self.transfer_types {
                w.display("TransferType", transfer_type)?;
            }
            w.write("LegStart", &self.leg_start)?;
            w.write("LegEnd", &self.leg_end)?;
            w.duration("Duration", &self.duration)
        })
    }
}

/// Individual transport used for a continuous leg (`foot`, `bicycle`…)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuousService {
    pub personal_mode: String,
    pub personal_mode_of_operation: Option<String>,
}

impl FromXml for ContinuousService {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            personal_mode: node.required_string("PersonalMode")?,
            personal_mode_of_operation: node.optional_string("PersonalModeOfOperation"),
        })
    }
}

impl ToXml for ContinuousService {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("PersonalMode", &self.personal_mode)?;
            w.optional_text(
                "PersonalModeOfOperation",
                self.personal_mode_of_operation.as_deref(),
            )
        })
    }
}

/// A leg not bound to a timetable (walking to the first stop, cycling…)
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousLeg {
    pub leg_start: PlaceRefChoice,
    pub leg_end: PlaceRefChoice,
    pub service: ContinuousService,
    pub duration: Duration,
    /// Length in meters
    pub length: Option<u32>,
}

impl FromXml for ContinuousLeg {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            leg_start: node.decode_required("LegStart")?,
            leg_end: node.decode_required("LegEnd")?,
            service: node.decode_required("Service")?,
            duration: node.required_duration("Duration")?,
            length: node.parse_child("Length")?,
        })
    }
}

impl ToXml for ContinuousLeg {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.write("LegStart", &self.leg_start)?;
            w.write("LegEnd", &self.leg_end)?;
            w.write("Service", &self.service)?;
            w.duration("Duration", &self.duration)?;
            w.optional_display("Length", self.length.as_ref())
        })
    }
}

/// What a [`Leg`] is, decided by which element is present
#[derive(Debug, Clone, PartialEq)]
pub enum LegType {
    Continuous(ContinuousLeg),
    Timed(TimedLeg),
    Transfer(TransferLeg),
}

impl LegType {
    /// Candidate shapes in decoding order
    pub const VARIANTS: [Variant<Self>; 3] = [
        ("ContinuousLeg", |n| variant_child(n, "ContinuousLeg").map(Self::Continuous)),
        ("TimedLeg", |n| variant_child(n, "TimedLeg").map(Self::Timed)),
        ("TransferLeg", |n| variant_child(n, "TransferLeg").map(Self::Transfer)),
    ];

    fn write_variant(&self, w: &mut XmlWriter) -> Result<(), EncodeError> {
        match self {
            Self::Continuous(leg) => w.write("ContinuousLeg", leg),
            Self::Timed(leg) => w.write("TimedLeg", leg),
            Self::Transfer(leg) => w.write("TransferLeg", leg),
        }
    }
}

/// One leg of a trip
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub id: String,
    pub duration: Option<Duration>,
    pub leg_type: LegType,
}

impl Leg {
    /// The timed leg, if this leg rides a scheduled service
    #[must_use]
    pub const fn as_timed(&self) -> Option<&TimedLeg> {
        match &self.leg_type {
            LegType::Timed(leg) => Some(leg),
            LegType::Continuous(_) | LegType::Transfer(_) => None,
        }
    }
}

impl FromXml for Leg {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            id: node.required_string("Id")?,
            duration: node.child_duration("Duration")?,
            leg_type: decode_choice(node, &LegType::VARIANTS)?,
        })
    }
}

impl ToXml for Leg {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("Id", &self.id)?;
            w.optional_duration("Duration", self.duration.as_ref())?;
            self.leg_type.write_variant(w)
        })
    }
}

/// A complete itinerary from origin to destination
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: String,
    pub duration: Duration,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub transfers: u32,
    /// Length in meters
    pub distance: Option<u32>,
    pub legs: Vec<Leg>,
    pub cancelled: Option<bool>,
    pub deviation: Option<bool>,
}

impl Trip {
    /// One-line summary such as `08:02 → 09:04 (1h 2m, 1 transfer)`
    #[must_use]
    pub fn format_summary(&self) -> String {
        let minutes = self.duration.num_minutes();
        let duration = if minutes >= 60 {
            format!("{}h {}m", minutes / 60, minutes % 60)
        } else {
            format!("{minutes}m")
        };
        let transfers = match self.transfers {
            0 => "direct".to_string(),
            1 => "1 transfer".to_string(),
            n => format!("{n} transfers"),
        };
        format!(
            "{} → {} ({duration}, {transfers})",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M"),
        )
    }

    /// Timed legs in travel order
    pub fn timed_legs(&self) -> impl Iterator<Item = &TimedLeg> {
        self.legs.iter().filter_map(Leg::as_timed)
    }
}

impl FromXml for Trip {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            id: node.required_string("Id")?,
            duration: node.required_duration("Duration")?,
            start_time: node.required_timestamp("StartTime")?,
            end_time: node.required_timestamp("EndTime")?,
            transfers: node.parse_required("Transfers")?,
            distance: node.parse_child("Distance")?,
            legs: node.decode_all("Leg")?,
            cancelled: node.child_bool("Cancelled")?,
            deviation: node.child_bool("Deviation")?,
        })
    }
}

impl ToXml for Trip {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("Id", &self.id)?;
            w.duration("Duration", &self.duration)?;
            w.timestamp("StartTime", &self.start_time)?;
            w.timestamp("EndTime", &self.end_time)?;
            w.display("Transfers", &self.transfers)?;
            w.optional_display("Distance", self.distance.as_ref())?;
            w.each("Leg", &self.legs)?;
            w.optional_bool("Cancelled", self.cancelled)?;
            w.optional_bool("Deviation", self.deviation)
        })
    }
}

/// Condensed trip returned instead of full legs
#[derive(Debug, Clone, PartialEq)]
pub struct TripSummary {
    pub id: String,
    pub origin: PlaceRefChoice,
    pub destination: PlaceRefChoice,
    pub duration: Option<Duration>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub transfers: Option<u32>,
}

impl FromXml for TripSummary {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            id: node.required_string("Id")?,
            origin: node.decode_required("Origin")?,
            destination: node.decode_required("Destination")?,
            duration: node.child_duration("Duration")?,
            start_time: node.child_timestamp("StartTime")?,
            end_time: node.child_timestamp("EndTime")?,
            transfers: node.parse_child("Transfers")?,
        })
    }
}

impl ToXml for TripSummary {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("Id", &self.id)?;
            w.write("Origin", &self.origin)?;
            w.write("Destination", &self.destination)?;
            w.optional_duration("Duration", self.duration.as_ref())?;
            w.optional_timestamp("StartTime", self.start_time.as_ref())?;
            w.optional_timestamp("EndTime", self.end_time.as_ref())?;
            w.optional_display("Transfers", self.transfers.as_ref())
        })
    }
}

/// A ticket offered for part of a trip
#[derive(Debug, Clone, PartialEq)]
pub struct FareProduct {
    pub id: String,
    pub name: String,
    pub authority_ref: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

impl FromXml for FareProduct {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            id: node.required_string("FareProductId")?,
            name: node.required_string("FareProductName")?,
            authority_ref: node.required_string("FareAuthorityRef")?,
            price: node.parse_child("Price")?,
            currency: node.optional_string("Currency"),
        })
    }
}

impl ToXml for FareProduct {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("FareProductId", &self.id)?;
            w.text("FareProductName", &self.name)?;
            w.text("FareAuthorityRef", &self.authority_ref)?;
            w.optional_display("Price", self.price.as_ref())?;
            w.optional_text("Currency", self.currency.as_deref())
        })
    }
}

/// Fares covering a range of legs
#[derive(Debug, Clone, PartialEq)]
pub struct TripFareResult {
    pub from_leg_id_ref: String,
    pub to_leg_id_ref: String,
    pub products: Vec<FareProduct>,
}

impl FromXml for TripFareResult {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            from_leg_id_ref: node.required_string("FromTripLegIdRef")?,
            to_leg_id_ref: node.required_string("ToTripLegIdRef")?,
            products: node.decode_all("FareProduct")?,
        })
    }
}

impl ToXml for TripFareResult {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("FromTripLegIdRef", &self.from_leg_id_ref)?;
            w.text("ToTripLegIdRef", &self.to_leg_id_ref)?;
            w.each("FareProduct", &self.products)
        })
    }
}

/// Full trip or summary, decided by which element is present
#[derive(Debug, Clone, PartialEq)]
pub enum TripType {
    Trip(Trip),
    TripSummary(TripSummary),
}

impl TripType {
    /// Candidate shapes in decoding order
    pub const VARIANTS: [Variant<Self>; 2] = [
        ("Trip", |n| variant_child(n, "Trip").map(Self::Trip)),
        ("TripSummary", |n| variant_child(n, "TripSummary").map(Self::TripSummary)),
    ];

    fn write_variant(&self, w: &mut XmlWriter) -> Result<(), EncodeError> {
        match self {
            Self::Trip(trip) => w.write("Trip", trip),
            Self::TripSummary(summary) => w.write("TripSummary", summary),
        }
    }
}

/// One result of a trip or trip refine request
#[derive(Debug, Clone, PartialEq)]
pub struct TripResult {
    pub id: String,
    pub trip_type: TripType,
    pub fares: Vec<TripFareResult>,
    pub is_alternative_option: Option<bool>,
}

impl TripResult {
    /// The full trip, if the server returned one
    #[must_use]
    pub const fn trip(&self) -> Option<&Trip> {
        match &self.trip_type {
            TripType::Trip(trip) => Some(trip),
            TripType::TripSummary(_) => None,
        }
    }
}

impl FromXml for TripResult {
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError> {
        Ok(Self {
            id: node.required_string("Id")?,
            trip_type: decode_choice(node, &TripType::VARIANTS)?,
            fares: node.decode_all("TripFare")?,
            is_alternative_option: node.child_bool("IsAlternativeOption")?,
        })
    }
}

impl ToXml for TripResult {
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError> {
        w.element(tag, |w| {
            w.text("Id", &self.id)?;
            self.trip_type.write_variant(w)?;
            w.each("TripFare", &self.fares)?;
            w.optional_bool("IsAlternativeOption", self.is_alternative_option)
        })
    }
}
