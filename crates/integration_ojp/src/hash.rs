//! Content hashing of trips for cross-page deduplication
//!
//! Only fields that describe the journey itself take part. Identifiers the
//! server assigns per response, realtime estimates, estimated quays, realtime
//! flags, fares and distance are left out, so the same journey returned on
//! two pages hashes equal.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::model::{LegType, PlaceRefChoice, StopCall, Trip};

/// BLAKE3 digest of a trip's stable fields
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripHash([u8; 32]);

impl TripHash {
    /// Hash the stable fields of `trip`
    #[must_use]
    pub fn of(trip: &Trip) -> Self {
        let mut hasher = CanonicalHasher::new();
        hasher.time(trip.start_time);
        hasher.time(trip.end_time);
        hasher.duration(trip.duration);
        hasher.field(&trip.transfers.to_string());

        for leg in &trip.legs {
            hasher.duration_opt(leg.duration);
            match &leg.leg_type {
                LegType::Timed(timed) => {
                    hasher.field("timed");
                    hasher.call(&timed.leg_board);
                    hasher.call(&timed.leg_alight);
                    hasher.field(&timed.service.journey_ref);
                    hasher.field(&timed.service.line_ref);
                    hasher.field(&timed.service.published_service_name.text);
                },
                LegType::Transfer(transfer) => {
                    hasher.field("transfer");
                    hasher.place(&transfer.leg_start);
                    hasher.place(&transfer.leg_end);
                    hasher.duration(transfer.duration);
                },
                LegType::Continuous(continuous) => {
                    hasher.field("continuous");
                    hasher.place(&continuous.leg_start);
                    hasher.place(&continuous.leg_end);
                    hasher.field(&continuous.service.personal_mode);
                    hasher.duration(continuous.duration);
                },
            }
        }

        Self(hasher.finish())
    }

    /// Raw digest bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for TripHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripHash({self})")
    }
}

impl fmt::Display for TripHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&blake3::Hash::from(self.0).to_hex()[..16])
    }
}

impl Trip {
    /// Deduplication hash of this trip
    #[must_use]
    pub fn content_hash(&self) -> TripHash {
        TripHash::of(self)
    }
}

struct CanonicalHasher(blake3::Hasher);

impl CanonicalHasher {
    fn new() -> Self {
        Self(blake3::Hasher::new())
    }

    /// Length-prefixed, so field boundaries cannot shift between fields
    fn field(&mut self, value: &str) {
        self.0.update(&(value.len() as u64).to_le_bytes());
        self.0.update(value.as_bytes());
    }

    fn absent(&mut self) {
        self.0.update(&u64::MAX.to_le_bytes());
    }

    fn time(&mut self, value: DateTime<Utc>) {
        self.field(&value.timestamp_millis().to_string());
    }

    fn duration(&mut self, value: Duration) {
        self.field(&value.num_milliseconds().to_string());
    }

    fn duration_opt(&mut self, value: Option<Duration>) {
        match value {
            Some(duration) => self.duration(duration),
            None => self.absent(),
        }
    }

    fn call(&mut self, call: &StopCall) {
        self.field(&call.stop_point_ref);
        for time in [&call.service_arrival, &call.service_departure] {
            match time {
                Some(time) => self.time(time.timetabled_time),
                None => self.absent(),
            }
        }
    }

    fn place(&mut self, place: &PlaceRefChoice) {
        match place {
            PlaceRefChoice::StopPoint { id, .. } | PlaceRefChoice::StopPlace { id, .. } => {
                self.field(id);
            },
            PlaceRefChoice::GeoPosition { position, .. } => {
                self.field(&format!("{:.6},{:.6}", position.longitude, position.latitude));
            },
        }
    }

    fn finish(self) -> [u8; 32] {
        *self.0.finalize().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DatedJourney, InternationalText, Leg, Mode, PtMode, ServiceTime, TimedLeg,
    };
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 13, h, m, 0).unwrap()
    }

    fn trip(id: &str, departure: DateTime<Utc>) -> Trip {
        let mut board = StopCall::new("8507000", "Bern");
        board.service_departure = Some(ServiceTime::timetabled(departure));
        let mut alight = StopCall::new("8503000", "Zürich HB");
        alight.service_arrival = Some(ServiceTime::timetabled(departure + Duration::minutes(56)));
        Trip {
            id: id.to_string(),
            duration: Duration::minutes(56),
            start_time: departure,
            end_time: departure + Duration::minutes(56),
            transfers: 0,
            distance: Some(95_000),
            legs: vec![Leg {
                id: "1".to_string(),
                duration: None,
                leg_type: LegType::Timed(TimedLeg {
                    leg_board: board,
                    leg_intermediates: Vec::new(),
                    leg_alight: alight,
                    service: DatedJourney {
                        operating_day_ref: "2024-05-13".into(),
                        journey_ref: "ch:1:sjyid:100001:1008-001".into(),
                        public_code: None,
                        line_ref: "ch:1:slnid:1".into(),
                        direction_ref: None,
                        mode: Mode::new(PtMode::Rail),
                        product_category: None,
                        published_service_name: InternationalText::new("IC1"),
                        train_number: None,
                        attributes: Vec::new(),
                        origin_text: None,
                        operator_ref: None,
                        destination_text: None,
                        unplanned: None,
                        cancelled: None,
                        deviation: None,
                    },
                }),
            }],
            cancelled: None,
            deviation: None,
        }
    }

    #[test]
    fn identical_content_hashes_equal_despite_ids() {
        let a = trip("ID-A", at(8, 2));
        let b = trip("ID-B", at(8, 2));
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn realtime_annotations_do_not_change_hash() {
        let a = trip("a", at(8, 2));
        let mut b = a.clone();
        if let LegType::Timed(leg) = &mut b.legs[0].leg_type {
            if let Some(departure) = &mut leg.leg_board.service_departure {
                departure.estimated_time = Some(at(8, 5));
            }
            leg.leg_board.estimated_quay = Some(InternationalText::new("7"));
            leg.service.deviation = Some(true);
        }
        b.distance = None;
        b.cancelled = Some(false);
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn different_departure_changes_hash() {
        assert_ne!(
            trip("a", at(8, 2)).content_hash(),
            trip("a", at(8, 32)).content_hash()
        );
    }

    #[test]
    fn different_service_changes_hash() {
        let a = trip("a", at(8, 2));
        let mut b = a.clone();
        if let LegType::Timed(leg) = &mut b.legs[0].leg_type {
            leg.service.journey_ref = "other".into();
        }
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn shifted_field_boundaries_change_hash() {
        let a = trip("a", at(8, 2));
        let mut b = a.clone();
        let mut c = a.clone();
        if let LegType::Timed(leg) = &mut b.legs[0].leg_type {
            leg.service.journey_ref = "J|L".into();
            leg.service.line_ref = "X".into();
        }
        if let LegType::Timed(leg) = &mut c.legs[0].leg_type {
            leg.service.journey_ref = "J".into();
            leg.service.line_ref = "L|X".into();
        }
        assert_ne!(b, c);
        assert_ne!(b.content_hash(), c.content_hash());
    }

    #[test]
    fn missing_time_differs_from_any_value() {
        let a = trip("a", at(8, 2));
        let mut b = a.clone();
        if let LegType::Timed(leg) = &mut b.legs[0].leg_type {
            leg.leg_board.service_arrival = Some(ServiceTime::timetabled(at(8, 0)));
        }
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn display_is_short_hex() {
        let shown = trip("a", at(8, 2)).content_hash().to_string();
        assert_eq!(shown.len(), 16);
        assert!(shown.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
