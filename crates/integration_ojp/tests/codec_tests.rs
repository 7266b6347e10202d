//! Codec tests against recorded-style OJP documents

use chrono::{DateTime, TimeZone, Utc};
use domain::{GeoLocation, sort_by_distance};
use integration_ojp::OjpError;
use integration_ojp::codec::{decode, decode_delivery, encode};
use integration_ojp::model::{
    DeliveryPayload, GeoPosition, GeoRestriction, InitialInput, LocationInformationDelivery,
    LocationInformationRequest, LocationInput, ModeFilter, NumberOfResults, Ojp, PlaceContext,
    PlaceParam, PlaceRefChoice, PlaceType, PlaceTypeRestriction, PtMode, RequestPayload,
    ServiceRequest, StopEventDelivery, StopEventParams, StopEventRequest, StopEventType,
    TripDelivery, TripInfoParams, TripInfoRequest, TripParams, TripRefineParams,
    TripRefineRequest, TripRequest, TripVia, UseRealtimeData,
};

const LIR_26: &[u8] = include_bytes!("fixtures/lir_bern_26_places.xml");
const LIR_26_UNPREFIXED: &[u8] = include_bytes!("fixtures/lir_bern_26_places_unprefixed.xml");
const STOP_EVENTS_12: &[u8] = include_bytes!("fixtures/stop_events_12_stations.xml");
const STOP_EVENTS_SINGLE: &[u8] = include_bytes!("fixtures/stop_events_single_stop.xml");
const TRIPS_PAGE_1: &[u8] = include_bytes!("fixtures/trips_page_1.xml");
const TRIPS_PAGE_2: &[u8] = include_bytes!("fixtures/trips_page_2.xml");

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 13, hour, minute, 0).unwrap()
}

fn location_delivery(bytes: &[u8]) -> LocationInformationDelivery {
    match decode_delivery(bytes).unwrap().delivery {
        DeliveryPayload::LocationInformation(delivery) => delivery,
        other => panic!("unexpected delivery {}", other.tag()),
    }
}

fn stop_event_delivery(bytes: &[u8]) -> StopEventDelivery {
    match decode_delivery(bytes).unwrap().delivery {
        DeliveryPayload::StopEvent(delivery) => delivery,
        other => panic!("unexpected delivery {}", other.tag()),
    }
}

fn trip_delivery(bytes: &[u8]) -> TripDelivery {
    match decode_delivery(bytes).unwrap().delivery {
        DeliveryPayload::Trip(delivery) => delivery,
        other => panic!("unexpected delivery {}", other.tag()),
    }
}

fn wrap(payload: RequestPayload) -> ServiceRequest {
    ServiceRequest {
        language: Some("de".to_string()),
        request_timestamp: at(8, 0),
        requestor_ref: "ojp-client_test".to_string(),
        payload,
    }
}

fn assert_round_trip(request: ServiceRequest) {
    let bytes = encode(&Ojp::request(request.clone())).unwrap();
    let decoded = decode(&bytes).unwrap();
    let service_request = decoded.request.map(|r| r.service_request);
    assert_eq!(service_request.as_ref(), Some(&request));
}

#[test]
fn location_information_requests_round_trip() {
    assert_round_trip(wrap(RequestPayload::LocationInformation(
        LocationInformationRequest {
            request_timestamp: at(8, 0),
            input: LocationInput::name("Bern"),
            restrictions: Some(PlaceParam::new(
                vec![PlaceTypeRestriction::Stop, PlaceTypeRestriction::Address],
                10,
            )),
        },
    )));

    assert_round_trip(wrap(RequestPayload::LocationInformation(
        LocationInformationRequest {
            request_timestamp: at(8, 0),
            input: LocationInput::Initial(InitialInput {
                name: None,
                geo_restriction: Some(GeoRestriction::Rectangle {
                    upper_left: GeoPosition::new(7.43, 46.96),
                    lower_right: GeoPosition::new(7.46, 46.94),
                }),
            }),
            restrictions: None,
        },
    )));

    assert_round_trip(wrap(RequestPayload::LocationInformation(
        LocationInformationRequest {
            request_timestamp: at(8, 0),
            input: LocationInput::PlaceRef(PlaceRefChoice::stop_place("8507000", "Bern")),
            restrictions: None,
        },
    )));
}

#[test]
fn trip_request_round_trips() {
    let params = TripParams {
        mode_filter: Some(ModeFilter {
            exclude: true,
            pt_modes: vec![PtMode::Bus, PtMode::Tram],
        }),
        transfer_limit: Some(2),
        include_fare: Some(true),
        ..TripParams::new(NumberOfResults::Before(4))
    };
    assert_round_trip(wrap(RequestPayload::Trip(TripRequest {
        request_timestamp: at(8, 0),
        origin: PlaceContext::at(PlaceRefChoice::stop_place("8507000", "Bern"), at(8, 0)),
        destination: PlaceContext::new(PlaceRefChoice::geo_position(
            GeoPosition::new(8.540_192, 47.378_177),
            "Zürich HB",
        )),
        via: vec![TripVia {
            via_point: PlaceRefChoice::stop_point("ch:1:sloid:2000:4", "Olten"),
        }],
        params: Some(params),
    })));
}

#[test]
fn trip_refine_request_round_trips() {
    let trip_result = trip_delivery(TRIPS_PAGE_1).trip_results.remove(0);
    assert_round_trip(wrap(RequestPayload::TripRefine(TripRefineRequest {
        request_timestamp: at(8, 0),
        refine_params: Some(TripRefineParams {
            include_intermediate_stops: Some(true),
            use_realtime_data: Some(UseRealtimeData::Full),
            ..TripRefineParams::default()
        }),
        trip_result,
    })));
}

#[test]
fn trip_info_request_round_trips() {
    assert_round_trip(wrap(RequestPayload::TripInfo(TripInfoRequest {
        request_timestamp: at(8, 0),
        journey_ref: "ch:1:sjyid:100001:802-001".to_string(),
        operating_day_ref: "2024-05-13".to_string(),
        params: Some(TripInfoParams::full()),
    })));
}

#[test]
fn stop_event_request_round_trips() {
    assert_round_trip(wrap(RequestPayload::StopEvent(StopEventRequest {
        request_timestamp: at(8, 0),
        location: PlaceContext::at(PlaceRefChoice::stop_place("8507000", "Bern"), at(8, 0)),
        params: Some(StopEventParams::board(StopEventType::Arrival, 12)),
    })));
}

#[test]
fn prefixed_and_unprefixed_documents_decode_identically() {
    assert_eq!(
        decode_delivery(LIR_26).unwrap(),
        decode_delivery(LIR_26_UNPREFIXED).unwrap()
    );
}

#[test]
fn area_search_yields_every_place() {
    let delivery = location_delivery(LIR_26);
    assert_eq!(delivery.place_results.len(), 26);
    assert_eq!(delivery.header.calc_time, Some(42));

    let count = |pred: fn(&PlaceType) -> bool| {
        delivery
            .place_results
            .iter()
            .filter(|r| pred(&r.place.place_type))
            .count()
    };
    assert_eq!(count(|t| matches!(t, PlaceType::StopPlace(_))), 16);
    assert_eq!(count(|t| matches!(t, PlaceType::StopPoint(_))), 5);
    assert_eq!(count(|t| matches!(t, PlaceType::Address(_))), 3);
    assert_eq!(count(|t| matches!(t, PlaceType::TopographicPlace(_))), 2);
}

#[test]
fn nearest_place_to_center() {
    let center = GeoLocation::new(46.948_053, 7.452_138).unwrap();
    let sorted = sort_by_distance(location_delivery(LIR_26).place_results, &center);

    let nearest = &sorted[0];
    assert_eq!(nearest.place.name.text, "Bern (Bern)");
    let meters = center.distance_meters(&nearest.place.geo_position.location());
    assert!(((meters * 10.0).round() / 10.0 - 991.2).abs() < 1e-9, "got {meters}");

    let distances: Vec<f64> = sorted
        .iter()
        .map(|r| center.distance_meters(&r.place.geo_position.location()))
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn stop_events_from_many_stations_form_groups() {
    let delivery = stop_event_delivery(STOP_EVENTS_12);
    assert_eq!(delivery.results.len(), 12);

    let groups = delivery.stop_events_grouped_by_station();
    assert_eq!(groups.len(), 12);
    assert_eq!(groups[0].0, "Bern, Bahnhof");
    assert_eq!(groups[11].0, "Bern, Fischermätteli");
    assert!(!delivery.is_same_stop());
}

#[test]
fn stop_events_from_one_station() {
    let delivery = stop_event_delivery(STOP_EVENTS_SINGLE);
    assert_eq!(delivery.results.len(), 5);
    assert!(delivery.is_same_stop());

    let context = delivery.context.as_ref().unwrap();
    assert!(context.place("8507000").is_some());
}

#[test]
fn shared_trip_hashes_equal_across_pages() {
    let first = trip_delivery(TRIPS_PAGE_1);
    let second = trip_delivery(TRIPS_PAGE_2);
    assert_eq!(first.trip_results.len(), 6);
    assert_eq!(second.trip_results.len(), 7);

    let last = first.trip_results[5].trip().unwrap();
    let shared = second.trip_results[0].trip().unwrap();
    assert_ne!(last.id, shared.id);
    assert_ne!(last, shared);
    assert_eq!(last.content_hash(), shared.content_hash());

    let distinct = second.trip_results[1].trip().unwrap();
    assert_ne!(last.content_hash(), distinct.content_hash());
}

#[test]
fn trip_summaries_are_kept_by_the_codec() {
    let second = trip_delivery(TRIPS_PAGE_2);
    assert!(second.trip_results[6].trip().is_none());
}

#[test]
fn trip_fixture_details() {
    let first = trip_delivery(TRIPS_PAGE_1);
    let trip = first.trip_results[0].trip().unwrap();
    assert_eq!(trip.start_time, at(8, 2));
    assert_eq!(trip.transfers, 0);
    assert_eq!(trip.format_summary(), "08:02 → 08:58 (56m, direct)");

    let with_change = first.trip_results[1].trip().unwrap();
    assert_eq!(with_change.legs.len(), 3);
    assert_eq!(with_change.timed_legs().count(), 2);
    assert_eq!(with_change.format_summary(), "08:32 → 09:34 (1h 2m, 1 transfer)");
}

#[test]
fn delivery_round_trips_through_the_encoder() {
    let original = decode(TRIPS_PAGE_2).unwrap();
    let bytes = encode(&original).unwrap();
    assert_eq!(decode(&bytes).unwrap(), original);
}

#[test]
fn non_xml_is_a_decoding_failure() {
    for body in [
        &b"{\"error\": \"not xml\"}"[..],
        &b"<html><body>Bad Gateway"[..],
        &b""[..],
    ] {
        assert!(matches!(
            decode_delivery(body),
            Err(OjpError::DecodingFailed(_))
        ));
    }
}

#[test]
fn out_of_range_coordinate_is_a_decoding_failure() {
    let body = String::from_utf8_lossy(LIR_26).replacen(
        "<siri:Latitude>46.943100</siri:Latitude>",
        "<siri:Latitude>146.943100</siri:Latitude>",
        1,
    );
    assert!(matches!(
        decode_delivery(body.as_bytes()),
        Err(OjpError::DecodingFailed(_))
    ));
}

#[test]
fn overflowing_duration_is_a_decoding_failure() {
    let body = String::from_utf8_lossy(TRIPS_PAGE_1).replacen(
        "<Duration>PT56M</Duration>",
        "<Duration>PT9223372036854775.999S</Duration>",
        1,
    );
    assert!(matches!(
        decode_delivery(body.as_bytes()),
        Err(OjpError::DecodingFailed(_))
    ));
}
