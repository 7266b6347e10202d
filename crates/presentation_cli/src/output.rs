//! Plain-text rendering of deliveries

use std::fmt::Write as _;

use domain::{GeoLocation, HasLocation};
use integration_ojp::model::{
    LegType, PlaceResult, StopCall, StopEventDelivery, TripDelivery, TripInfoResult,
};

/// One line per place, with the distance when a reference point is given
pub fn places(results: &[PlaceResult], from: Option<&GeoLocation>) -> String {
    let mut out = String::new();
    for result in results {
        let id = result.place.place_type.reference().unwrap_or("-");
        let _ = write!(out, "{:<40} {id}", result.place.name.text);
        if let (Some(from), Some(at)) = (from, result.location()) {
            let _ = write!(out, "  {:.1} m", from.distance_meters(&at));
        }
        out.push('\n');
    }
    out
}

/// Trip summaries followed by their timed legs
pub fn trips(delivery: &TripDelivery) -> String {
    let mut out = String::new();
    for trip in delivery.trip_results.iter().filter_map(|r| r.trip()) {
        let _ = writeln!(out, "{}", trip.format_summary());
        for leg in &trip.legs {
            match &leg.leg_type {
                LegType::Timed(timed) => {
                    let _ = writeln!(
                        out,
                        "    {:<8} {} {} → {} {}",
                        timed.service.published_service_name.text,
                        hhmm(timed.departure().map(|t| t.timetabled_time)),
                        timed.leg_board.stop_point_name.text,
                        hhmm(timed.arrival().map(|t| t.timetabled_time)),
                        timed.leg_alight.stop_point_name.text,
                    );
                },
                LegType::Transfer(transfer) => {
                    let _ = writeln!(
                        out,
                        "    walk     {} min",
                        transfer.duration.num_minutes()
                    );
                },
                LegType::Continuous(continuous) => {
                    let _ = writeln!(
                        out,
                        "    {:<8} {} → {}",
                        continuous.service.personal_mode,
                        continuous.leg_start.name(),
                        continuous.leg_end.name(),
                    );
                },
            }
        }
    }
    out
}

/// Departure board grouped by station
pub fn stop_events(delivery: &StopEventDelivery) -> String {
    let mut out = String::new();
    let groups = delivery.stop_events_grouped_by_station();
    let show_station = !delivery.is_same_stop();
    for (station, events) in groups {
        if show_station {
            let _ = writeln!(out, "{station}");
        }
        for result in events {
            let event = &result.stop_event;
            let time = event
                .this_call
                .service_departure
                .as_ref()
                .or(event.this_call.service_arrival.as_ref())
                .map(|t| t.best());
            let destination = event
                .service
                .destination_text
                .as_ref()
                .map_or("", |text| text.text.as_str());
            let _ = writeln!(
                out,
                "  {} {:<8} {destination:<30} {}",
                hhmm(time),
                event.service.published_service_name.text,
                event.this_call.quay().map_or("", |quay| quay.text.as_str()),
            );
        }
    }
    out
}

/// Calls of one journey
pub fn trip_info(result: &TripInfoResult) -> String {
    let mut out = String::new();
    if let Some(service) = &result.service {
        let _ = writeln!(
            out,
            "{} ({})",
            service.published_service_name.text, service.journey_ref
        );
    }
    for call in result.calls() {
        let _ = writeln!(out, "  {}", call_line(call));
    }
    out
}

fn call_line(call: &StopCall) -> String {
    format!(
        "{} {} {}",
        hhmm(call.service_arrival.as_ref().map(|t| t.timetabled_time)),
        hhmm(call.service_departure.as_ref().map(|t| t.timetabled_time)),
        call.stop_point_name.text
    )
}

fn hhmm(time: Option<chrono::DateTime<chrono::Utc>>) -> String {
    time.map_or_else(|| "     ".to_string(), |t| t.format("%H:%M").to_string())
}
