//! Property-based tests for domain value objects

use domain::{GeoLocation, HasLocation, sort_by_distance};
use proptest::prelude::*;

fn location() -> impl Strategy<Value = GeoLocation> {
    (-90.0f64..=90.0, -180.0f64..=180.0)
        .prop_map(|(lat, lon)| GeoLocation::new_unchecked(lat, lon))
}

proptest! {
    #[test]
    fn valid_coordinates_create_location(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
        let loc = GeoLocation::new(lat, lon);
        prop_assert!(loc.is_ok());
    }

    #[test]
    fn invalid_latitude_rejected(
        lat in prop_oneof![(-1000.0f64..-90.1), (90.1f64..1000.0)],
        lon in -180.0f64..=180.0
    ) {
        prop_assert!(GeoLocation::new(lat, lon).is_err());
    }

    #[test]
    fn distance_to_self_is_zero(loc in location()) {
        prop_assert!(loc.distance_meters(&loc).abs() < 0.001);
    }

    #[test]
    fn distance_is_symmetric(a in location(), b in location()) {
        let ab = a.distance_meters(&b);
        let ba = b.distance_meters(&a);
        prop_assert!((ab - ba).abs() < 0.001);
    }

    #[test]
    fn distance_bounded_by_half_circumference(a in location(), b in location()) {
        let d = a.distance_meters(&b);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= std::f64::consts::PI * 6_371_000.0 + 1.0);
    }

    #[test]
    fn sorted_distances_ascend(
        center in location(),
        points in prop::collection::vec(location(), 0..20)
    ) {
        let sorted = sort_by_distance(points.clone(), &center);
        prop_assert_eq!(sorted.len(), points.len());
        let distances: Vec<f64> = sorted
            .iter()
            .filter_map(HasLocation::location)
            .map(|p| center.distance_meters(&p))
            .collect();
        prop_assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }
}
