//! Ordering of located items by distance from a point

use crate::value_objects::GeoLocation;

/// Anything that may sit at a geographic position
pub trait HasLocation {
    /// Position of the item, if known
    fn location(&self) -> Option<GeoLocation>;
}

impl HasLocation for GeoLocation {
    fn location(&self) -> Option<GeoLocation> {
        Some(*self)
    }
}

/// Sort `items` by ascending distance from `from`
///
/// The sort is stable. Items without a position keep their relative order
/// after every located item.
#[must_use]
pub fn sort_by_distance<T: HasLocation>(items: Vec<T>, from: &GeoLocation) -> Vec<T> {
    let mut keyed: Vec<(Option<f64>, T)> = items
        .into_iter()
        .map(|item| (item.location().map(|loc| from.distance_meters(&loc)), item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    keyed.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Stop {
        name: &'static str,
        at: Option<GeoLocation>,
    }

    impl HasLocation for Stop {
        fn location(&self) -> Option<GeoLocation> {
            self.at
        }
    }

    fn stop(name: &'static str, at: Option<(f64, f64)>) -> Stop {
        Stop {
            name,
            at: at.map(|(lat, lon)| GeoLocation::new_unchecked(lat, lon)),
        }
    }

    #[test]
    fn nearest_first_unlocated_last() {
        let center = GeoLocation::new_unchecked(46.95, 7.44);
        let sorted = sort_by_distance(
            vec![
                stop("nowhere", None),
                stop("far", Some((47.37, 8.54))),
                stop("near", Some((46.951, 7.441))),
                stop("elsewhere", None),
            ],
            &center,
        );
        let names: Vec<_> = sorted.iter().map(|s| s.name).collect();
        assert_eq!(names, ["near", "far", "nowhere", "elsewhere"]);
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let center = GeoLocation::new_unchecked(0.0, 0.0);
        let sorted = sort_by_distance(
            vec![stop("a", Some((1.0, 0.0))), stop("b", Some((1.0, 0.0)))],
            &center,
        );
        assert_eq!(sorted[0].name, "a");
        assert_eq!(sorted[1].name, "b");
    }

    #[test]
    fn empty_input() {
        let center = GeoLocation::new_unchecked(0.0, 0.0);
        assert!(sort_by_distance(Vec::<Stop>::new(), &center).is_empty());
    }
}
