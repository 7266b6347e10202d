//! Value objects

mod geo_location;

pub use geo_location::{EARTH_RADIUS_METERS, GeoLocation};
