//! Domain layer of the OJP client
//!
//! Value objects and rules that do not depend on the wire protocol: geographic
//! positions, great-circle distances and ordering by proximity.

pub mod errors;
pub mod proximity;
pub mod value_objects;

pub use errors::DomainError;
pub use proximity::{HasLocation, sort_by_distance};
pub use value_objects::GeoLocation;
