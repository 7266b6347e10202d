//! OJP 2.0 client
//!
//! Talks to Open Journey Planner endpoints over their SIRI-based XML
//! protocol:
//!
//! - [`model`] holds the typed request and delivery messages, and [`codec`]
//!   turns them into bytes and back. Decoding accepts element names with or
//!   without the `siri:` prefix.
//! - [`OjpClient`] offers one operation per use case (place search, trips,
//!   trip refinement, trip info and stop events) on top of a [`Transport`].
//! - [`PaginatedTripLoader`] pages through trips earlier or later than the
//!   ones already delivered, dropping duplicates by content hash.

pub mod cancel;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod hash;
pub mod model;
pub mod paginated;
pub mod transport;
pub mod xml;

pub use cancel::{CancelSignal, CancelToken};
pub use client::{OjpClient, TripQuery, TripTime};
pub use config::{MAX_PAGE_SIZE, OjpConfig};
pub use error::{CANCELLED, DecodeError, EncodeError, OjpError, TransportError};
pub use hash::TripHash;
pub use paginated::PaginatedTripLoader;
pub use transport::{HttpTransport, Transport, TransportResponse};
