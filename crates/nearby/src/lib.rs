//! Plumbing for the Google Places "searchNearby" API: the wire schema, an HTTP client,
//! and the normalizer that turns raw place records into [`Restaurant`]s.

pub mod macros;

pub mod client;
pub mod cuisine;
pub mod geo;
pub mod place;
pub mod restaurant;

pub use client::{ApiKey, PlacesClient, PlacesError};
pub use cuisine::Cuisine;
pub use geo::Coordinate;
pub use place::PlaceId;
pub use restaurant::{PriceLevel, Restaurant};
