pub mod geocoding;
pub mod linkage;

pub use geocoding::{GeocodeError, Geocoder, GoogleGeocoder};
pub use linkage::{LinkageCoordinator, LinkageError, PlaceChanges};
