pub mod place;
pub mod user;

pub use place::{GeoPoint, NewPlace, Place};
pub use user::User;
