use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A latitude/longitude pair. Both components must be finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub address: String,
    #[sqlx(flatten)]
    pub location: GeoPoint,
    /// Exactly one owning user.
    pub creator: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for the create-place workflow, after geocoding.
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub image: String,
    pub address: String,
    pub location: GeoPoint,
    pub creator: Uuid,
}

impl Place {
    pub fn new(new: NewPlace) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            image: new.image,
            address: new.address,
            location: new.location,
            creator: new.creator,
            created_at: Utc::now(),
        }
    }
}
