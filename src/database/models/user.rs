use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Stored lower-cased; lookups normalize the same way.
    pub email: String,
    /// Never serialized into API responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Owned place ids. Set semantics; ordering is irrelevant.
    pub places: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            places: Vec::new(),
            created_at: Utc::now(),
        }
    }
}
