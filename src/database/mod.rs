pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use self::models::{Place, User};

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Identity records. Users are never deleted; the only mutation besides
/// insert is the linkage coordinator attaching/detaching owned place ids.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), StoreError>;
    async fn by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Expects an already-normalized (lower-cased) email.
    async fn by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn all(&self) -> Result<Vec<User>, StoreError>;
    /// Add `place_id` to the user's owned set. Idempotent.
    async fn attach_place(&self, user_id: Uuid, place_id: Uuid) -> Result<(), StoreError>;
    /// Remove `place_id` from the user's owned set. Idempotent.
    async fn detach_place(&self, user_id: Uuid, place_id: Uuid) -> Result<(), StoreError>;
    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PlaceStore: Send + Sync {
    async fn insert(&self, place: &Place) -> Result<(), StoreError>;
    async fn by_id(&self, id: Uuid) -> Result<Option<Place>, StoreError>;
    async fn by_creator(&self, user_id: Uuid) -> Result<Vec<Place>, StoreError>;
    async fn update(&self, place: &Place) -> Result<(), StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
