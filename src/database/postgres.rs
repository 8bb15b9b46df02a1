use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::Database;
use crate::database::models::{Place, User};
use crate::database::{PlaceStore, StoreError, UserStore};

/// Postgres-backed credential store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, places, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.places)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, places, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, places, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn all(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, places, created_at \
             FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn attach_place(&self, user_id: Uuid, place_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET places = array_append(places, $2) \
             WHERE id = $1 AND NOT ($2 = ANY(places))",
        )
        .bind(user_id)
        .bind(place_id)
        .execute(&self.pool)
        .await?;

        // 0 rows means either an unknown user or an already-attached id;
        // the coordinator checks existence before calling, so treat a
        // missing user as a query-level failure.
        if result.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)",
            )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
            if !exists {
                return Err(StoreError::QueryError(format!(
                    "user {} not found for attach",
                    user_id
                )));
            }
        }
        Ok(())
    }

    async fn detach_place(&self, user_id: Uuid, place_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET places = array_remove(places, $2) WHERE id = $1")
            .bind(user_id)
            .bind(place_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Database::health_check(&self.pool).await
    }
}

/// Postgres-backed place store.
#[derive(Clone)]
pub struct PgPlaceStore {
    pool: PgPool,
}

impl PgPlaceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceStore for PgPlaceStore {
    async fn insert(&self, place: &Place) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO places (id, title, description, image, address, lat, lng, creator, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(place.id)
        .bind(&place.title)
        .bind(&place.description)
        .bind(&place.image)
        .bind(&place.address)
        .bind(place.location.lat)
        .bind(place.location.lng)
        .bind(place.creator)
        .bind(place.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<Place>, StoreError> {
        let place = sqlx::query_as::<_, Place>(
            "SELECT id, title, description, image, address, lat, lng, creator, created_at \
             FROM places WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(place)
    }

    async fn by_creator(&self, user_id: Uuid) -> Result<Vec<Place>, StoreError> {
        let places = sqlx::query_as::<_, Place>(
            "SELECT id, title, description, image, address, lat, lng, creator, created_at \
             FROM places WHERE creator = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(places)
    }

    async fn update(&self, place: &Place) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE places SET title = $2, description = $3 WHERE id = $1")
            .bind(place.id)
            .bind(&place.title)
            .bind(&place.description)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::QueryError(format!(
                "place {} not found for update",
                place.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
