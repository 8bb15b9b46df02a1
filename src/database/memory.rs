use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Place, User};
use crate::database::{PlaceStore, StoreError, UserStore};

/// In-memory store backing both traits. Used by unit and router tests and
/// handy for demos without a Postgres instance; it replaces the global
/// mutable arrays of the system's early variants with owned state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    places: Arc<RwLock<HashMap<Uuid, Place>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn attach_place(&self, user_id: Uuid, place_id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or_else(|| {
            StoreError::QueryError(format!("user {} not found for attach", user_id))
        })?;
        if !user.places.contains(&place_id) {
            user.places.push(place_id);
        }
        Ok(())
    }

    async fn detach_place(&self, user_id: Uuid, place_id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&user_id) {
            user.places.retain(|id| *id != place_id);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl PlaceStore for MemoryStore {
    async fn insert(&self, place: &Place) -> Result<(), StoreError> {
        self.places.write().await.insert(place.id, place.clone());
        Ok(())
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<Place>, StoreError> {
        Ok(self.places.read().await.get(&id).cloned())
    }

    async fn by_creator(&self, user_id: Uuid) -> Result<Vec<Place>, StoreError> {
        let mut places: Vec<Place> = self
            .places
            .read()
            .await
            .values()
            .filter(|p| p.creator == user_id)
            .cloned()
            .collect();
        places.sort_by_key(|p| p.created_at);
        Ok(places)
    }

    async fn update(&self, place: &Place) -> Result<(), StoreError> {
        let mut places = self.places.write().await;
        let existing = places.get_mut(&place.id).ok_or_else(|| {
            StoreError::QueryError(format!("place {} not found for update", place.id))
        })?;
        existing.title = place.title.clone();
        existing.description = place.description.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.places.write().await.remove(&id);
        Ok(())
    }
}
