use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::database::models::{NewPlace, Place};
use crate::database::{PlaceStore, StoreError, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum LinkageError {
    #[error("user not found")]
    UserNotFound,
    #[error("place not found")]
    PlaceNotFound,
    #[error("caller does not own this place")]
    NotOwner,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Title/description are the only mutable place fields.
#[derive(Debug, Clone)]
pub struct PlaceChanges {
    pub title: String,
    pub description: String,
}

/// Keeps a place row and its owning user's `places` set mutually
/// consistent. The two stores are independent collaborators, so the
/// cross-store writes run as a compensating-action sequence rather than
/// one transaction: a crash between the two writes can leave an orphan
/// place row that a reconciliation sweep would have to collect.
#[derive(Clone)]
pub struct LinkageCoordinator {
    users: Arc<dyn UserStore>,
    places: Arc<dyn PlaceStore>,
}

impl LinkageCoordinator {
    pub fn new(users: Arc<dyn UserStore>, places: Arc<dyn PlaceStore>) -> Self {
        Self { users, places }
    }

    /// Create-place saga: write the place, then attach its id to the
    /// creator. If the attach fails the place row is deleted again, so
    /// either both writes land or neither is observable.
    pub async fn create_place(&self, new: NewPlace) -> Result<Place, LinkageError> {
        self.users
            .by_id(new.creator)
            .await?
            .ok_or(LinkageError::UserNotFound)?;

        let place = Place::new(new);
        self.places.insert(&place).await?;

        if let Err(attach_err) = self.users.attach_place(place.creator, place.id).await {
            if let Err(undo_err) = self.places.delete(place.id).await {
                // Compensation failed; the sweep has to pick this row up.
                error!(
                    place_id = %place.id,
                    "failed to undo place insert after attach failure: {}",
                    undo_err
                );
            }
            return Err(attach_err.into());
        }

        Ok(place)
    }

    /// Delete-place saga: detach the id from the creator, then delete the
    /// row. If the delete fails the id is re-attached.
    pub async fn delete_place(&self, place_id: Uuid, requested_by: Uuid) -> Result<(), LinkageError> {
        let place = self
            .places
            .by_id(place_id)
            .await?
            .ok_or(LinkageError::PlaceNotFound)?;

        if place.creator != requested_by {
            return Err(LinkageError::NotOwner);
        }

        self.users.detach_place(place.creator, place.id).await?;

        if let Err(delete_err) = self.places.delete(place.id).await {
            if let Err(undo_err) = self.users.attach_place(place.creator, place.id).await {
                error!(
                    place_id = %place.id,
                    "failed to re-attach place after delete failure: {}",
                    undo_err
                );
            }
            return Err(delete_err.into());
        }

        Ok(())
    }

    /// No linkage change; fetch-mutate-persist, last writer wins.
    pub async fn update_place(
        &self,
        place_id: Uuid,
        requested_by: Uuid,
        changes: PlaceChanges,
    ) -> Result<Place, LinkageError> {
        let mut place = self
            .places
            .by_id(place_id)
            .await?
            .ok_or(LinkageError::PlaceNotFound)?;

        if place.creator != requested_by {
            return Err(LinkageError::NotOwner);
        }

        place.title = changes.title;
        place.description = changes.description;

        if let Err(e) = self.places.update(&place).await {
            warn!(place_id = %place.id, "place update failed: {}", e);
            return Err(e.into());
        }
        Ok(place)
    }
}
