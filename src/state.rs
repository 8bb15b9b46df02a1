use std::sync::Arc;

use crate::auth::AuthService;
use crate::database::{PlaceStore, UserStore};
use crate::services::{Geocoder, LinkageCoordinator};

/// Shared per-request context. Everything mutable lives behind the store
/// traits, so cloning this into each handler is cheap and carries no
/// cross-request state of its own.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub places: Arc<dyn PlaceStore>,
    pub linkage: LinkageCoordinator,
    pub geocoder: Arc<dyn Geocoder>,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        places: Arc<dyn PlaceStore>,
        geocoder: Arc<dyn Geocoder>,
        auth: AuthService,
    ) -> Self {
        let linkage = LinkageCoordinator::new(users.clone(), places.clone());
        Self {
            users,
            places,
            linkage,
            geocoder,
            auth,
        }
    }
}
