use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::NewPlace;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::PlaceChanges;
use crate::state::AppState;

const INVALID_INPUT: &str = "Invalid inputs passed, check your data";
const PLACE_NOT_FOUND: &str = "Couldn't find a place for the provided id";

#[derive(Debug, Deserialize)]
pub struct CreatePlaceRequest {
    pub title: String,
    pub description: String,
    pub address: String,
    /// Image URL. Upload handling is out of scope, so callers pass a
    /// reference directly.
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaceRequest {
    pub title: String,
    pub description: String,
}

/// GET /api/places/:place_id
pub async fn get_place(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let place_id = parse_id(&place_id, PLACE_NOT_FOUND)?;
    let place = state
        .places
        .by_id(place_id)
        .await?
        .ok_or_else(|| ApiError::not_found(PLACE_NOT_FOUND))?;

    Ok(Json(json!({ "place": place })))
}

/// GET /api/places/user/:user_id
///
/// A user with no places gets an empty list, not an error; the legacy
/// error-on-empty behavior made "new user" indistinguishable from a miss.
pub async fn get_user_places(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = parse_id(&user_id, "Couldn't find a user for the provided id")?;
    let places = state.places.by_creator(user_id).await?;

    Ok(Json(json!({ "places": places })))
}

/// POST /api/places - geocode the address, then run the create saga.
/// The creator is always the token's user, never a body field.
pub async fn create_place(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreatePlaceRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if payload.title.trim().is_empty()
        || payload.description.len() < 5
        || payload.address.trim().is_empty()
    {
        return Err(ApiError::validation(INVALID_INPUT));
    }

    let location = state.geocoder.resolve(&payload.address).await?;

    let place = state
        .linkage
        .create_place(NewPlace {
            title: payload.title,
            description: payload.description,
            image: payload.image,
            address: payload.address,
            location,
            creator: current.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "place": place }))))
}

/// PATCH /api/places/:place_id - title and description only
pub async fn update_place(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(place_id): Path<String>,
    Json(payload): Json<UpdatePlaceRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.title.trim().is_empty() || payload.description.len() < 5 {
        return Err(ApiError::validation(INVALID_INPUT));
    }

    let place_id = parse_id(&place_id, PLACE_NOT_FOUND)?;
    let place = state
        .linkage
        .update_place(
            place_id,
            current.user_id,
            PlaceChanges {
                title: payload.title,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(json!({ "place": place })))
}

/// DELETE /api/places/:place_id - runs the delete saga
pub async fn delete_place(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(place_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let place_id = parse_id(&place_id, PLACE_NOT_FOUND)?;
    state.linkage.delete_place(place_id, current.user_id).await?;

    Ok(Json(json!({ "message": "Deleted place." })))
}

/// Unparseable ids get the same 404 as unknown ones.
fn parse_id(raw: &str, not_found_message: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found_message))
}
