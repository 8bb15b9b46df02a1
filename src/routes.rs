use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{places, users};
use crate::middleware::require_auth;
use crate::state::AppState;

/// Build the full application router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(user_routes())
        .merge(place_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(users::list))
        .route("/api/users/signup", post(users::signup))
        .route("/api/users/login", post(users::login))
}

fn place_routes(state: AppState) -> Router<AppState> {
    // Reads are public; every mutating method sits behind the JWT guard.
    let guard = from_fn_with_state(state, require_auth);

    Router::new()
        .route(
            "/api/places",
            post(places::create_place).route_layer(guard.clone()),
        )
        .route(
            "/api/places/:place_id",
            get(places::get_place).merge(
                patch(places::update_place)
                    .delete(places::delete_place)
                    .route_layer(guard),
            ),
        )
        .route("/api/places/user/:user_id", get(places::get_user_places))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Places API",
        "version": version,
        "endpoints": {
            "users": "/api/users, /api/users/signup, /api/users/login (public)",
            "places": "/api/places/:placeId, /api/places/user/:userId (public)",
            "places_protected": "POST /api/places, PATCH/DELETE /api/places/:placeId (bearer token)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.users.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": "unavailable"
                })),
            )
        }
    }
}
