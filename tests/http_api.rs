use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use places_api::auth::AuthService;
use places_api::database::memory::MemoryStore;
use places_api::database::models::GeoPoint;
use places_api::routes;
use places_api::services::{GeocodeError, Geocoder};
use places_api::state::AppState;

const TEST_SECRET: &str = "test-secret";

/// Canned geocoder: any address containing "nowhere" is unresolvable,
/// everything else maps to the Empire State Building.
struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        if address.to_lowercase().contains("nowhere") {
            return Err(GeocodeError::NoResults);
        }
        Ok(GeoPoint {
            lat: 40.7484405,
            lng: -73.9878531,
        })
    }
}

fn test_app() -> Router {
    let store = MemoryStore::new();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(store),
        Arc::new(StubGeocoder),
        AuthService::new(TEST_SECRET, 3600, 4),
    );
    routes::app(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn signup(app: &Router, name: &str, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/users/signup",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
    body
}

async fn create_place(app: &Router, token: &str, title: &str, address: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/places",
        Some(token),
        Some(json!({
            "title": title,
            "description": "a spot worth keeping",
            "address": address,
        })),
    )
    .await
}

#[tokio::test]
async fn signup_then_login_returns_matching_identity() {
    let app = test_app();

    let signed_up = signup(&app, "Lina", "lina@mail.com", "secret1").await;
    assert_eq!(signed_up["email"], "lina@mail.com");
    assert!(signed_up["token"].is_string());

    let (status, logged_in) = send(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({ "email": "lina@mail.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["userId"], signed_up["userId"]);

    // The login token really encodes the same user.
    let auth = AuthService::new(TEST_SECRET, 3600, 4);
    let claims = auth.verify_token(logged_in["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.user_id.to_string(), signed_up["userId"].as_str().unwrap());
}

#[tokio::test]
async fn signup_rejects_bad_input_and_duplicate_email() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/signup",
        None,
        Some(json!({ "name": "Lina", "email": "lina@mail.com", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid inputs passed, check your data");

    signup(&app, "Lina", "lina@mail.com", "secret1").await;

    // Same address, different casing: still a duplicate.
    let (status, body) = send(
        &app,
        "POST",
        "/api/users/signup",
        None,
        Some(json!({ "name": "Lina2", "email": "Lina@Mail.com", "password": "secret2" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Couldn't create a user, email already exists");
}

#[tokio::test]
async fn login_with_bad_credentials_is_403() {
    let app = test_app();
    signup(&app, "Lina", "lina@mail.com", "secret1").await;

    for payload in [
        json!({ "email": "lina@mail.com", "password": "wrong-password" }),
        json!({ "email": "nobody@mail.com", "password": "secret1" }),
    ] {
        let (status, body) = send(&app, "POST", "/api/users/login", None, Some(payload)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body["message"],
            "Couldn't find a user with the provided credentials"
        );
    }
}

#[tokio::test]
async fn user_listing_excludes_password_material() {
    let app = test_app();
    signup(&app, "Lina", "lina@mail.com", "secret1").await;

    let (status, body) = send(&app, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Lina");
    assert!(users[0].get("password").is_none());
    assert!(users[0].get("passwordHash").is_none());
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn mutating_place_routes_require_a_token() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/places",
        None,
        Some(json!({
            "title": "X",
            "description": "a spot worth keeping",
            "address": "20 W 34th St, New York",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Authentication failed!");

    // Expired and garbage tokens collapse to the same answer.
    let expired = AuthService::new(TEST_SECRET, -120, 4)
        .issue_token(uuid::Uuid::new_v4(), "lina@mail.com")
        .unwrap();
    for token in [expired.as_str(), "not-a-token"] {
        let (status, body) = create_place(&app, token, "X", "20 W 34th St, New York").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Authentication failed!");
    }
}

#[tokio::test]
async fn create_and_delete_keep_linkage_consistent() {
    let app = test_app();
    let signed_up = signup(&app, "Lina", "lina@mail.com", "secret1").await;
    let token = signed_up["token"].as_str().unwrap();
    let user_id = signed_up["userId"].as_str().unwrap();

    // Create: 201, creator is the token's user, coordinates resolved.
    let (status, body) = create_place(&app, token, "X", "20 W 34th St, New York").await;
    assert_eq!(status, StatusCode::CREATED);
    let place = &body["place"];
    let place_id = place["id"].as_str().unwrap().to_string();
    assert_eq!(place["creator"], user_id);
    assert_eq!(place["location"]["lat"], 40.7484405);
    assert_eq!(place["location"]["lng"], -73.9878531);

    // Bidirectional linkage: user's owned set contains the new id.
    let (_, users_body) = send(&app, "GET", "/api/users", None, None).await;
    let owned = users_body["users"][0]["places"].as_array().unwrap();
    assert!(owned.contains(&json!(place_id)));

    // Fetchable by id and listed under the creator.
    let (status, _) = send(&app, "GET", &format!("/api/places/{}", place_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, listing) = send(
        &app,
        "GET",
        &format!("/api/places/user/{}", user_id),
        None,
        None,
    )
    .await;
    assert_eq!(listing["places"].as_array().unwrap().len(), 1);

    // Delete: place gone and detached from its former creator.
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/places/{}", place_id),
        Some(token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted place.");

    let (status, _) = send(&app, "GET", &format!("/api/places/{}", place_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, users_body) = send(&app, "GET", "/api/users", None, None).await;
    assert!(users_body["users"][0]["places"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn patch_updates_title_and_description_for_owner_only() {
    let app = test_app();
    let lina = signup(&app, "Lina", "lina@mail.com", "secret1").await;
    let jason = signup(&app, "Jason", "jason@mail.com", "secret2").await;
    let token = lina["token"].as_str().unwrap();

    let (_, body) = create_place(&app, token, "X", "20 W 34th St, New York").await;
    let place_id = body["place"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/places/{}", place_id),
        Some(token),
        Some(json!({ "title": "Renamed", "description": "still the same spot" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["place"]["title"], "Renamed");

    // Another authenticated user cannot touch it.
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/places/{}", place_id),
        Some(jason["token"].as_str().unwrap()),
        Some(json!({ "title": "Mine now", "description": "hostile takeover" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn lookups_distinguish_missing_place_from_empty_listing() {
    let app = test_app();
    signup(&app, "Lina", "lina@mail.com", "secret1").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/places/{}", uuid::Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Couldn't find a place for the provided id");

    // Unparseable ids get the same 404, not a routing error shape.
    let (status, _) = send(&app, "GET", "/api/places/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A user with no places is an empty listing, not an error.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/places/user/{}", uuid::Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["places"], json!([]));
}

#[tokio::test]
async fn unresolvable_address_fails_and_persists_nothing() {
    let app = test_app();
    let signed_up = signup(&app, "Lina", "lina@mail.com", "secret1").await;
    let token = signed_up["token"].as_str().unwrap();
    let user_id = signed_up["userId"].as_str().unwrap();

    let (status, body) = create_place(&app, token, "X", "middle of nowhere").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        "Couldn't find a location for a provided address"
    );

    let (_, listing) = send(
        &app,
        "GET",
        &format!("/api/places/user/{}", user_id),
        None,
        None,
    )
    .await;
    assert_eq!(listing["places"], json!([]));
}

#[tokio::test]
async fn create_place_validates_input() {
    let app = test_app();
    let signed_up = signup(&app, "Lina", "lina@mail.com", "secret1").await;
    let token = signed_up["token"].as_str().unwrap();

    for payload in [
        json!({ "title": "", "description": "a spot worth keeping", "address": "somewhere" }),
        json!({ "title": "X", "description": "tiny", "address": "somewhere" }),
        json!({ "title": "X", "description": "a spot worth keeping", "address": "  " }),
    ] {
        let (status, body) = send(&app, "POST", "/api/places", Some(token), Some(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Invalid inputs passed, check your data");
    }
}

#[tokio::test]
async fn health_reports_ok_over_memory_store() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
