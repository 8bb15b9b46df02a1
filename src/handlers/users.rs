use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

const INVALID_INPUT: &str = "Invalid inputs passed, check your data";

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// GET /api/users - all users, password hashes excluded from the wire
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = state.users.all().await?;
    Ok(Json(json!({ "users": users })))
}

/// POST /api/users/signup - create an account and hand back a token
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = payload.name.trim();
    let email = normalize_email(&payload.email);

    if name.is_empty() || !is_valid_email(&email) || payload.password.len() < 6 {
        return Err(ApiError::validation(INVALID_INPUT));
    }

    if state.users.by_email(&email).await?.is_some() {
        return Err(ApiError::conflict(
            "Couldn't create a user, email already exists",
        ));
    }

    let password_hash = state.auth.hash_password(&payload.password)?;
    let user = User::new(name.to_string(), email, password_hash);
    state.users.insert(&user).await?;

    let token = state.auth.issue_token(user.id, &user.email)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "userId": user.id, "email": user.email, "token": token })),
    ))
}

/// POST /api/users/login - verify credentials and hand back a token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = normalize_email(&payload.email);

    let user = state.users.by_email(&email).await?;
    let user = match user {
        Some(u) if state.auth.verify_password(&payload.password, &u.password_hash) => u,
        // Same answer for unknown email and wrong password.
        _ => {
            return Err(ApiError::forbidden(
                "Couldn't find a user with the provided credentials",
            ))
        }
    };

    let token = state.auth.issue_token(user.id, &user.email)?;

    Ok(Json(
        json!({ "userId": user.id, "email": user.email, "token": token }),
    ))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        _ => false,
    }
}
