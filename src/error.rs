// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::StoreError;
use crate::services::geocoding::GeocodeError;
use crate::services::linkage::LinkageError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every variant renders as `{"message": "..."}` with its status code;
/// internal details are logged and never leak into the body.
#[derive(Debug)]
pub enum ApiError {
    // 422 Unprocessable Entity (malformed or missing input)
    Validation(String),

    // 404 Not Found
    NotFound(String),

    // 403 Forbidden (missing/invalid/expired credential)
    Forbidden(String),

    // 422 Unprocessable Entity (duplicate email)
    Conflict(String),

    // 502 Bad Gateway (geocoding provider failure)
    BadGateway(String),

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Forbidden(msg)
            | ApiError::Conflict(msg)
            | ApiError::BadGateway(msg)
            | ApiError::Internal(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "message": self.message() })
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

// Convert component error types to ApiError
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Don't expose store internals to clients
        tracing::error!("store error: {}", err);
        ApiError::internal("An unknown error occured")
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // Every credential failure collapses to one message so callers
            // can't probe which sub-check rejected them.
            AuthError::InvalidToken => ApiError::forbidden("Authentication failed!"),
            AuthError::MissingSecret => {
                tracing::error!("JWT secret is not configured");
                ApiError::internal("An unknown error occured")
            }
            AuthError::Hash(msg) => {
                tracing::error!("password hashing failed: {}", msg);
                ApiError::internal("An unknown error occured")
            }
            AuthError::TokenGeneration(msg) => {
                tracing::error!("JWT generation error: {}", msg);
                ApiError::internal("An unknown error occured")
            }
        }
    }
}

impl From<GeocodeError> for ApiError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::EmptyAddress => {
                ApiError::validation("Invalid inputs passed, check your data")
            }
            GeocodeError::NoResults => {
                ApiError::validation("Couldn't find a location for a provided address")
            }
            GeocodeError::Provider(msg) => {
                tracing::error!("geocoding provider error: {}", msg);
                ApiError::bad_gateway("Geocoding service is unavailable")
            }
            GeocodeError::Transport(e) => {
                tracing::error!("geocoding request failed: {}", e);
                ApiError::bad_gateway("Geocoding service is unavailable")
            }
        }
    }
}

impl From<LinkageError> for ApiError {
    fn from(err: LinkageError) -> Self {
        match err {
            LinkageError::UserNotFound => {
                ApiError::not_found("Couldn't find a user for the provided id")
            }
            LinkageError::PlaceNotFound => {
                ApiError::not_found("Couldn't find a place for the provided id")
            }
            LinkageError::NotOwner => {
                ApiError::forbidden("You are not allowed to modify this place")
            }
            LinkageError::Store(e) => e.into(),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
