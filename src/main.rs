use std::sync::Arc;

use places_api::auth::AuthService;
use places_api::config;
use places_api::database::manager::Database;
use places_api::database::postgres::{PgPlaceStore, PgUserStore};
use places_api::routes;
use places_api::services::GoogleGeocoder;
use places_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Places API in {:?} mode", config.environment);

    let pool = Database::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));

    Database::migrate(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to run migrations: {}", e));

    let geocoder = GoogleGeocoder::from_config(&config.geocoding)
        .unwrap_or_else(|e| panic!("failed to build geocoding client: {}", e));

    let state = AppState::new(
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgPlaceStore::new(pool)),
        Arc::new(geocoder),
        AuthService::from_config(&config.security),
    );

    let app = routes::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Places API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
