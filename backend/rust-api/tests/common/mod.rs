use axum::Router;
use std::sync::Arc;

use adaptive_quiz_api::{config::Config, create_router, services::AppState};

pub async fn create_test_app() -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    dotenvy::from_filename(".env.test").ok();

    let mut config = Config::load().expect("Failed to load test configuration");

    // Point the content provider at a closed port so best-effort fetches
    // fail fast and every session runs on built-in content.
    config.content_api_url = "http://127.0.0.1:9".to_string();
    config.submission_webhook_url = None;

    let app_state = Arc::new(AppState::new(config));

    create_router(app_state)
}
