use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

use confdesk::middleware::auth_middleware;

/// Create a fresh in-memory database for one test. Each pool is its own
/// database, so tests never see each other's rows.
pub async fn create_test_pool() -> SqlitePool {
    confdesk::db::connect_memory()
        .await
        .expect("Failed to create test database pool")
}

/// Create the application router for testing
pub fn create_test_app(pool: SqlitePool) -> Router {
    use confdesk::handlers;

    Router::new()
        .route("/", get(|| async { "ConfDesk API - Test" }))
        // Speaker routes
        .route("/speakers", get(handlers::list_speakers).post(handlers::create_speaker))
        .route("/speakers/{id}", get(handlers::get_speaker).put(handlers::update_speaker).delete(handlers::delete_speaker))
        // Talk routes
        .route("/talks", get(handlers::list_talks).post(handlers::create_talk))
        .route("/talks/count", get(handlers::count_talks))
        .route("/talks/export", post(handlers::export_talks))
        .route("/talks/bulk-delete", post(handlers::bulk_delete_talks))
        .route("/talks/{id}", get(handlers::get_talk).put(handlers::update_talk).delete(handlers::delete_talk))
        .route("/talks/{id}/approve", post(handlers::approve_talk))
        .route("/talks/{id}/reject", post(handlers::reject_talk))
        // Venue routes
        .route("/venues", get(handlers::list_venues).post(handlers::create_venue))
        .route("/venues/{id}", get(handlers::get_venue).put(handlers::update_venue).delete(handlers::delete_venue))
        // Conference routes
        .route("/conferences", get(handlers::list_conferences).post(handlers::create_conference))
        .route("/conferences/{id}", get(handlers::get_conference).put(handlers::update_conference).delete(handlers::delete_conference))
        .route("/conferences/{id}/speakers", get(handlers::list_conference_speakers))
        .route("/conferences/{id}/speakers/{speaker_id}", post(handlers::attach_conference_speaker).delete(handlers::detach_conference_speaker))
        .route("/conferences/{id}/talks", get(handlers::list_conference_talks))
        .route("/conferences/{id}/talks/{talk_id}", post(handlers::attach_conference_talk).delete(handlers::detach_conference_talk))
        // Meta routes
        .route("/meta/vocabularies", get(handlers::vocabularies))
        .with_state(pool)
}

/// Same router with the Bearer-token middleware in front, for auth tests.
#[allow(dead_code)]
pub fn create_auth_test_app(pool: SqlitePool) -> Router {
    create_test_app(pool).layer(from_fn(auth_middleware))
}
