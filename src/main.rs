use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use confdesk::handlers;
use confdesk::middleware::auth_middleware;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_speakers,
        handlers::get_speaker,
        handlers::create_speaker,
        handlers::update_speaker,
        handlers::delete_speaker,
        handlers::list_talks,
        handlers::count_talks,
        handlers::export_talks,
        handlers::get_talk,
        handlers::create_talk,
        handlers::update_talk,
        handlers::delete_talk,
        handlers::bulk_delete_talks,
        handlers::approve_talk,
        handlers::reject_talk,
        handlers::list_venues,
        handlers::get_venue,
        handlers::create_venue,
        handlers::update_venue,
        handlers::delete_venue,
        handlers::list_conferences,
        handlers::get_conference,
        handlers::create_conference,
        handlers::update_conference,
        handlers::delete_conference,
        handlers::list_conference_speakers,
        handlers::attach_conference_speaker,
        handlers::detach_conference_speaker,
        handlers::list_conference_talks,
        handlers::attach_conference_talk,
        handlers::detach_conference_talk,
        handlers::vocabularies,
    ),
    tags(
        (name = "speakers", description = "Speaker profiles"),
        (name = "talks", description = "Talk submissions and review"),
        (name = "venues", description = "Venues"),
        (name = "conferences", description = "Conferences and their line-ups"),
        (name = "meta", description = "Vocabularies and limits")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://confdesk.db".to_string());
    let pool = confdesk::db::connect(&database_url).await?;

    let mut app = Router::new()
        // Root route
        .route("/", get(root))
        .route(
            "/speakers",
            get(handlers::list_speakers).post(handlers::create_speaker),
        )
        .route(
            "/speakers/{id}",
            get(handlers::get_speaker)
                .put(handlers::update_speaker)
                .delete(handlers::delete_speaker),
        )
        .route(
            "/talks",
            get(handlers::list_talks).post(handlers::create_talk),
        )
        .route("/talks/count", get(handlers::count_talks))
        .route("/talks/export", post(handlers::export_talks))
        .route("/talks/bulk-delete", post(handlers::bulk_delete_talks))
        .route(
            "/talks/{id}",
            get(handlers::get_talk)
                .put(handlers::update_talk)
                .delete(handlers::delete_talk),
        )
        .route("/talks/{id}/approve", post(handlers::approve_talk))
        .route("/talks/{id}/reject", post(handlers::reject_talk))
        .route(
            "/venues",
            get(handlers::list_venues).post(handlers::create_venue),
        )
        .route(
            "/venues/{id}",
            get(handlers::get_venue)
                .put(handlers::update_venue)
                .delete(handlers::delete_venue),
        )
        .route(
            "/conferences",
            get(handlers::list_conferences).post(handlers::create_conference),
        )
        .route(
            "/conferences/{id}",
            get(handlers::get_conference)
                .put(handlers::update_conference)
                .delete(handlers::delete_conference),
        )
        .route(
            "/conferences/{id}/speakers",
            get(handlers::list_conference_speakers),
        )
        .route(
            "/conferences/{id}/speakers/{speaker_id}",
            post(handlers::attach_conference_speaker)
                .delete(handlers::detach_conference_speaker),
        )
        .route(
            "/conferences/{id}/talks",
            get(handlers::list_conference_talks),
        )
        .route(
            "/conferences/{id}/talks/{talk_id}",
            post(handlers::attach_conference_talk).delete(handlers::detach_conference_talk),
        )
        .route("/meta/vocabularies", get(handlers::vocabularies));

    // The auth layer only covers the routes above it; the Swagger UI merged
    // afterwards stays reachable without a token.
    if std::env::var("API_TOKENS").is_ok() {
        app = app.layer(from_fn(auth_middleware));
        info!("API token authentication enabled");
    } else {
        info!("API_TOKENS not set, running without authentication");
    }

    let app = app
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(pool);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;

    info!("Server is running on http://0.0.0.0:3000");
    axum::serve(listener, app).await?;

    Ok(())
}

// handler for GET /
async fn root() -> &'static str {
    "ConfDesk API"
}
