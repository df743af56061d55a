use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CreateVenue, UpdateVenue, Venue};

#[derive(Debug, Deserialize, IntoParams)]
pub struct VenueQuery {
    /// Search term matched against the venue name and city
    pub search: Option<String>,
    /// Maximum number of results (default: 100)
    pub limit: Option<i64>,
    /// Number of results to skip (default: 0)
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/venues",
    tag = "venues",
    params(VenueQuery),
    responses(
        (status = 200, description = "List of venues", body = Vec<Venue>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_venues(
    State(pool): State<SqlitePool>,
    Query(query): Query<VenueQuery>,
) -> Result<Json<Vec<Venue>>, ApiError> {
    let venues = Venue::list(
        &pool,
        query.search.as_deref(),
        query.limit.unwrap_or(100),
        query.offset.unwrap_or(0),
    )
    .await?;

    Ok(Json(venues))
}

#[utoipa::path(
    get,
    path = "/venues/{id}",
    tag = "venues",
    params(("id" = Uuid, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue found", body = Venue),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn get_venue(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<Json<Venue>, ApiError> {
    let venue = Venue::find_by_id(&pool, id).await?;

    Ok(Json(venue))
}

#[utoipa::path(
    post,
    path = "/venues",
    tag = "venues",
    request_body = CreateVenue,
    responses(
        (status = 201, description = "Venue created", body = Venue),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_venue(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateVenue>,
) -> Result<(StatusCode, Json<Venue>), ApiError> {
    let venue = Venue::create(&pool, payload).await?;

    Ok((StatusCode::CREATED, Json(venue)))
}

#[utoipa::path(
    put,
    path = "/venues/{id}",
    tag = "venues",
    params(("id" = Uuid, Path, description = "Venue ID")),
    request_body = UpdateVenue,
    responses(
        (status = 200, description = "Venue updated", body = Venue),
        (status = 404, description = "Venue not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_venue(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVenue>,
) -> Result<Json<Venue>, ApiError> {
    let venue = Venue::update(&pool, id, payload).await?;

    Ok(Json(venue))
}

#[utoipa::path(
    delete,
    path = "/venues/{id}",
    tag = "venues",
    params(("id" = Uuid, Path, description = "Venue ID")),
    responses(
        (status = 204, description = "Venue deleted; conferences that used it keep running without one"),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn delete_venue(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    Venue::delete(&pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
