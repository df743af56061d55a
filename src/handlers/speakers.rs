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
use crate::models::{CreateSpeaker, Speaker, UpdateSpeaker};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SpeakerQuery {
    /// Search term matched against the name (accent-insensitive) and email
    pub search: Option<String>,
    /// Maximum number of results (default: 100)
    pub limit: Option<i64>,
    /// Number of results to skip (default: 0)
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/speakers",
    tag = "speakers",
    params(SpeakerQuery),
    responses(
        (status = 200, description = "List of speakers", body = Vec<Speaker>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_speakers(
    State(pool): State<SqlitePool>,
    Query(query): Query<SpeakerQuery>,
) -> Result<Json<Vec<Speaker>>, ApiError> {
    let speakers = Speaker::list(
        &pool,
        query.search.as_deref(),
        query.limit.unwrap_or(100),
        query.offset.unwrap_or(0),
    )
    .await?;

    Ok(Json(speakers))
}

#[utoipa::path(
    get,
    path = "/speakers/{id}",
    tag = "speakers",
    params(("id" = Uuid, Path, description = "Speaker ID")),
    responses(
        (status = 200, description = "Speaker found", body = Speaker),
        (status = 404, description = "Speaker not found")
    )
)]
pub async fn get_speaker(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<Json<Speaker>, ApiError> {
    let speaker = Speaker::find_by_id(&pool, id).await?;

    Ok(Json(speaker))
}

#[utoipa::path(
    post,
    path = "/speakers",
    tag = "speakers",
    request_body = CreateSpeaker,
    responses(
        (status = 201, description = "Speaker created", body = Speaker),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_speaker(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateSpeaker>,
) -> Result<(StatusCode, Json<Speaker>), ApiError> {
    let speaker = Speaker::create(&pool, payload).await?;

    Ok((StatusCode::CREATED, Json(speaker)))
}

#[utoipa::path(
    put,
    path = "/speakers/{id}",
    tag = "speakers",
    params(("id" = Uuid, Path, description = "Speaker ID")),
    request_body = UpdateSpeaker,
    responses(
        (status = 200, description = "Speaker updated", body = Speaker),
        (status = 404, description = "Speaker not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_speaker(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSpeaker>,
) -> Result<Json<Speaker>, ApiError> {
    let speaker = Speaker::update(&pool, id, payload).await?;

    Ok(Json(speaker))
}

#[utoipa::path(
    delete,
    path = "/speakers/{id}",
    tag = "speakers",
    params(("id" = Uuid, Path, description = "Speaker ID")),
    responses(
        (status = 204, description = "Speaker deleted"),
        (status = 404, description = "Speaker not found"),
        (status = 409, description = "Speaker still has talks")
    )
)]
pub async fn delete_speaker(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    Speaker::delete(&pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
