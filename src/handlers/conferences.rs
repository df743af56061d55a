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
use crate::models::{Conference, CreateConference, Speaker, Talk, UpdateConference};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ConferenceQuery {
    /// Search term matched against the conference name
    pub search: Option<String>,
    /// Maximum number of results (default: 100)
    pub limit: Option<i64>,
    /// Number of results to skip (default: 0)
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/conferences",
    tag = "conferences",
    params(ConferenceQuery),
    responses(
        (status = 200, description = "List of conferences", body = Vec<Conference>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_conferences(
    State(pool): State<SqlitePool>,
    Query(query): Query<ConferenceQuery>,
) -> Result<Json<Vec<Conference>>, ApiError> {
    let conferences = Conference::list(
        &pool,
        query.search.as_deref(),
        query.limit.unwrap_or(100),
        query.offset.unwrap_or(0),
    )
    .await?;

    Ok(Json(conferences))
}

#[utoipa::path(
    get,
    path = "/conferences/{id}",
    tag = "conferences",
    params(("id" = Uuid, Path, description = "Conference ID")),
    responses(
        (status = 200, description = "Conference found", body = Conference),
        (status = 404, description = "Conference not found")
    )
)]
pub async fn get_conference(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<Json<Conference>, ApiError> {
    let conference = Conference::find_by_id(&pool, id).await?;

    Ok(Json(conference))
}

#[utoipa::path(
    post,
    path = "/conferences",
    tag = "conferences",
    request_body = CreateConference,
    responses(
        (status = 201, description = "Conference created", body = Conference),
        (status = 409, description = "Venue does not exist"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_conference(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateConference>,
) -> Result<(StatusCode, Json<Conference>), ApiError> {
    let conference = Conference::create(&pool, payload).await?;

    Ok((StatusCode::CREATED, Json(conference)))
}

#[utoipa::path(
    put,
    path = "/conferences/{id}",
    tag = "conferences",
    params(("id" = Uuid, Path, description = "Conference ID")),
    request_body = UpdateConference,
    responses(
        (status = 200, description = "Conference updated", body = Conference),
        (status = 404, description = "Conference not found"),
        (status = 409, description = "Venue does not exist"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_conference(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateConference>,
) -> Result<Json<Conference>, ApiError> {
    let conference = Conference::update(&pool, id, payload).await?;

    Ok(Json(conference))
}

#[utoipa::path(
    delete,
    path = "/conferences/{id}",
    tag = "conferences",
    params(("id" = Uuid, Path, description = "Conference ID")),
    responses(
        (status = 204, description = "Conference deleted along with its attachments"),
        (status = 404, description = "Conference not found")
    )
)]
pub async fn delete_conference(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    Conference::delete(&pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/conferences/{id}/speakers",
    tag = "conferences",
    params(("id" = Uuid, Path, description = "Conference ID")),
    responses(
        (status = 200, description = "Speakers in the conference line-up", body = Vec<Speaker>),
        (status = 404, description = "Conference not found")
    )
)]
pub async fn list_conference_speakers(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Speaker>>, ApiError> {
    let speakers = Conference::speakers(&pool, id).await?;

    Ok(Json(speakers))
}

#[utoipa::path(
    post,
    path = "/conferences/{id}/speakers/{speaker_id}",
    tag = "conferences",
    params(
        ("id" = Uuid, Path, description = "Conference ID"),
        ("speaker_id" = Uuid, Path, description = "Speaker ID")
    ),
    responses(
        (status = 204, description = "Speaker attached"),
        (status = 404, description = "Conference or speaker not found"),
        (status = 409, description = "Speaker already attached")
    )
)]
pub async fn attach_conference_speaker(
    State(pool): State<SqlitePool>,
    Path((id, speaker_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    Conference::attach_speaker(&pool, id, speaker_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/conferences/{id}/speakers/{speaker_id}",
    tag = "conferences",
    params(
        ("id" = Uuid, Path, description = "Conference ID"),
        ("speaker_id" = Uuid, Path, description = "Speaker ID")
    ),
    responses(
        (status = 204, description = "Speaker detached"),
        (status = 404, description = "Conference not found or speaker not attached")
    )
)]
pub async fn detach_conference_speaker(
    State(pool): State<SqlitePool>,
    Path((id, speaker_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    Conference::detach_speaker(&pool, id, speaker_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/conferences/{id}/talks",
    tag = "conferences",
    params(("id" = Uuid, Path, description = "Conference ID")),
    responses(
        (status = 200, description = "Talks on the conference program", body = Vec<Talk>),
        (status = 404, description = "Conference not found")
    )
)]
pub async fn list_conference_talks(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Talk>>, ApiError> {
    let talks = Conference::talks(&pool, id).await?;

    Ok(Json(talks))
}

#[utoipa::path(
    post,
    path = "/conferences/{id}/talks/{talk_id}",
    tag = "conferences",
    params(
        ("id" = Uuid, Path, description = "Conference ID"),
        ("talk_id" = Uuid, Path, description = "Talk ID")
    ),
    responses(
        (status = 204, description = "Talk attached"),
        (status = 404, description = "Conference or talk not found"),
        (status = 409, description = "Talk already attached")
    )
)]
pub async fn attach_conference_talk(
    State(pool): State<SqlitePool>,
    Path((id, talk_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    Conference::attach_talk(&pool, id, talk_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/conferences/{id}/talks/{talk_id}",
    tag = "conferences",
    params(
        ("id" = Uuid, Path, description = "Conference ID"),
        ("talk_id" = Uuid, Path, description = "Talk ID")
    ),
    responses(
        (status = 204, description = "Talk detached"),
        (status = 404, description = "Conference not found or talk not attached")
    )
)]
pub async fn detach_conference_talk(
    State(pool): State<SqlitePool>,
    Path((id, talk_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    Conference::detach_talk(&pool, id, talk_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
