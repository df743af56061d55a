use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    CreateTalk, Notification, ReviewOutcome, SortDirection, Talk, TalkFilter, TalkRow, TalkSort,
    TalkSortField, UpdateTalk,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct TalkQuery {
    /// Search term matched against the talk title and the speaker name
    /// (accent-insensitive)
    pub search: Option<String>,
    /// Keep only new (true) or only previously given (false) talks
    pub new_talk: Option<bool>,
    /// Comma-separated list of speaker IDs
    pub speakers: Option<String>,
    /// When true, keep only talks whose speaker has an avatar
    pub has_avatar: Option<bool>,
    /// Sort column (default: created_at)
    pub sort: Option<TalkSortField>,
    /// Sort direction (default: asc)
    pub direction: Option<SortDirection>,
    /// Maximum number of results (default: 100)
    pub limit: Option<i64>,
    /// Number of results to skip (default: 0)
    pub offset: Option<i64>,
}

impl TalkQuery {
    /// The `speakers` parameter arrives as one comma-separated string; a
    /// malformed id fails the whole request instead of silently matching
    /// nothing.
    fn filter(&self) -> Result<TalkFilter, ApiError> {
        let speaker_ids = match self.speakers.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    Uuid::parse_str(s)
                        .map_err(|_| ApiError::bad_request(format!("invalid speaker id: {s}")))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(TalkFilter {
            search: self.search.clone(),
            new_talk: self.new_talk,
            speaker_ids,
            has_avatar: self.has_avatar,
        })
    }

    fn sort(&self) -> TalkSort {
        TalkSort {
            field: self.sort.unwrap_or_default(),
            direction: self.direction.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TalkCount {
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExportReceipt {
    pub rows: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkDeleteTalks {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkDeleteResult {
    pub deleted: u64,
}

#[utoipa::path(
    get,
    path = "/talks",
    tag = "talks",
    params(TalkQuery),
    responses(
        (status = 200, description = "List of talks with speaker columns", body = Vec<TalkRow>),
        (status = 400, description = "Malformed filter parameter"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_talks(
    State(pool): State<SqlitePool>,
    Query(query): Query<TalkQuery>,
) -> Result<Json<Vec<TalkRow>>, ApiError> {
    let filter = query.filter()?;
    let talks = Talk::list(
        &pool,
        &filter,
        query.sort(),
        query.limit.unwrap_or(100),
        query.offset.unwrap_or(0),
    )
    .await?;

    Ok(Json(talks))
}

#[utoipa::path(
    get,
    path = "/talks/count",
    tag = "talks",
    params(TalkQuery),
    responses(
        (status = 200, description = "Number of talks the filter matches", body = TalkCount),
        (status = 400, description = "Malformed filter parameter")
    )
)]
pub async fn count_talks(
    State(pool): State<SqlitePool>,
    Query(query): Query<TalkQuery>,
) -> Result<Json<TalkCount>, ApiError> {
    let filter = query.filter()?;
    let count = Talk::count(&pool, &filter).await?;

    Ok(Json(TalkCount { count }))
}

#[utoipa::path(
    post,
    path = "/talks/export",
    tag = "talks",
    params(TalkQuery),
    responses(
        (status = 200, description = "Export acknowledged with the row count", body = ExportReceipt),
        (status = 400, description = "Malformed filter parameter")
    )
)]
pub async fn export_talks(
    State(pool): State<SqlitePool>,
    Query(query): Query<TalkQuery>,
) -> Result<Json<ExportReceipt>, ApiError> {
    let filter = query.filter()?;
    let rows = Talk::export(&pool, &filter).await?;

    Ok(Json(ExportReceipt { rows }))
}

#[utoipa::path(
    get,
    path = "/talks/{id}",
    tag = "talks",
    params(("id" = Uuid, Path, description = "Talk ID")),
    responses(
        (status = 200, description = "Talk found", body = Talk),
        (status = 404, description = "Talk not found")
    )
)]
pub async fn get_talk(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<Json<Talk>, ApiError> {
    let talk = Talk::find_by_id(&pool, id).await?;

    Ok(Json(talk))
}

#[utoipa::path(
    post,
    path = "/talks",
    tag = "talks",
    request_body = CreateTalk,
    responses(
        (status = 201, description = "Talk created in submitted state", body = Talk),
        (status = 409, description = "Speaker does not exist"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_talk(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateTalk>,
) -> Result<(StatusCode, Json<Talk>), ApiError> {
    let talk = Talk::create(&pool, payload).await?;

    Ok((StatusCode::CREATED, Json(talk)))
}

#[utoipa::path(
    put,
    path = "/talks/{id}",
    tag = "talks",
    params(("id" = Uuid, Path, description = "Talk ID")),
    request_body = UpdateTalk,
    responses(
        (status = 200, description = "Talk updated", body = Talk),
        (status = 404, description = "Talk not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_talk(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTalk>,
) -> Result<Json<Talk>, ApiError> {
    let talk = Talk::update(&pool, id, payload).await?;

    Ok(Json(talk))
}

#[utoipa::path(
    delete,
    path = "/talks/{id}",
    tag = "talks",
    params(("id" = Uuid, Path, description = "Talk ID")),
    responses(
        (status = 204, description = "Talk deleted"),
        (status = 404, description = "Talk not found")
    )
)]
pub async fn delete_talk(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    Talk::delete(&pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/talks/bulk-delete",
    tag = "talks",
    request_body = BulkDeleteTalks,
    responses(
        (status = 200, description = "Selected talks deleted", body = BulkDeleteResult)
    )
)]
pub async fn bulk_delete_talks(
    State(pool): State<SqlitePool>,
    Json(payload): Json<BulkDeleteTalks>,
) -> Result<Json<BulkDeleteResult>, ApiError> {
    let deleted = Talk::delete_many(&pool, &payload.ids).await?;

    Ok(Json(BulkDeleteResult { deleted }))
}

#[utoipa::path(
    post,
    path = "/talks/{id}/approve",
    tag = "talks",
    params(("id" = Uuid, Path, description = "Talk ID")),
    responses(
        (status = 200, description = "Talk approved", body = ReviewOutcome),
        (status = 404, description = "Talk not found"),
        (status = 409, description = "Talk already reviewed")
    )
)]
pub async fn approve_talk(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewOutcome>, ApiError> {
    let talk = Talk::approve(&pool, id).await?;

    Ok(Json(ReviewOutcome {
        talk,
        notification: Notification::talk_approved(),
    }))
}

#[utoipa::path(
    post,
    path = "/talks/{id}/reject",
    tag = "talks",
    params(("id" = Uuid, Path, description = "Talk ID")),
    responses(
        (status = 200, description = "Talk rejected", body = ReviewOutcome),
        (status = 404, description = "Talk not found"),
        (status = 409, description = "Talk already reviewed")
    )
)]
pub async fn reject_talk(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewOutcome>, ApiError> {
    let talk = Talk::reject(&pool, id).await?;

    Ok(Json(ReviewOutcome {
        talk,
        notification: Notification::talk_rejected(),
    }))
}
