use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::SqlitePool;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::{normalize_name, require, validate_email, ValidationError};

/// Upload ceiling for speaker avatars, published to the admin UI so its
/// upload widget can reject files before they reach the server.
pub const AVATAR_MAX_BYTES: u64 = 2 * 1024 * 1024;

/// Closed vocabulary of speaker qualifications. The admin UI renders these
/// as a checkbox list; anything outside the set is rejected at the JSON
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Qualification {
    BusinessLeader,
    Charisma,
    FirstTime,
    HometownHero,
    Humanitarian,
    LaracastsContributor,
    TwitterInfluencer,
    YoutubeInfluencer,
    OpenSource,
    UniquePerspective,
}

impl Qualification {
    pub const ALL: [Qualification; 10] = [
        Qualification::BusinessLeader,
        Qualification::Charisma,
        Qualification::FirstTime,
        Qualification::HometownHero,
        Qualification::Humanitarian,
        Qualification::LaracastsContributor,
        Qualification::TwitterInfluencer,
        Qualification::YoutubeInfluencer,
        Qualification::OpenSource,
        Qualification::UniquePerspective,
    ];

    /// Human-readable label shown next to the checkbox.
    pub fn label(self) -> &'static str {
        match self {
            Qualification::BusinessLeader => "Business Leader",
            Qualification::Charisma => "Charismatic Speaker",
            Qualification::FirstTime => "First Time Speaker",
            Qualification::HometownHero => "Hometown Hero",
            Qualification::Humanitarian => "Works in Humanitarian Field",
            Qualification::LaracastsContributor => "Laracasts Contributor",
            Qualification::TwitterInfluencer => "Large Twitter Following",
            Qualification::YoutubeInfluencer => "Large YouTube Following",
            Qualification::OpenSource => "Open Source Creator / Maintainer",
            Qualification::UniquePerspective => "Unique Perspective",
        }
    }
}

/// Speaker response model
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Speaker {
    pub id: Uuid,
    pub name: String,
    pub normalized_name: String,
    pub email: String,
    /// Path reference to the uploaded avatar; the upload pipeline itself
    /// lives in the admin UI.
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub twitter_handle: Option<String>,
    #[schema(value_type = Vec<Qualification>)]
    pub qualifications: Json<Vec<Qualification>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request model for creating a new speaker
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSpeaker {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub twitter_handle: Option<String>,
    #[serde(default)]
    pub qualifications: Vec<Qualification>,
}

impl CreateSpeaker {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        validate_email("email", &self.email)
    }
}

/// Request model for updating a speaker
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSpeaker {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub twitter_handle: Option<String>,
    pub qualifications: Option<Vec<Qualification>>,
}

impl UpdateSpeaker {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SpeakerError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Speaker not found")]
    NotFound,
    #[error("Speaker still has talks")]
    HasTalks,
}

impl Speaker {
    /// Speakers ordered by name, optionally narrowed by a search term that
    /// matches the accent-insensitive name or the raw email.
    pub async fn list(
        pool: &SqlitePool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Speaker>, SpeakerError> {
        let speakers = if let Some(search) = search {
            let name_pattern = format!("%{}%", normalize_name(search));
            let email_pattern = format!("%{}%", search);
            sqlx::query_as::<_, Speaker>(
                r#"
                SELECT id, name, normalized_name, email, avatar, bio, twitter_handle,
                       qualifications, created_at, updated_at
                FROM speakers
                WHERE normalized_name LIKE ?1 OR email LIKE ?2
                ORDER BY name COLLATE NOCASE
                LIMIT ?3 OFFSET ?4
                "#,
            )
            .bind(name_pattern)
            .bind(email_pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        } else {
            sqlx::query_as::<_, Speaker>(
                r#"
                SELECT id, name, normalized_name, email, avatar, bio, twitter_handle,
                       qualifications, created_at, updated_at
                FROM speakers
                ORDER BY name COLLATE NOCASE
                LIMIT ?1 OFFSET ?2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        };

        Ok(speakers)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Speaker, SpeakerError> {
        sqlx::query_as::<_, Speaker>(
            r#"
            SELECT id, name, normalized_name, email, avatar, bio, twitter_handle,
                   qualifications, created_at, updated_at
            FROM speakers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(SpeakerError::NotFound)
    }

    pub async fn create(pool: &SqlitePool, payload: CreateSpeaker) -> Result<Speaker, SpeakerError> {
        payload.validate()?;

        let speaker = sqlx::query_as::<_, Speaker>(
            r#"
            INSERT INTO speakers (id, name, normalized_name, email, avatar, bio, twitter_handle, qualifications)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING id, name, normalized_name, email, avatar, bio, twitter_handle,
                      qualifications, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&payload.name)
        .bind(normalize_name(&payload.name))
        .bind(&payload.email)
        .bind(&payload.avatar)
        .bind(&payload.bio)
        .bind(&payload.twitter_handle)
        .bind(Json(&payload.qualifications))
        .fetch_one(pool)
        .await?;

        Ok(speaker)
    }

    /// Merge-style update: absent fields keep their stored value. The
    /// normalized name is recomputed whenever the name changes.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        payload: UpdateSpeaker,
    ) -> Result<Speaker, SpeakerError> {
        payload.validate()?;

        let existing = Self::find_by_id(pool, id).await?;

        let name = payload.name.unwrap_or(existing.name);
        let normalized = normalize_name(&name);
        let qualifications = payload
            .qualifications
            .map(Json)
            .unwrap_or(existing.qualifications);

        let speaker = sqlx::query_as::<_, Speaker>(
            r#"
            UPDATE speakers
            SET name = ?1, normalized_name = ?2, email = ?3, avatar = ?4, bio = ?5,
                twitter_handle = ?6, qualifications = ?7, updated_at = datetime('now', 'subsec')
            WHERE id = ?8
            RETURNING id, name, normalized_name, email, avatar, bio, twitter_handle,
                      qualifications, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&normalized)
        .bind(payload.email.unwrap_or(existing.email))
        .bind(payload.avatar.or(existing.avatar))
        .bind(payload.bio.or(existing.bio))
        .bind(payload.twitter_handle.or(existing.twitter_handle))
        .bind(qualifications)
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(speaker)
    }

    /// Deleting a speaker who still owns talks is refused; the foreign key
    /// on talks.speaker_id surfaces as [`SpeakerError::HasTalks`].
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), SpeakerError> {
        let result = sqlx::query("DELETE FROM speakers WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db)
                    if db.kind() == sqlx::error::ErrorKind::ForeignKeyViolation =>
                {
                    SpeakerError::HasTalks
                }
                other => SpeakerError::Database(other),
            })?;

        if result.rows_affected() == 0 {
            return Err(SpeakerError::NotFound);
        }

        Ok(())
    }
}
