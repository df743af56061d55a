use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::speaker::Speaker;
use crate::models::talk::Talk;
use crate::models::venue::Region;
use crate::utils::{require, ValidationError};

/// Conference response model
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Conference {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub region: Option<Region>,
    pub venue_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request model for creating a conference
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateConference {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub region: Option<Region>,
    pub venue_id: Option<Uuid>,
}

impl CreateConference {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        check_dates(self.start_date, self.end_date)
    }
}

/// Request model for updating a conference
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateConference {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub region: Option<Region>,
    pub venue_id: Option<Uuid>,
}

impl UpdateConference {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        Ok(())
    }
}

/// The merged date pair must stay ordered, whichever side supplied it.
fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ValidationError::new(
                "end_date",
                "must not be before start_date",
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum ConferenceError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Conference not found")]
    NotFound,
    #[error("Venue not found")]
    VenueNotFound,
    #[error("Speaker not found")]
    SpeakerNotFound,
    #[error("Talk not found")]
    TalkNotFound,
    #[error("Speaker is already attached to this conference")]
    SpeakerAlreadyAttached,
    #[error("Talk is already attached to this conference")]
    TalkAlreadyAttached,
    #[error("Speaker is not attached to this conference")]
    SpeakerNotAttached,
    #[error("Talk is not attached to this conference")]
    TalkNotAttached,
}

/// Turn the FK failure a dangling `venue_id` causes into its own variant.
fn map_venue_fk(err: sqlx::Error) -> ConferenceError {
    match err {
        sqlx::Error::Database(db)
            if db.kind() == sqlx::error::ErrorKind::ForeignKeyViolation =>
        {
            ConferenceError::VenueNotFound
        }
        other => ConferenceError::Database(other),
    }
}

impl Conference {
    pub async fn list(
        pool: &SqlitePool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Conference>, ConferenceError> {
        let conferences = if let Some(search) = search {
            let pattern = format!("%{}%", search);
            sqlx::query_as::<_, Conference>(
                r#"
                SELECT id, name, description, start_date, end_date, region, venue_id,
                       created_at, updated_at
                FROM conferences
                WHERE name LIKE ?1
                ORDER BY name COLLATE NOCASE
                LIMIT ?2 OFFSET ?3
                "#,
            )
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        } else {
            sqlx::query_as::<_, Conference>(
                r#"
                SELECT id, name, description, start_date, end_date, region, venue_id,
                       created_at, updated_at
                FROM conferences
                ORDER BY name COLLATE NOCASE
                LIMIT ?1 OFFSET ?2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        };

        Ok(conferences)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Conference, ConferenceError> {
        sqlx::query_as::<_, Conference>(
            r#"
            SELECT id, name, description, start_date, end_date, region, venue_id,
                   created_at, updated_at
            FROM conferences
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ConferenceError::NotFound)
    }

    pub async fn create(
        pool: &SqlitePool,
        payload: CreateConference,
    ) -> Result<Conference, ConferenceError> {
        payload.validate()?;

        let conference = sqlx::query_as::<_, Conference>(
            r#"
            INSERT INTO conferences (id, name, description, start_date, end_date, region, venue_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, name, description, start_date, end_date, region, venue_id,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.region)
        .bind(payload.venue_id)
        .fetch_one(pool)
        .await
        .map_err(map_venue_fk)?;

        Ok(conference)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        payload: UpdateConference,
    ) -> Result<Conference, ConferenceError> {
        payload.validate()?;

        let existing = Self::find_by_id(pool, id).await?;

        let start_date = payload.start_date.or(existing.start_date);
        let end_date = payload.end_date.or(existing.end_date);
        check_dates(start_date, end_date)?;

        let conference = sqlx::query_as::<_, Conference>(
            r#"
            UPDATE conferences
            SET name = ?1, description = ?2, start_date = ?3, end_date = ?4,
                region = ?5, venue_id = ?6, updated_at = datetime('now', 'subsec')
            WHERE id = ?7
            RETURNING id, name, description, start_date, end_date, region, venue_id,
                      created_at, updated_at
            "#,
        )
        .bind(payload.name.unwrap_or(existing.name))
        .bind(payload.description.or(existing.description))
        .bind(start_date)
        .bind(end_date)
        .bind(payload.region.or(existing.region))
        .bind(payload.venue_id.or(existing.venue_id))
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(map_venue_fk)?;

        Ok(conference)
    }

    /// Deleting a conference drops its speaker and talk attachments with it;
    /// the speakers and talks themselves are untouched.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), ConferenceError> {
        let result = sqlx::query("DELETE FROM conferences WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ConferenceError::NotFound);
        }

        Ok(())
    }

    pub async fn speakers(
        pool: &SqlitePool,
        conference_id: Uuid,
    ) -> Result<Vec<Speaker>, ConferenceError> {
        Self::find_by_id(pool, conference_id).await?;

        let speakers = sqlx::query_as::<_, Speaker>(
            r#"
            SELECT speakers.id, speakers.name, speakers.normalized_name, speakers.email,
                   speakers.avatar, speakers.bio, speakers.twitter_handle,
                   speakers.qualifications, speakers.created_at, speakers.updated_at
            FROM speakers
            INNER JOIN conference_speaker ON conference_speaker.speaker_id = speakers.id
            WHERE conference_speaker.conference_id = ?1
            ORDER BY speakers.name COLLATE NOCASE
            "#,
        )
        .bind(conference_id)
        .fetch_all(pool)
        .await?;

        Ok(speakers)
    }

    /// Attach a speaker to the line-up. `INSERT OR IGNORE` only suppresses
    /// the duplicate-key failure; a dangling speaker id still surfaces as a
    /// foreign key error, which is how the two cases are told apart.
    pub async fn attach_speaker(
        pool: &SqlitePool,
        conference_id: Uuid,
        speaker_id: Uuid,
    ) -> Result<(), ConferenceError> {
        Self::find_by_id(pool, conference_id).await?;

        let result = sqlx::query(
            "INSERT OR IGNORE INTO conference_speaker (conference_id, speaker_id) VALUES (?1, ?2)",
        )
        .bind(conference_id)
        .bind(speaker_id)
        .execute(pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db)
                if db.kind() == sqlx::error::ErrorKind::ForeignKeyViolation =>
            {
                ConferenceError::SpeakerNotFound
            }
            other => ConferenceError::Database(other),
        })?;

        if result.rows_affected() == 0 {
            return Err(ConferenceError::SpeakerAlreadyAttached);
        }

        Ok(())
    }

    pub async fn detach_speaker(
        pool: &SqlitePool,
        conference_id: Uuid,
        speaker_id: Uuid,
    ) -> Result<(), ConferenceError> {
        Self::find_by_id(pool, conference_id).await?;

        let result = sqlx::query(
            "DELETE FROM conference_speaker WHERE conference_id = ?1 AND speaker_id = ?2",
        )
        .bind(conference_id)
        .bind(speaker_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ConferenceError::SpeakerNotAttached);
        }

        Ok(())
    }

    pub async fn talks(
        pool: &SqlitePool,
        conference_id: Uuid,
    ) -> Result<Vec<Talk>, ConferenceError> {
        Self::find_by_id(pool, conference_id).await?;

        let talks = sqlx::query_as::<_, Talk>(
            r#"
            SELECT talks.id, talks.title, talks.abstract, talks.speaker_id, talks.status,
                   talks.length, talks.new_talk, talks.created_at, talks.updated_at
            FROM talks
            INNER JOIN conference_talk ON conference_talk.talk_id = talks.id
            WHERE conference_talk.conference_id = ?1
            ORDER BY talks.title COLLATE NOCASE
            "#,
        )
        .bind(conference_id)
        .fetch_all(pool)
        .await?;

        Ok(talks)
    }

    pub async fn attach_talk(
        pool: &SqlitePool,
        conference_id: Uuid,
        talk_id: Uuid,
    ) -> Result<(), ConferenceError> {
        Self::find_by_id(pool, conference_id).await?;

        let result = sqlx::query(
            "INSERT OR IGNORE INTO conference_talk (conference_id, talk_id) VALUES (?1, ?2)",
        )
        .bind(conference_id)
        .bind(talk_id)
        .execute(pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db)
                if db.kind() == sqlx::error::ErrorKind::ForeignKeyViolation =>
            {
                ConferenceError::TalkNotFound
            }
            other => ConferenceError::Database(other),
        })?;

        if result.rows_affected() == 0 {
            return Err(ConferenceError::TalkAlreadyAttached);
        }

        Ok(())
    }

    pub async fn detach_talk(
        pool: &SqlitePool,
        conference_id: Uuid,
        talk_id: Uuid,
    ) -> Result<(), ConferenceError> {
        Self::find_by_id(pool, conference_id).await?;

        let result = sqlx::query(
            "DELETE FROM conference_talk WHERE conference_id = ?1 AND talk_id = ?2",
        )
        .bind(conference_id)
        .bind(talk_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ConferenceError::TalkNotAttached);
        }

        Ok(())
    }
}
