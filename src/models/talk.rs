use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::{normalize_name, require, ValidationError};

/// Review state of a talk. `Submitted` is the only state a talk can be
/// created in and the only state a review decision can leave from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TalkStatus {
    Submitted,
    Approved,
    Rejected,
}

impl TalkStatus {
    pub const ALL: [TalkStatus; 3] = [
        TalkStatus::Submitted,
        TalkStatus::Approved,
        TalkStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TalkStatus::Submitted => "submitted",
            TalkStatus::Approved => "approved",
            TalkStatus::Rejected => "rejected",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TalkStatus::Submitted => "Submitted",
            TalkStatus::Approved => "Approved",
            TalkStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for TalkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot format of a talk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TalkLength {
    Normal,
    Lightning,
    Keynote,
}

impl TalkLength {
    pub const ALL: [TalkLength; 3] = [
        TalkLength::Normal,
        TalkLength::Lightning,
        TalkLength::Keynote,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TalkLength::Normal => "Normal",
            TalkLength::Lightning => "Lightning",
            TalkLength::Keynote => "Keynote",
        }
    }
}

/// Talk response model
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Talk {
    pub id: Uuid,
    pub title: String,
    #[sqlx(rename = "abstract")]
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub speaker_id: Uuid,
    pub status: TalkStatus,
    pub length: TalkLength,
    pub new_talk: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Talk list row: the talk joined with the speaker columns the admin table
/// renders (name for the text column, avatar for the image column).
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct TalkRow {
    pub id: Uuid,
    pub title: String,
    #[sqlx(rename = "abstract")]
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub speaker_id: Uuid,
    pub speaker_name: String,
    pub speaker_avatar: Option<String>,
    pub status: TalkStatus,
    pub length: TalkLength,
    pub new_talk: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request model for creating a talk. Talks always start out `submitted`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTalk {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub speaker_id: Uuid,
    pub length: Option<TalkLength>,
    pub new_talk: Option<bool>,
}

impl CreateTalk {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("abstract", &self.abstract_text)
    }
}

/// Request model for updating a talk. Carries neither `speaker_id` nor
/// `status`: a talk cannot move to another speaker, and status only changes
/// through [`Talk::approve`] and [`Talk::reject`].
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTalk {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub length: Option<TalkLength>,
    pub new_talk: Option<bool>,
}

impl UpdateTalk {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            require("title", title)?;
        }
        if let Some(abstract_text) = &self.abstract_text {
            require("abstract", abstract_text)?;
        }
        Ok(())
    }
}

/// Caller-supplied predicate for list/count/export. Every query carries its
/// own filter; the server keeps no per-operator table state.
#[derive(Debug, Clone, Default)]
pub struct TalkFilter {
    /// Containment match over the talk title (case-insensitive) and the
    /// speaker name (accent-insensitive via the normalized form).
    pub search: Option<String>,
    /// Ternary: `Some(true)` new talks only, `Some(false)` existing talks
    /// only, `None` no filtering.
    pub new_talk: Option<bool>,
    /// Empty set means no filtering.
    pub speaker_ids: Vec<Uuid>,
    /// `Some(true)` keeps talks whose speaker has an avatar; anything else
    /// filters nothing, matching the checkbox the admin UI shows.
    pub has_avatar: Option<bool>,
}

/// Sortable columns. Sort input never reaches the SQL string raw; each
/// variant maps to a fixed column expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TalkSortField {
    Title,
    SpeakerName,
    Status,
    Length,
    NewTalk,
    #[default]
    CreatedAt,
}

impl TalkSortField {
    fn column(self) -> &'static str {
        match self {
            TalkSortField::Title => "talks.title COLLATE NOCASE",
            TalkSortField::SpeakerName => "speakers.name COLLATE NOCASE",
            TalkSortField::Status => "talks.status",
            TalkSortField::Length => "talks.length",
            TalkSortField::NewTalk => "talks.new_talk",
            TalkSortField::CreatedAt => "talks.created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => " ASC",
            SortDirection::Desc => " DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TalkSort {
    pub field: TalkSortField,
    pub direction: SortDirection,
}

#[derive(Debug, Error)]
pub enum TalkError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Talk not found")]
    NotFound,
    #[error("Speaker not found")]
    SpeakerNotFound,
    #[error("Talk is already {0}")]
    InvalidTransition(TalkStatus),
}

const TALK_COLUMNS: &str =
    "id, title, abstract, speaker_id, status, length, new_talk, created_at, updated_at";

const ROW_COLUMNS: &str = "talks.id, talks.title, talks.abstract, talks.speaker_id, \
     speakers.name AS speaker_name, speakers.avatar AS speaker_avatar, \
     talks.status, talks.length, talks.new_talk, talks.created_at, talks.updated_at";

const FILTER_BASE: &str =
    " FROM talks INNER JOIN speakers ON speakers.id = talks.speaker_id WHERE 1=1";

/// Append the WHERE clauses for `filter`. Shared by list, count and export
/// so the three can never disagree about what a filter means.
fn apply_filter(qb: &mut QueryBuilder<'static, Sqlite>, filter: &TalkFilter) {
    if let Some(search) = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        qb.push(" AND (talks.title LIKE ")
            .push_bind(format!("%{}%", search))
            .push(" OR speakers.normalized_name LIKE ")
            .push_bind(format!("%{}%", normalize_name(search)))
            .push(")");
    }

    if let Some(new_talk) = filter.new_talk {
        qb.push(" AND talks.new_talk = ").push_bind(new_talk);
    }

    if !filter.speaker_ids.is_empty() {
        qb.push(" AND talks.speaker_id IN (");
        let mut ids = qb.separated(", ");
        for id in &filter.speaker_ids {
            ids.push_bind(*id);
        }
        qb.push(")");
    }

    if filter.has_avatar == Some(true) {
        qb.push(" AND speakers.avatar IS NOT NULL");
    }
}

impl Talk {
    /// Filtered, sorted, paginated list rows. Ties on the sort column are
    /// broken by talk id so the order is stable across requests.
    pub async fn list(
        pool: &SqlitePool,
        filter: &TalkFilter,
        sort: TalkSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TalkRow>, TalkError> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {ROW_COLUMNS}{FILTER_BASE}"));
        apply_filter(&mut qb, filter);

        qb.push(" ORDER BY ")
            .push(sort.field.column())
            .push(sort.direction.sql())
            .push(", talks.id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = qb.build_query_as::<TalkRow>().fetch_all(pool).await?;
        Ok(rows)
    }

    /// Number of talks matching `filter`; always equals the length of the
    /// unpaginated [`Talk::list`] result for the same filter.
    pub async fn count(pool: &SqlitePool, filter: &TalkFilter) -> Result<i64, TalkError> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*){FILTER_BASE}"));
        apply_filter(&mut qb, filter);

        let total = qb.build_query_scalar::<i64>().fetch_one(pool).await?;
        Ok(total)
    }

    /// Export action: reports how many rows the current filter selects and
    /// leaves an audit line. The heavy lifting lives in the external
    /// exporter; this endpoint only feeds it the count.
    pub async fn export(pool: &SqlitePool, filter: &TalkFilter) -> Result<i64, TalkError> {
        let total = Self::count(pool, filter).await?;
        tracing::info!(rows = total, "talk export requested");
        Ok(total)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Talk, TalkError> {
        sqlx::query_as::<_, Talk>(&format!(
            "SELECT {TALK_COLUMNS} FROM talks WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(TalkError::NotFound)
    }

    /// Create a talk in `submitted` state. The speaker is checked first so a
    /// dangling reference fails cleanly before anything is written.
    pub async fn create(pool: &SqlitePool, payload: CreateTalk) -> Result<Talk, TalkError> {
        payload.validate()?;

        let speaker_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM speakers WHERE id = ?1")
                .bind(payload.speaker_id)
                .fetch_one(pool)
                .await?;
        if speaker_exists == 0 {
            return Err(TalkError::SpeakerNotFound);
        }

        let talk = sqlx::query_as::<_, Talk>(&format!(
            r#"
            INSERT INTO talks (id, title, abstract, speaker_id, status, length, new_talk)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING {TALK_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&payload.title)
        .bind(&payload.abstract_text)
        .bind(payload.speaker_id)
        .bind(TalkStatus::Submitted)
        .bind(payload.length.unwrap_or(TalkLength::Normal))
        .bind(payload.new_talk.unwrap_or(false))
        .fetch_one(pool)
        .await?;

        Ok(talk)
    }

    /// Merge-style update of the editable columns. Status and speaker are
    /// not editable here by construction.
    pub async fn update(pool: &SqlitePool, id: Uuid, payload: UpdateTalk) -> Result<Talk, TalkError> {
        payload.validate()?;

        let existing = Self::find_by_id(pool, id).await?;

        let talk = sqlx::query_as::<_, Talk>(&format!(
            r#"
            UPDATE talks
            SET title = ?1, abstract = ?2, length = ?3, new_talk = ?4,
                updated_at = datetime('now', 'subsec')
            WHERE id = ?5
            RETURNING {TALK_COLUMNS}
            "#
        ))
        .bind(payload.title.unwrap_or(existing.title))
        .bind(payload.abstract_text.unwrap_or(existing.abstract_text))
        .bind(payload.length.unwrap_or(existing.length))
        .bind(payload.new_talk.unwrap_or(existing.new_talk))
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(talk)
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), TalkError> {
        let result = sqlx::query("DELETE FROM talks WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TalkError::NotFound);
        }

        Ok(())
    }

    /// Bulk delete for the table's row selection; returns how many talks
    /// actually went away. Unknown ids are skipped, not an error.
    pub async fn delete_many(pool: &SqlitePool, ids: &[Uuid]) -> Result<u64, TalkError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM talks WHERE id IN (");
        let mut list = qb.separated(", ");
        for id in ids {
            list.push_bind(*id);
        }
        qb.push(")");

        let result = qb.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn approve(pool: &SqlitePool, id: Uuid) -> Result<Talk, TalkError> {
        Self::transition(pool, id, TalkStatus::Approved).await
    }

    pub async fn reject(pool: &SqlitePool, id: Uuid) -> Result<Talk, TalkError> {
        Self::transition(pool, id, TalkStatus::Rejected).await
    }

    /// Review decision as a single compare-and-set: the UPDATE only matches
    /// while the talk is still `submitted`, so of two concurrent reviewers
    /// exactly one wins and the other sees [`TalkError::InvalidTransition`].
    async fn transition(pool: &SqlitePool, id: Uuid, to: TalkStatus) -> Result<Talk, TalkError> {
        let updated = sqlx::query_as::<_, Talk>(&format!(
            r#"
            UPDATE talks
            SET status = ?1, updated_at = datetime('now', 'subsec')
            WHERE id = ?2 AND status = ?3
            RETURNING {TALK_COLUMNS}
            "#
        ))
        .bind(to)
        .bind(id)
        .bind(TalkStatus::Submitted)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(talk) => {
                tracing::info!(talk_id = %talk.id, status = %talk.status, "talk review recorded");
                Ok(talk)
            }
            None => {
                // Either the talk does not exist or it already left
                // `submitted`; a second read tells the two apart.
                let current = Self::find_by_id(pool, id).await?;
                Err(TalkError::InvalidTransition(current.status))
            }
        }
    }
}
