use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::{require, ValidationError};

/// Where an event takes place, in the coarse scheduling sense the admin
/// filters by. Shared by venues and conferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Us,
    Eu,
    Online,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Us, Region::Eu, Region::Online];

    pub fn label(self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Eu => "EU",
            Region::Online => "Online",
        }
    }
}

/// Venue response model
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub region: Option<Region>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request model for creating a venue
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVenue {
    pub name: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub region: Option<Region>,
}

impl CreateVenue {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("city", &self.city)?;
        require("country", &self.country)?;
        require("postal_code", &self.postal_code)
    }
}

/// Request model for updating a venue
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVenue {
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub region: Option<Region>,
}

impl UpdateVenue {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(city) = &self.city {
            require("city", city)?;
        }
        if let Some(country) = &self.country {
            require("country", country)?;
        }
        if let Some(postal_code) = &self.postal_code {
            require("postal_code", postal_code)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum VenueError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Venue not found")]
    NotFound,
}

const VENUE_COLUMNS: &str =
    "id, name, city, country, postal_code, region, created_at, updated_at";

impl Venue {
    pub async fn list(
        pool: &SqlitePool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Venue>, VenueError> {
        let venues = match search {
            Some(term) if !term.trim().is_empty() => {
                let pattern = format!("%{}%", term.trim());
                sqlx::query_as::<_, Venue>(&format!(
                    r#"
                    SELECT {VENUE_COLUMNS} FROM venues
                    WHERE name LIKE ?1 OR city LIKE ?1
                    ORDER BY name COLLATE NOCASE
                    LIMIT ?2 OFFSET ?3
                    "#
                ))
                .bind(pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Venue>(&format!(
                    r#"
                    SELECT {VENUE_COLUMNS} FROM venues
                    ORDER BY name COLLATE NOCASE
                    LIMIT ?1 OFFSET ?2
                    "#
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(venues)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Venue, VenueError> {
        sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(VenueError::NotFound)
    }

    pub async fn create(pool: &SqlitePool, payload: CreateVenue) -> Result<Venue, VenueError> {
        payload.validate()?;

        let venue = sqlx::query_as::<_, Venue>(&format!(
            r#"
            INSERT INTO venues (id, name, city, country, postal_code, region)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {VENUE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&payload.name)
        .bind(&payload.city)
        .bind(&payload.country)
        .bind(&payload.postal_code)
        .bind(payload.region)
        .fetch_one(pool)
        .await?;

        Ok(venue)
    }

    pub async fn update(pool: &SqlitePool, id: Uuid, payload: UpdateVenue) -> Result<Venue, VenueError> {
        payload.validate()?;

        let existing = Self::find_by_id(pool, id).await?;

        let venue = sqlx::query_as::<_, Venue>(&format!(
            r#"
            UPDATE venues
            SET name = ?1, city = ?2, country = ?3, postal_code = ?4, region = ?5,
                updated_at = datetime('now', 'subsec')
            WHERE id = ?6
            RETURNING {VENUE_COLUMNS}
            "#
        ))
        .bind(payload.name.unwrap_or(existing.name))
        .bind(payload.city.unwrap_or(existing.city))
        .bind(payload.country.unwrap_or(existing.country))
        .bind(payload.postal_code.unwrap_or(existing.postal_code))
        .bind(payload.region.or(existing.region))
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(venue)
    }

    /// Deleting a venue detaches it from any conference that pointed at it;
    /// the conferences themselves stay.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), VenueError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(VenueError::NotFound);
        }

        Ok(())
    }
}
