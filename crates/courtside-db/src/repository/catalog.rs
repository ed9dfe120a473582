//! # Catalog Repository
//!
//! Venues and coach profiles. Their full CRUD lives outside the booking
//! core; this repository reads them for pricing and matching and inserts
//! them for seeding and tests.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{BookingResult, DbResult};
use courtside_core::validation::{validate_name, validate_rate};
use courtside_core::{CoachProfile, Venue};

/// Repository for venue and coach profile reads.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Venues
    // =========================================================================

    /// Gets a venue by ID.
    pub async fn venue(&self, id: &str) -> DbResult<Option<Venue>> {
        let mut conn = self.pool.acquire().await?;
        Self::venue_in(&mut conn, id).await
    }

    pub(crate) async fn venue_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Venue>> {
        let venue = sqlx::query_as::<_, Venue>(
            r#"
            SELECT id, owner_id, name, city, rate
            FROM venues
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(venue)
    }

    /// Lists every venue, by name.
    pub async fn list_venues(&self) -> DbResult<Vec<Venue>> {
        let venues = sqlx::query_as::<_, Venue>(
            r#"
            SELECT id, owner_id, name, city, rate
            FROM venues
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(venues)
    }

    /// Inserts a venue.
    pub async fn insert_venue(
        &self,
        owner_id: &str,
        name: &str,
        city: &str,
        rate: i64,
    ) -> BookingResult<Venue> {
        validate_name("name", name)?;
        validate_name("city", city)?;
        validate_rate("rate", rate)?;

        let venue = Venue {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: name.trim().to_string(),
            city: city.trim().to_string(),
            rate,
        };

        debug!(id = %venue.id, name = %venue.name, "Inserting venue");

        sqlx::query(
            r#"
            INSERT INTO venues (id, owner_id, name, city, rate, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&venue.id)
        .bind(&venue.owner_id)
        .bind(&venue.name)
        .bind(&venue.city)
        .bind(venue.rate)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(venue)
    }

    // =========================================================================
    // Coaches
    // =========================================================================

    /// Gets a coach profile by ID.
    pub async fn coach(&self, id: &str) -> DbResult<Option<CoachProfile>> {
        let mut conn = self.pool.acquire().await?;
        Self::coach_in(&mut conn, id).await
    }

    pub(crate) async fn coach_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<CoachProfile>> {
        let coach = sqlx::query_as::<_, CoachProfile>(
            r#"
            SELECT id, user_id, name, rate, service_areas, is_verified
            FROM coach_profiles
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(coach)
    }

    /// Inserts a coach profile. `service_areas` are joined with commas.
    pub async fn insert_coach(
        &self,
        user_id: &str,
        name: &str,
        rate: i64,
        service_areas: &[&str],
        is_verified: bool,
    ) -> BookingResult<CoachProfile> {
        validate_name("name", name)?;
        validate_rate("rate", rate)?;

        let coach = CoachProfile {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.trim().to_string(),
            rate,
            service_areas: service_areas
                .iter()
                .map(|area| area.trim())
                .filter(|area| !area.is_empty())
                .collect::<Vec<_>>()
                .join(","),
            is_verified,
        };

        debug!(id = %coach.id, name = %coach.name, "Inserting coach profile");

        sqlx::query(
            r#"
            INSERT INTO coach_profiles (
                id, user_id, name, rate, service_areas, is_verified, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&coach.id)
        .bind(&coach.user_id)
        .bind(&coach.name)
        .bind(coach.rate)
        .bind(&coach.service_areas)
        .bind(coach.is_verified)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(coach)
    }
}
