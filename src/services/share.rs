//! Public share links: token minting and the read-only projection.

use serde::Serialize;
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use crate::dates;
use crate::db::DbPool;
use crate::error::AppError;

const TOKEN_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PublicStop {
    pub city: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub position: i64,
}

/// Read-only projection of a shared trip. Deliberately carries no budget
/// or cost data.
#[derive(Debug, Clone, Serialize)]
pub struct PublicTrip {
    pub title: String,
    pub stops: Vec<PublicStop>,
    pub total_days: i64,
}

#[derive(Clone)]
pub struct ShareService {
    db: DbPool,
}

impl ShareService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Mark the trip public and assign it an opaque token, retrying a
    /// bounded number of times if the generated token is already taken.
    pub async fn mint_token(&self, trip_id: i64) -> Result<String, AppError> {
        for attempt in 1..=TOKEN_ATTEMPTS {
            let token = Uuid::new_v4().simple().to_string();
            let update = sqlx::query("UPDATE trips SET is_public = 1, share_token = ?1 WHERE id = ?2")
                .bind(&token)
                .bind(trip_id)
                .execute(&self.db)
                .await;
            match update {
                Ok(result) if result.rows_affected() == 0 => return Err(AppError::NotFound),
                Ok(_) => return Ok(token),
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    warn!("share token collision on attempt {attempt}, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(AppError::Other(anyhow::anyhow!(
            "could not mint a unique share token after {TOKEN_ATTEMPTS} attempts"
        )))
    }

    /// Look up a shared trip by token. A token pointing at a private trip
    /// and a token that matches nothing produce the same not-found signal,
    /// so callers cannot probe for a trip's existence.
    pub async fn public_view(&self, share_token: &str) -> Result<PublicTrip, AppError> {
        let trip: Option<(i64, String, String, String)> = sqlx::query_as(
            "SELECT id, title, start_date, end_date FROM trips WHERE share_token = ?1 AND is_public = 1",
        )
        .bind(share_token)
        .fetch_optional(&self.db)
        .await?;
        let (trip_id, title, start_date, end_date) = trip.ok_or(AppError::NotFound)?;
        let total_days = dates::trip_days(&start_date, &end_date)?;

        let stops: Vec<PublicStop> = sqlx::query_as(
            r#"
            SELECT c.name AS city, s.start_date, s.end_date, s.position
            FROM stops s
            LEFT JOIN cities c ON c.id = s.city_id
            WHERE s.trip_id = ?1
            ORDER BY s.position ASC
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PublicTrip {
            title,
            stops,
            total_days,
        })
    }
}
