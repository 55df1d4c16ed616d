//! Stop ordering: contiguous 1-based positions per trip, atomic append and
//! transactional bulk reorder.

use crate::dates;
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::stop::{Stop, StopWithCity};
use crate::models::trip::Trip;

#[derive(Debug, Clone)]
pub struct NewStop {
    pub city_id: Option<i64>,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
    pub budget: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct StopChanges {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub budget: Option<i64>,
    pub position: Option<i64>,
}

impl StopChanges {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.description.is_none()
            && self.budget.is_none()
            && self.position.is_none()
    }
}

#[derive(Clone)]
pub struct PositionManager {
    db: DbPool,
}

impl PositionManager {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Append a stop to a trip. The next position is computed by the insert
    /// statement itself, so two concurrent appends for the same trip cannot
    /// observe the same maximum.
    pub async fn append_stop(&self, trip: &Trip, new: NewStop) -> Result<StopWithCity, AppError> {
        dates::ensure_within_trip(
            &trip.start_date,
            &trip.end_date,
            &new.start_date,
            &new.end_date,
        )?;
        if let Some(city_id) = new.city_id {
            let known: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cities WHERE id = ?1)")
                .bind(city_id)
                .fetch_one(&self.db)
                .await?;
            if !known {
                return Err(AppError::BadRequest("unknown city_id".into()));
            }
        }

        let result = sqlx::query(
            r#"
            INSERT INTO stops (trip_id, city_id, start_date, end_date, position, description, budget)
            VALUES (?1, ?2, ?3, ?4,
                    (SELECT COALESCE(MAX(position), 0) + 1 FROM stops WHERE trip_id = ?1),
                    ?5, ?6)
            "#,
        )
        .bind(trip.id)
        .bind(new.city_id)
        .bind(&new.start_date)
        .bind(&new.end_date)
        .bind(new.description.as_deref())
        .bind(new.budget)
        .execute(&self.db)
        .await?;

        let stop: StopWithCity = sqlx::query_as(
            r#"
            SELECT s.id, s.city_id, c.name AS city_name, c.country, s.start_date,
                   s.end_date, s.position, s.description, s.budget
            FROM stops s
            LEFT JOIN cities c ON c.id = s.city_id
            WHERE s.id = ?1
            "#,
        )
        .bind(result.last_insert_rowid())
        .fetch_one(&self.db)
        .await?;
        Ok(stop)
    }

    /// Reassign each listed stop's position to its 1-based index in the
    /// list, as one all-or-nothing unit. Updates are guarded by trip
    /// ownership, so ids belonging to another trip are left untouched.
    pub async fn reorder(&self, trip_id: i64, ordered_stop_ids: &[i64]) -> Result<(), AppError> {
        if ordered_stop_ids.is_empty() {
            return Err(AppError::BadRequest(
                "ordered_stop_ids must not be empty".into(),
            ));
        }
        if ordered_stop_ids.iter().any(|id| *id <= 0) {
            return Err(AppError::BadRequest(
                "ordered_stop_ids must be positive identifiers".into(),
            ));
        }

        let mut tx = self.db.begin().await?;
        for (index, stop_id) in ordered_stop_ids.iter().enumerate() {
            sqlx::query("UPDATE stops SET position = ?1 WHERE id = ?2 AND trip_id = ?3")
                .bind(index as i64 + 1)
                .bind(*stop_id)
                .bind(trip_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Update a stop's dates, description, budget or position. Date changes
    /// are validated against the owning trip's range, combining a partial
    /// change with the stored value for the other bound.
    pub async fn update_stop(
        &self,
        trip: &Trip,
        stop: &Stop,
        changes: &StopChanges,
    ) -> Result<(), AppError> {
        if changes.is_empty() {
            return Err(AppError::BadRequest("nothing to update".into()));
        }
        let start_date = changes.start_date.as_deref().unwrap_or(&stop.start_date);
        let end_date = changes.end_date.as_deref().unwrap_or(&stop.end_date);
        dates::ensure_within_trip(&trip.start_date, &trip.end_date, start_date, end_date)?;
        if let Some(position) = changes.position {
            if position < 1 {
                return Err(AppError::BadRequest("position must be 1 or greater".into()));
            }
        }

        sqlx::query(
            r#"
            UPDATE stops
            SET start_date = ?1,
                end_date = ?2,
                description = COALESCE(?3, description),
                budget = COALESCE(?4, budget),
                position = COALESCE(?5, position)
            WHERE id = ?6
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .bind(changes.description.as_deref())
        .bind(changes.budget)
        .bind(changes.position)
        .bind(stop.id)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// Delete a stop and close the gap it leaves, keeping the trip's
    /// positions contiguous. Both writes commit together.
    pub async fn remove_stop(&self, stop: &Stop) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM stops WHERE id = ?1")
            .bind(stop.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE stops SET position = position - 1 WHERE trip_id = ?1 AND position > ?2")
            .bind(stop.trip_id)
            .bind(stop.position)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
