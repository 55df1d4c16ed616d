//! Trip budget aggregation: resolved activity costs plus flat per-category
//! overrides, averaged over the trip duration.

use serde::Serialize;
use sqlx::FromRow;

use crate::dates;
use crate::db::DbPool;
use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct OverrideRow {
    pub category: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetBreakdown {
    pub activities: i64,
    pub stay: i64,
    pub transport: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetReport {
    pub total_cost: i64,
    pub per_day_average: i64,
    pub breakdown: BudgetBreakdown,
}

#[derive(Clone)]
pub struct BudgetService {
    db: DbPool,
}

impl BudgetService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn for_trip(&self, trip_id: i64) -> Result<BudgetReport, AppError> {
        let trip: Option<(String, String)> =
            sqlx::query_as("SELECT start_date, end_date FROM trips WHERE id = ?1")
                .bind(trip_id)
                .fetch_optional(&self.db)
                .await?;
        let (start_date, end_date) = trip.ok_or(AppError::NotFound)?;
        let days = dates::trip_days(&start_date, &end_date)?;

        // A trip with no scheduled activities costs zero, not an error.
        let activities: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(COALESCE(sa.custom_cost, a.avg_cost)), 0)
            FROM stop_activities sa
            JOIN activities a ON a.id = sa.activity_id
            JOIN stops s ON s.id = sa.stop_id
            WHERE s.trip_id = ?1
            "#,
        )
        .bind(trip_id)
        .fetch_one(&self.db)
        .await?;

        let overrides: Vec<OverrideRow> = sqlx::query_as(
            "SELECT category, amount FROM trip_budget_overrides WHERE trip_id = ?1 ORDER BY id ASC",
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        let (stay, transport) = reduce_overrides(&overrides);

        let total = activities + stay + transport;
        Ok(BudgetReport {
            total_cost: total,
            per_day_average: per_day_average(total, days),
            breakdown: BudgetBreakdown {
                activities,
                stay,
                transport,
            },
        })
    }

    /// Upsert a flat override amount for one spending category, keyed on
    /// (trip, category) so repeated writes replace rather than accumulate.
    pub async fn set_override(
        &self,
        trip_id: i64,
        category: &str,
        amount: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO trip_budget_overrides (trip_id, category, amount)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (trip_id, category) DO UPDATE SET amount = excluded.amount
            "#,
        )
        .bind(trip_id)
        .bind(category)
        .bind(amount)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

/// Reduce override rows to the two honored scalars. Rows arrive ordered by
/// insertion id, so the last row per category wins deterministically even
/// if legacy duplicates exist.
pub fn reduce_overrides(rows: &[OverrideRow]) -> (i64, i64) {
    let mut stay = 0;
    let mut transport = 0;
    for row in rows {
        match row.category.as_str() {
            "stay" => stay = row.amount,
            "transport" => transport = row.amount,
            _ => {}
        }
    }
    (stay, transport)
}

pub fn per_day_average(total: i64, days: i64) -> i64 {
    (total as f64 / days as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn over(category: &str, amount: i64) -> OverrideRow {
        OverrideRow {
            category: category.into(),
            amount,
        }
    }

    #[test]
    fn missing_overrides_default_to_zero() {
        assert_eq!(reduce_overrides(&[]), (0, 0));
    }

    #[test]
    fn last_row_per_category_wins() {
        let rows = [over("stay", 100), over("transport", 40), over("stay", 250)];
        assert_eq!(reduce_overrides(&rows), (250, 40));
    }

    #[test]
    fn unknown_categories_are_ignored() {
        let rows = [over("souvenirs", 999), over("stay", 80)];
        assert_eq!(reduce_overrides(&rows), (80, 0));
    }

    #[test]
    fn per_day_average_rounds_to_nearest() {
        assert_eq!(per_day_average(130, 3), 43);
        assert_eq!(per_day_average(5, 2), 3);
        assert_eq!(per_day_average(0, 4), 0);
    }
}
