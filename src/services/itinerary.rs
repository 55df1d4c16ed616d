//! Day-bucketed itinerary aggregation.

use serde::Serialize;
use sqlx::FromRow;

use crate::db::DbPool;
use crate::error::AppError;

/// One scheduled activity as it comes back from the store, with its cost
/// already resolved (custom cost when present, activity average otherwise).
#[derive(Debug, Clone, FromRow)]
pub struct TimelineRow {
    pub date: Option<String>,
    pub city: Option<String>,
    pub activity_name: String,
    pub cost: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineDay {
    pub date: Option<String>,
    pub city: Option<String>,
    pub activities: Vec<TimelineActivity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineActivity {
    pub name: String,
    pub cost: i64,
}

#[derive(Clone)]
pub struct ItineraryService {
    db: DbPool,
}

impl ItineraryService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Ordered-by-date day entries for a trip, each carrying the city
    /// visited and the activities scheduled that day.
    pub async fn timeline(&self, trip_id: i64) -> Result<Vec<TimelineDay>, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM trips WHERE id = ?1)")
            .bind(trip_id)
            .fetch_one(&self.db)
            .await?;
        if !exists {
            return Err(AppError::NotFound);
        }

        let rows: Vec<TimelineRow> = sqlx::query_as(
            r#"
            SELECT
                sa.scheduled_date AS date,
                c.name AS city,
                a.name AS activity_name,
                COALESCE(sa.custom_cost, a.avg_cost) AS cost
            FROM stops s
            LEFT JOIN cities c ON c.id = s.city_id
            JOIN stop_activities sa ON sa.stop_id = s.id
            JOIN activities a ON a.id = sa.activity_id
            WHERE s.trip_id = ?1
            ORDER BY sa.scheduled_date ASC, sa.id ASC
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;

        Ok(bucket_by_day(rows))
    }
}

/// Group rows by scheduled date. Rows arrive ordered by date, so equal
/// dates are adjacent; the first row seen for a date decides the day's
/// city label. Dates are compared lexically (ISO-8601), never interpreted.
pub fn bucket_by_day(rows: Vec<TimelineRow>) -> Vec<TimelineDay> {
    let mut days: Vec<TimelineDay> = Vec::new();
    for row in rows {
        let entry = TimelineActivity {
            name: row.activity_name,
            cost: row.cost,
        };
        match days.last_mut() {
            Some(day) if day.date == row.date => day.activities.push(entry),
            _ => days.push(TimelineDay {
                date: row.date,
                city: row.city,
                activities: vec![entry],
            }),
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: Option<&str>, city: &str, name: &str, cost: i64) -> TimelineRow {
        TimelineRow {
            date: date.map(Into::into),
            city: Some(city.into()),
            activity_name: name.into(),
            cost,
        }
    }

    #[test]
    fn groups_rows_sharing_a_date() {
        let days = bucket_by_day(vec![
            row(Some("2024-05-02"), "Paris", "Eiffel Tower Visit", 30),
            row(Some("2024-05-02"), "Paris", "Louvre Museum Tour", 20),
            row(Some("2024-05-03"), "Rome", "Colosseum Tour", 35),
        ]);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].activities.len(), 2);
        assert_eq!(days[1].city.as_deref(), Some("Rome"));
    }

    #[test]
    fn first_row_decides_the_city_label() {
        let days = bucket_by_day(vec![
            row(Some("2024-05-02"), "Paris", "Eiffel Tower Visit", 30),
            row(Some("2024-05-02"), "Rome", "Colosseum Tour", 35),
        ]);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].city.as_deref(), Some("Paris"));
    }

    #[test]
    fn unscheduled_entries_form_their_own_bucket() {
        let days = bucket_by_day(vec![
            row(None, "Paris", "Seine River Cruise", 25),
            row(Some("2024-05-02"), "Paris", "Eiffel Tower Visit", 30),
        ]);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, None);
    }

    #[test]
    fn empty_input_yields_no_days() {
        assert!(bucket_by_day(Vec::new()).is_empty());
    }
}
