use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Bookable experience tied to a city. Seeded reference data.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: i64,
    pub city_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub avg_cost: i64,
    pub duration_hours: f64,
    pub description: Option<String>,
}

/// Association of one activity with one stop. `custom_cost` overrides the
/// activity's average cost wherever costs are resolved.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StopActivity {
    pub id: i64,
    pub stop_id: i64,
    pub activity_id: i64,
    pub scheduled_date: Option<String>,
    pub custom_cost: Option<i64>,
}
