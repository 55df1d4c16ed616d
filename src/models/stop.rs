use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stop {
    pub id: i64,
    pub trip_id: i64,
    pub city_id: Option<i64>,
    pub start_date: String,
    pub end_date: String,
    pub position: i64,
    pub description: Option<String>,
    pub budget: Option<i64>,
}

/// Stop joined with its city, as returned by the trip detail view and the
/// stop creation response. City fields are null for itinerary sections that
/// have no city attached.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StopWithCity {
    pub id: i64,
    pub city_id: Option<i64>,
    pub city_name: Option<String>,
    pub country: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub position: i64,
    pub description: Option<String>,
    pub budget: Option<i64>,
}
