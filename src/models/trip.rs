use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub is_public: bool,
    pub share_token: Option<String>,
    pub created_at: String,
}

/// Listing row: one entry per trip with the number of stops attached.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TripSummary {
    pub id: i64,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub stop_count: i64,
}
