use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Static reference data, seeded by migration; read-only at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub cost_index: i64,
    pub popularity_score: i64,
}
