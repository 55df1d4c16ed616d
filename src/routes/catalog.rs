use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::AppError,
    models::{activity::Activity, city::City},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cities", get(search_cities))
        .route("/activities", get(list_activities))
}

#[derive(Deserialize)]
struct CitySearchParams {
    query: Option<String>,
}

async fn search_cities(
    State(state): State<AppState>,
    Query(params): Query<CitySearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    let cities: Vec<City> = match query {
        Some(q) => {
            let pattern = format!("%{q}%");
            sqlx::query_as(
                r#"
                SELECT id, name, country, cost_index, popularity_score
                FROM cities
                WHERE name LIKE ?1 OR country LIKE ?1
                ORDER BY popularity_score DESC
                LIMIT 10
                "#,
            )
            .bind(&pattern)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as(
                r#"
                SELECT id, name, country, cost_index, popularity_score
                FROM cities
                ORDER BY popularity_score DESC
                LIMIT 10
                "#,
            )
            .fetch_all(&state.db)
            .await?
        }
    };

    Ok(Json(json!({ "cities": cities })))
}

#[derive(Deserialize)]
struct ActivityListParams {
    city_id: Option<i64>,
    #[serde(rename = "type")]
    category: Option<String>,
}

async fn list_activities(
    State(state): State<AppState>,
    Query(params): Query<ActivityListParams>,
) -> Result<impl IntoResponse, AppError> {
    let city_id = params
        .city_id
        .ok_or_else(|| AppError::BadRequest("city_id is required".into()))?;

    let activities: Vec<Activity> = match params.category.as_deref() {
        Some(category) => {
            sqlx::query_as(
                r#"
                SELECT id, city_id, name, category, avg_cost, duration_hours, description
                FROM activities
                WHERE city_id = ?1 AND category = ?2
                ORDER BY avg_cost ASC
                LIMIT 20
                "#,
            )
            .bind(city_id)
            .bind(category)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as(
                r#"
                SELECT id, city_id, name, category, avg_cost, duration_hours, description
                FROM activities
                WHERE city_id = ?1
                ORDER BY avg_cost ASC
                LIMIT 20
                "#,
            )
            .bind(city_id)
            .fetch_all(&state.db)
            .await?
        }
    };

    Ok(Json(json!({ "activities": activities })))
}
