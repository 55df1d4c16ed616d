use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    auth::{AuthenticatedUser, CurrentUser},
    dates,
    db::DbPool,
    error::AppError,
    models::{
        stop::StopWithCity,
        trip::{Trip, TripSummary},
    },
    services::positions::NewStop,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_trip).get(list_trips))
        .route("/:trip_id", get(trip_detail))
        .route("/:trip_id/stops", post(add_stop))
        .route("/:trip_id/timeline", get(timeline))
        .route("/:trip_id/budget", get(budget).post(set_budget_override))
        .route("/:trip_id/share", post(share))
}

/// Fetch a trip and enforce ownership: a missing trip is not-found, a trip
/// owned by someone else is forbidden.
pub(crate) async fn load_owned_trip(
    db: &DbPool,
    trip_id: i64,
    user: &AuthenticatedUser,
) -> Result<Trip, AppError> {
    let trip: Option<Trip> = sqlx::query_as(
        r#"
        SELECT id, user_id, title, description, start_date, end_date,
               is_public, share_token, created_at
        FROM trips
        WHERE id = ?1
        "#,
    )
    .bind(trip_id)
    .fetch_optional(db)
    .await?;
    let trip = trip.ok_or(AppError::NotFound)?;
    if trip.user_id != user.id {
        return Err(AppError::Forbidden);
    }
    Ok(trip)
}

#[derive(Deserialize)]
struct CreateTripPayload {
    title: String,
    description: Option<String>,
    start_date: String,
    end_date: String,
}

async fn create_trip(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateTripPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("title is required".into()));
    }
    dates::ensure_date_order(&payload.start_date, &payload.end_date)?;

    let result = sqlx::query(
        r#"
        INSERT INTO trips (user_id, title, description, start_date, end_date)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(user.id)
    .bind(title)
    .bind(payload.description.as_deref())
    .bind(&payload.start_date)
    .bind(&payload.end_date)
    .execute(&state.db)
    .await?;

    let trip: Trip = sqlx::query_as(
        r#"
        SELECT id, user_id, title, description, start_date, end_date,
               is_public, share_token, created_at
        FROM trips
        WHERE id = ?1
        "#,
    )
    .bind(result.last_insert_rowid())
    .fetch_one(&state.db)
    .await?;

    info!("trip {} created by user {}", trip.id, user.id);
    Ok((StatusCode::CREATED, Json(json!({ "trip": trip }))))
}

async fn list_trips(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let trips: Vec<TripSummary> = sqlx::query_as(
        r#"
        SELECT t.id, t.title, t.start_date, t.end_date, COUNT(s.id) AS stop_count
        FROM trips t
        LEFT JOIN stops s ON s.trip_id = t.id
        WHERE t.user_id = ?1
        GROUP BY t.id
        ORDER BY t.created_at DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(json!({ "trips": trips })))
}

async fn trip_detail(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(trip_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let trip = load_owned_trip(&state.db, trip_id, user).await?;

    let stops: Vec<StopWithCity> = sqlx::query_as(
        r#"
        SELECT s.id, s.city_id, c.name AS city_name, c.country, s.start_date,
               s.end_date, s.position, s.description, s.budget
        FROM stops s
        LEFT JOIN cities c ON c.id = s.city_id
        WHERE s.trip_id = ?1
        ORDER BY s.position ASC
        "#,
    )
    .bind(trip.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({
        "trip": {
            "id": trip.id,
            "title": trip.title,
            "description": trip.description,
            "start_date": trip.start_date,
            "end_date": trip.end_date,
            "is_public": trip.is_public,
            "stops": stops,
        }
    })))
}

#[derive(Deserialize)]
struct AddStopPayload {
    city_id: Option<i64>,
    start_date: String,
    end_date: String,
    description: Option<String>,
    budget: Option<i64>,
}

async fn add_stop(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(trip_id): Path<i64>,
    Json(payload): Json<AddStopPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let trip = load_owned_trip(&state.db, trip_id, user).await?;

    let stop = state
        .positions
        .append_stop(
            &trip,
            NewStop {
                city_id: payload.city_id,
                start_date: payload.start_date,
                end_date: payload.end_date,
                description: payload.description,
                budget: payload.budget,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "stop": stop }))))
}

async fn timeline(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(trip_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let trip = load_owned_trip(&state.db, trip_id, user).await?;
    let days = state.itinerary.timeline(trip.id).await?;
    Ok(Json(json!({ "days": days })))
}

async fn budget(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(trip_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let trip = load_owned_trip(&state.db, trip_id, user).await?;
    let report = state.budget.for_trip(trip.id).await?;
    Ok(Json(report))
}

#[derive(Deserialize)]
struct BudgetOverridePayload {
    category: String,
    amount: i64,
}

async fn set_budget_override(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(trip_id): Path<i64>,
    Json(payload): Json<BudgetOverridePayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let trip = load_owned_trip(&state.db, trip_id, user).await?;

    let category = payload.category.trim().to_lowercase();
    if category.is_empty() {
        return Err(AppError::BadRequest("category is required".into()));
    }
    if payload.amount < 0 {
        return Err(AppError::BadRequest("amount must not be negative".into()));
    }

    state
        .budget
        .set_override(trip.id, &category, payload.amount)
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn share(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(trip_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let trip = load_owned_trip(&state.db, trip_id, user).await?;
    let token = state.share.mint_token(trip.id).await?;
    info!("trip {} shared by user {}", trip.id, user.id);
    Ok(Json(json!({ "share_url": format!("/api/public/trips/{token}") })))
}
