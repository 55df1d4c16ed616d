use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::{AuthenticatedUser, CurrentUser},
    dates,
    db::DbPool,
    error::AppError,
    models::{activity::Activity, stop::Stop, trip::Trip},
    services::positions::StopChanges,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reorder", post(reorder))
        .route("/:stop_id", put(update_stop).delete(delete_stop))
        .route("/:stop_id/activities", post(attach_activity))
}

async fn load_owned_stop(
    db: &DbPool,
    stop_id: i64,
    user: &AuthenticatedUser,
) -> Result<(Trip, Stop), AppError> {
    let stop: Option<Stop> = sqlx::query_as(
        r#"
        SELECT id, trip_id, city_id, start_date, end_date, position, description, budget
        FROM stops
        WHERE id = ?1
        "#,
    )
    .bind(stop_id)
    .fetch_optional(db)
    .await?;
    let stop = stop.ok_or(AppError::NotFound)?;
    let trip = super::trips::load_owned_trip(db, stop.trip_id, user).await?;
    Ok((trip, stop))
}

#[derive(Deserialize)]
struct ReorderPayload {
    trip_id: i64,
    ordered_stop_ids: Vec<i64>,
}

async fn reorder(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<ReorderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let trip = super::trips::load_owned_trip(&state.db, payload.trip_id, user).await?;
    state
        .positions
        .reorder(trip.id, &payload.ordered_stop_ids)
        .await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
struct UpdateStopPayload {
    start_date: Option<String>,
    end_date: Option<String>,
    description: Option<String>,
    budget: Option<i64>,
    position: Option<i64>,
}

async fn update_stop(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(stop_id): Path<i64>,
    Json(payload): Json<UpdateStopPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let (trip, stop) = load_owned_stop(&state.db, stop_id, user).await?;
    state
        .positions
        .update_stop(
            &trip,
            &stop,
            &StopChanges {
                start_date: payload.start_date,
                end_date: payload.end_date,
                description: payload.description,
                budget: payload.budget,
                position: payload.position,
            },
        )
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn delete_stop(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(stop_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let (_trip, stop) = load_owned_stop(&state.db, stop_id, user).await?;
    state.positions.remove_stop(&stop).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
struct AttachActivityPayload {
    activity_id: i64,
    scheduled_date: Option<String>,
    custom_cost: Option<i64>,
}

async fn attach_activity(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(stop_id): Path<i64>,
    Json(payload): Json<AttachActivityPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = current.require_user()?;
    let (_trip, stop) = load_owned_stop(&state.db, stop_id, user).await?;

    if let Some(date) = payload.scheduled_date.as_deref() {
        dates::parse_iso_date("scheduled_date", date)?;
    }
    if payload.custom_cost.is_some_and(|cost| cost < 0) {
        return Err(AppError::BadRequest("custom_cost must not be negative".into()));
    }

    let activity: Option<Activity> = sqlx::query_as(
        r#"
        SELECT id, city_id, name, category, avg_cost, duration_hours, description
        FROM activities
        WHERE id = ?1
        "#,
    )
    .bind(payload.activity_id)
    .fetch_optional(&state.db)
    .await?;
    let activity = activity.ok_or_else(|| AppError::BadRequest("unknown activity_id".into()))?;

    let result = sqlx::query(
        r#"
        INSERT INTO stop_activities (stop_id, activity_id, scheduled_date, custom_cost)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(stop.id)
    .bind(activity.id)
    .bind(payload.scheduled_date.as_deref())
    .bind(payload.custom_cost)
    .execute(&state.db)
    .await?;

    let cost = payload.custom_cost.unwrap_or(activity.avg_cost);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "stop_activity": {
                "id": result.last_insert_rowid(),
                "activity": {
                    "id": activity.id,
                    "name": activity.name,
                    "category": activity.category,
                },
                "scheduled_date": payload.scheduled_date,
                "cost": cost,
            }
        })),
    ))
}
