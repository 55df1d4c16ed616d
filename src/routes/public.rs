use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::{error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/trips/:share_token", get(public_trip))
}

async fn public_trip(
    State(state): State<AppState>,
    Path(share_token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state.share.public_view(&share_token).await?;
    Ok(Json(json!({ "trip": trip })))
}
