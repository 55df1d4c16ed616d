pub mod catalog;
pub mod public;
pub mod stops;
pub mod trips;

use axum::http::{header::CONTENT_TYPE, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    let api = Router::new()
        .nest("/trips", trips::router())
        .nest("/stops", stops::router())
        .nest("/public", public::router())
        .merge(catalog::router());

    Router::new().nest("/api", api).layer(cors).with_state(state)
}
