//! HTTP API for recital.
//!
//! Serves schedule and video records, stores uploaded assets and queues
//! contact form messages. Everything lives under one data directory.

pub mod mailbox;
pub mod routes;
pub mod singleton;
pub mod state;
pub mod store;

use axum::Router;
use recital_core::{ScheduleRecord, VideoRecord};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use crate::state::AppState;

/// Build the router with all routes and layers.
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::records::router::<ScheduleRecord>())
        .merge(routes::records::router::<VideoRecord>())
        .merge(routes::assets::router())
        .merge(routes::contact::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
