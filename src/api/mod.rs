//! HTTP surface of the catalog.

pub mod common;
pub mod v1;

use axum::body::Body;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::common::tracing::{make_span, on_failure, on_request, on_response};
use crate::system::create_system_router;
use crate::InnerState;

/// Builds the application router with catalog and system routes.
#[tracing::instrument(name = "create_api_router", skip(state))]
pub fn create_api_router(state: InnerState) -> Router {
    tracing::info!("Creating API router");

    Router::new()
        .merge(v1::routes::create_v1_routes(state))
        .merge(create_system_router())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span::<Body>)
                .on_request(on_request::<Body>)
                .on_response(on_response::<Body>)
                .on_failure(on_failure),
        )
}
