/// Hit and visit counters
pub mod counters;
mod docs;
/// Health check
pub mod health;

use aide::axum::{routing::get, ApiRouter};

/// Creates the router with all handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler())
        .api_route("/health", get(health::handler))
        .api_route("/api/hits", get(counters::hits))
        .api_route("/api/visits", get(counters::visits))
}
