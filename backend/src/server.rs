use std::time::Duration;

use aide::openapi::OpenApi;
use axum::{Extension, Router};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::routes;
use crate::{
    state::Counters,
    types::{ConfigError, Environment},
};

/// How long browsers may cache a CORS preflight response
const CORS_MAX_AGE: Duration = Duration::from_secs(10 * 24 * 60 * 60);

/// Builds the application router with all layers applied
///
/// # Errors
///
/// Returns `ConfigError` if the CORS configuration is invalid
pub fn router(environment: Environment, counters: Counters) -> Result<Router, ConfigError> {
    let mut openapi = OpenApi::default();
    let cors = cors_layer(&environment)?;

    Ok(routes::handler()
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(counters))
        .layer(cors)
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default()))
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the port or CORS origin is misconfigured, or the server fails to start or
/// bind to it
pub async fn start(environment: Environment, counters: Counters) -> anyhow::Result<()> {
    let port = environment.port()?;
    let router = router(environment, counters)?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Cloud Resume API started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

fn cors_layer(environment: &Environment) -> Result<CorsLayer, ConfigError> {
    let allow_origin = environment
        .cors_allowed_origin()?
        .map_or_else(AllowOrigin::any, AllowOrigin::exact);

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .max_age(CORS_MAX_AGE))
}
