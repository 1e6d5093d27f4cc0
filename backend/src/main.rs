use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use resume_api::{server, state::Counters, types::Environment};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // Configure logging based on environment
    // Datadog (JSON + OpenTelemetry) for staging/production, regular format for development
    // `TRACING_LEVEL` only applies to the development subscriber
    // The guard must be kept alive for the duration of the program
    let tracer = match environment {
        Environment::Production | Environment::Staging => Some(datadog_tracing::init()?),
        Environment::Development => {
            fmt()
                .with_env_filter(
                    EnvFilter::builder()
                        .with_default_directive(
                            LevelFilter::from_level(environment.tracing_level()).into(),
                        )
                        .from_env_lossy(),
                )
                .init();
            None
        }
    };

    info!("Starting Cloud Resume API in {environment} environment");

    // Fail fast on misconfiguration before touching the store
    let table_name = environment.dynamodb_table_name()?;
    let strategy = environment.counter_strategy()?;

    let dynamodb_client = Arc::new(DynamoDbClient::new(&environment.aws_config().await));
    let counters = Counters::new(strategy, dynamodb_client, &table_name);

    info!("✅ Initialized {strategy} counters on table {table_name}");

    let server_result = server::start(environment, counters).await;

    // Ensure the tracer is properly shut down
    if let Some((_guard, tracer_shutdown)) = tracer {
        tracer_shutdown.shutdown();
    }

    info!("✅ Cloud Resume API shutdown complete");

    server_result
}
