//! Counter handles shared across handlers

use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use counter_storage::hit_counter::{build_counter, CounterKey, CounterStrategy, HitCounter};

/// The counters served by the API
#[derive(Clone)]
pub struct Counters {
    /// Page hit counter
    pub hits: Arc<dyn HitCounter>,
    /// Visit counter
    pub visits: Arc<dyn HitCounter>,
}

impl Counters {
    /// Builds both counters on top of one shared Dynamo DB client
    ///
    /// # Arguments
    ///
    /// * `strategy` - Increment strategy used by both counters
    /// * `dynamodb_client` - Pre-configured Dynamo DB client
    /// * `table_name` - Dynamo DB table holding the counter records
    #[must_use]
    pub fn new(
        strategy: CounterStrategy,
        dynamodb_client: Arc<DynamoDbClient>,
        table_name: &str,
    ) -> Self {
        Self {
            hits: build_counter(
                strategy,
                dynamodb_client.clone(),
                table_name.to_string(),
                CounterKey::hits(),
            ),
            visits: build_counter(
                strategy,
                dynamodb_client,
                table_name.to_string(),
                CounterKey::visits(),
            ),
        }
    }
}
