use std::sync::Arc;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use counter_storage::hit_counter::{CounterKey, TableAttribute};
use uuid::Uuid;

/// Test configuration for LocalStack
const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";
const TEST_REGION: &str = "us-east-1";

/// Helper for creating and managing the counters table in tests
pub struct DynamoDbTestSetup {
    pub client: Arc<DynamoDbClient>,
    pub table_name: String,
}

impl DynamoDbTestSetup {
    pub async fn new() -> Self {
        let credentials = Credentials::from_keys("test", "test", None);
        let config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(LOCALSTACK_ENDPOINT)
            .region(Region::new(TEST_REGION))
            .credentials_provider(credentials)
            .load()
            .await;

        let client = Arc::new(DynamoDbClient::new(&config));
        let table_name = Self::create_counters_table(&client).await;

        Self { client, table_name }
    }

    /// Creates a test counters table with a unique name
    async fn create_counters_table(client: &DynamoDbClient) -> String {
        let table_name = format!("test-counters-{}", Uuid::new_v4());

        client
            .create_table()
            .table_name(&table_name)
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(TableAttribute::Pk.to_string())
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .unwrap(),
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(TableAttribute::Sk.to_string())
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .unwrap(),
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(TableAttribute::Pk.to_string())
                    .key_type(KeyType::Hash)
                    .build()
                    .unwrap(),
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(TableAttribute::Sk.to_string())
                    .key_type(KeyType::Range)
                    .build()
                    .unwrap(),
            )
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .expect("Failed to create test table");

        // Wait for table to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        table_name
    }

    /// Reads the raw stored count of a counter
    pub async fn stored_count(&self, key: &CounterKey) -> Option<String> {
        self.client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key.to_key()))
            .consistent_read(true)
            .send()
            .await
            .expect("Failed to read counter record")
            .item()
            .and_then(|item| item.get(&key.count_attribute))
            .and_then(|value| value.as_n().ok())
            .cloned()
    }
}

impl Drop for DynamoDbTestSetup {
    fn drop(&mut self) {
        let client = self.client.clone();
        let table_name = self.table_name.clone();

        // Use tokio runtime to delete table
        let handle = tokio::runtime::Handle::try_current();
        if let Ok(handle) = handle {
            handle.spawn(async move {
                let _ = client.delete_table().table_name(&table_name).send().await;
            });
        }
    }
}
