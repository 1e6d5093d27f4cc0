use std::sync::Arc;

use aws_sdk_dynamodb::{
    types::{AttributeValue, ReturnValue},
    Client as DynamoDbClient,
};

use super::{parse_count, CounterKey, HitCounter, HitCounterError, HitCounterResult};

/// Counter incremented with a single atomic update expression
///
/// `SET #count = if_not_exists(#count, :initial) + :increment` creates the record on the first
/// hit and is linearizable per key, so concurrent hits are never lost and never rejected.
pub struct ExpressionIncrementingCounter {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
    key: CounterKey,
}

impl ExpressionIncrementingCounter {
    /// Creates a new expression incrementing counter
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured Dynamo DB client
    /// * `table_name` - Dynamo DB table holding the counter records
    /// * `key` - Counter record to increment
    #[must_use]
    pub const fn new(
        dynamodb_client: Arc<DynamoDbClient>,
        table_name: String,
        key: CounterKey,
    ) -> Self {
        Self {
            dynamodb_client,
            table_name,
            key,
        }
    }
}

#[async_trait::async_trait]
impl HitCounter for ExpressionIncrementingCounter {
    async fn hit(&self) -> HitCounterResult<u64> {
        let response = self
            .dynamodb_client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key.to_key()))
            .update_expression("SET #count = if_not_exists(#count, :initial) + :increment")
            .expression_attribute_names("#count", &self.key.count_attribute)
            .expression_attribute_values(":initial", AttributeValue::N("0".to_string()))
            .expression_attribute_values(":increment", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await?;

        // UPDATED_NEW always carries the attribute we just set
        let Some(count) = response
            .attributes()
            .and_then(|attributes| attributes.get(&self.key.count_attribute))
        else {
            tracing::error!(
                counter = %self.key.partition_key,
                "Update response is missing the count attribute"
            );
            return Err(HitCounterError::MissingCountAttribute(
                self.key.count_attribute.clone(),
            ));
        };

        let count = parse_count(&self.key.count_attribute, count)?;
        tracing::debug!(counter = %self.key.partition_key, count, "Recorded hit");

        Ok(count)
    }

    fn key(&self) -> &CounterKey {
        &self.key
    }
}
