use std::sync::Arc;

use aws_sdk_dynamodb::{
    error::SdkError,
    types::{AttributeValue, ReturnValue},
    Client as DynamoDbClient,
};

use super::{parse_count, CounterKey, HitCounter, HitCounterError, HitCounterResult};

/// Counter incremented with a read followed by a compare-and-swap write
///
/// The write only succeeds if the count is still the value that was read (or still absent).
/// A writer that loses the race gets [`HitCounterError::ConcurrentUpdate`]; nothing is retried,
/// so the caller decides whether to try the whole request again.
pub struct OptimisticLockingCounter {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
    key: CounterKey,
}

impl OptimisticLockingCounter {
    /// Creates a new optimistic locking counter
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

    /// Reads the current count
    ///
    /// A counter record that does not exist yet counts as `0`.
    ///
    /// # Errors
    ///
    /// Returns `HitCounterError` if the Dynamo DB operation fails or the stored count is invalid
    pub async fn read_count(&self) -> HitCounterResult<u64> {
        let response = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key.to_key()))
            .consistent_read(true)
            .send()
            .await?;

        response
            .item()
            .and_then(|item| item.get(&self.key.count_attribute))
            .map_or(Ok(0), |count| parse_count(&self.key.count_attribute, count))
    }

    /// Writes `next` if the stored count still equals `previous`
    ///
    /// # Arguments
    ///
    /// * `previous` - The count this writer read
    /// * `next` - The count to store
    ///
    /// # Errors
    ///
    /// Returns `HitCounterError::ConcurrentUpdate` if another writer changed the count first,
    /// or `HitCounterError::DynamoDbUpdateError` if the Dynamo DB operation fails
    pub async fn compare_and_swap(&self, previous: u64, next: u64) -> HitCounterResult<()> {
        self.dynamodb_client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key.to_key()))
            .update_expression("SET #count = :next")
            .condition_expression("attribute_not_exists(#count) OR #count = :previous")
            .expression_attribute_names("#count", &self.key.count_attribute)
            .expression_attribute_values(":previous", AttributeValue::N(previous.to_string()))
            .expression_attribute_values(":next", AttributeValue::N(next.to_string()))
            .return_values(ReturnValue::None)
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err,
                    SdkError::ServiceError(ref svc) if svc.err().is_conditional_check_failed_exception()
                ) {
                    tracing::warn!(
                        counter = %self.key.partition_key,
                        previous,
                        "Lost optimistic lock on counter"
                    );
                    HitCounterError::ConcurrentUpdate { expected: previous }
                } else {
                    err.into()
                }
            })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl HitCounter for OptimisticLockingCounter {
    async fn hit(&self) -> HitCounterResult<u64> {
        let previous = self.read_count().await?;
        let next = previous.checked_add(1).ok_or_else(|| {
            tracing::error!(
                counter = %self.key.partition_key,
                count = previous,
                "Counter is saturated"
            );
            HitCounterError::InvalidCountAttribute(format!(
                "`{}` = {previous} cannot be incremented",
                self.key.count_attribute
            ))
        })?;

        self.compare_and_swap(previous, next).await?;
        tracing::debug!(counter = %self.key.partition_key, count = next, "Recorded hit");

        Ok(next)
    }

    fn key(&self) -> &CounterKey {
        &self.key
    }
}
