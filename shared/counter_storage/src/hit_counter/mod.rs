//! Hit counter integration using Dynamo DB
//!
//! Each logical counter (page hits, visits) is a single record in a single-table design. The
//! record is addressed by a composite key where the partition key and the sort key are both the
//! counter's name, and holds one numeric attribute with the current count.
//!
//! Two increment strategies are available behind the [`HitCounter`] trait:
//!
//! * [`ExpressionIncrementingCounter`] issues a single atomic update expression. Dynamo DB
//!   serializes concurrent updates to the same key, so it never conflicts.
//! * [`OptimisticLockingCounter`] reads the count and writes `count + 1` with a compare-and-swap
//!   condition. A writer that loses the race fails with [`HitCounterError::ConcurrentUpdate`] and
//!   is not retried.

mod error;
mod expression_incrementing;
mod optimistic_locking;

use std::collections::HashMap;
use std::sync::Arc;

use aws_sdk_dynamodb::{types::AttributeValue, Client as DynamoDbClient};
use strum::{Display, EnumString};

pub use error::{HitCounterError, HitCounterResult};
pub use expression_incrementing::ExpressionIncrementingCounter;
pub use optimistic_locking::OptimisticLockingCounter;

/// Name of the page hit counter record
pub const HIT_COUNTER: &str = "HIT_COUNTER";
/// Attribute holding the page hit count
pub const HIT_COUNT_ATTRIBUTE: &str = "HitCount";
/// Name of the visit counter record
pub const VISIT_COUNTER: &str = "VISIT_COUNTER";
/// Attribute holding the visit count
pub const VISIT_COUNT_ATTRIBUTE: &str = "VisitCount";

/// Key attribute names of the counters table
#[derive(Debug, Clone, Copy, Display)]
pub enum TableAttribute {
    /// Partition key
    #[strum(serialize = "PK")]
    Pk,
    /// Sort key
    #[strum(serialize = "SK")]
    Sk,
}

/// Identity of one counter record
///
/// These values are the persisted format of the counters. Changing them orphans existing counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterKey {
    /// Value of the `PK` attribute
    pub partition_key: String,
    /// Value of the `SK` attribute
    pub sort_key: String,
    /// Name of the numeric attribute holding the count
    pub count_attribute: String,
}

impl CounterKey {
    /// Creates a key whose partition and sort keys are both `name`
    #[must_use]
    pub fn new(name: impl Into<String>, count_attribute: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            partition_key: name.clone(),
            sort_key: name,
            count_attribute: count_attribute.into(),
        }
    }

    /// Key of the page hit counter
    #[must_use]
    pub fn hits() -> Self {
        Self::new(HIT_COUNTER, HIT_COUNT_ATTRIBUTE)
    }

    /// Key of the visit counter
    #[must_use]
    pub fn visits() -> Self {
        Self::new(VISIT_COUNTER, VISIT_COUNT_ATTRIBUTE)
    }

    /// Renders the Dynamo DB primary key of the record
    #[must_use]
    pub fn to_key(&self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                TableAttribute::Pk.to_string(),
                AttributeValue::S(self.partition_key.clone()),
            ),
            (
                TableAttribute::Sk.to_string(),
                AttributeValue::S(self.sort_key.clone()),
            ),
        ])
    }
}

/// Increment strategy used by a counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum CounterStrategy {
    /// Single atomic `if_not_exists(...) + 1` update expression
    #[default]
    ExpressionIncrementing,
    /// Read, then conditionally write `count + 1` (compare-and-swap, no retry)
    OptimisticLocking,
}

/// A durable counter that records hits
#[async_trait::async_trait]
pub trait HitCounter: Send + Sync {
    /// Records one hit and returns the count after this hit was applied
    ///
    /// # Errors
    ///
    /// Returns `HitCounterError` if the store could not be read or written, or if the write
    /// lost a race against another writer (optimistic locking only)
    async fn hit(&self) -> HitCounterResult<u64>;

    /// The record this counter increments
    fn key(&self) -> &CounterKey;
}

/// Builds a counter for the given strategy
///
/// # Arguments
///
/// * `strategy` - Increment strategy to use
/// * `dynamodb_client` - Pre-configured Dynamo DB client, shared across counters
/// * `table_name` - Dynamo DB table holding the counter records
/// * `key` - Counter record to increment
#[must_use]
pub fn build_counter(
    strategy: CounterStrategy,
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
    key: CounterKey,
) -> Arc<dyn HitCounter> {
    match strategy {
        CounterStrategy::ExpressionIncrementing => Arc::new(ExpressionIncrementingCounter::new(
            dynamodb_client,
            table_name,
            key,
        )),
        CounterStrategy::OptimisticLocking => Arc::new(OptimisticLockingCounter::new(
            dynamodb_client,
            table_name,
            key,
        )),
    }
}

/// Parses a stored count
fn parse_count(count_attribute: &str, value: &AttributeValue) -> HitCounterResult<u64> {
    let raw = value.as_n().map_err(|_| {
        HitCounterError::InvalidCountAttribute(format!("`{count_attribute}` is not a number"))
    })?;

    raw.parse::<u64>().map_err(|e| {
        HitCounterError::InvalidCountAttribute(format!("`{count_attribute}` = {raw}: {e}"))
    })
}
