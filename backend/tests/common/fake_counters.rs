use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use aws_sdk_dynamodb::error::SdkError;
use counter_storage::hit_counter::{CounterKey, HitCounter, HitCounterError, HitCounterResult};
use resume_api::state::Counters;

/// In-process counter backed by an atomic, linearizable like the expression strategy
pub struct InMemoryCounter {
    key: CounterKey,
    count: AtomicU64,
}

impl InMemoryCounter {
    pub fn new(key: CounterKey, initial: u64) -> Self {
        Self {
            key,
            count: AtomicU64::new(initial),
        }
    }

    pub fn current(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HitCounter for InMemoryCounter {
    async fn hit(&self) -> HitCounterResult<u64> {
        Ok(self.count.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn key(&self) -> &CounterKey {
        &self.key
    }
}

/// How a `FailingCounter` fails
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Conflict,
    StoreUnavailable,
    MissingAttribute,
}

/// Counter that fails every hit
pub struct FailingCounter {
    key: CounterKey,
    failure: Failure,
}

impl FailingCounter {
    pub fn new(key: CounterKey, failure: Failure) -> Self {
        Self { key, failure }
    }
}

#[async_trait::async_trait]
impl HitCounter for FailingCounter {
    async fn hit(&self) -> HitCounterResult<u64> {
        Err(match self.failure {
            Failure::Conflict => HitCounterError::ConcurrentUpdate { expected: 7 },
            Failure::StoreUnavailable => HitCounterError::DynamoDbUpdateError(
                SdkError::construction_failure("connection refused"),
            ),
            Failure::MissingAttribute => {
                HitCounterError::MissingCountAttribute(self.key.count_attribute.clone())
            }
        })
    }

    fn key(&self) -> &CounterKey {
        &self.key
    }
}

/// Counters backed by fresh in-memory counters, returned alongside for inspection
pub fn in_memory_counters() -> (Counters, Arc<InMemoryCounter>, Arc<InMemoryCounter>) {
    let hits = Arc::new(InMemoryCounter::new(CounterKey::hits(), 0));
    let visits = Arc::new(InMemoryCounter::new(CounterKey::visits(), 0));

    let counters = Counters {
        hits: hits.clone(),
        visits: visits.clone(),
    };

    (counters, hits, visits)
}

/// Counters whose hits all fail the same way
pub fn failing_counters(failure: Failure) -> Counters {
    Counters {
        hits: Arc::new(FailingCounter::new(CounterKey::hits(), failure)),
        visits: Arc::new(FailingCounter::new(CounterKey::visits(), failure)),
    }
}
