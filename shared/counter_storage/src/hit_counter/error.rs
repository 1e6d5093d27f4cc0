//! Error types for hit counter operations

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{get_item::GetItemError, update_item::UpdateItemError};
use thiserror::Error;

/// Result type for hit counter operations
pub type HitCounterResult<T> = Result<T, HitCounterError>;

/// Errors that can occur while recording a hit
#[derive(Error, Debug)]
pub enum HitCounterError {
    /// Failed to read the counter record from Dynamo DB
    #[error("Failed to get counter from DynamoDB: {0}")]
    DynamoDbGetError(#[from] SdkError<GetItemError>),

    /// Failed to update the counter record in Dynamo DB
    #[error("Failed to update counter in DynamoDB: {0}")]
    DynamoDbUpdateError(#[from] SdkError<UpdateItemError>),

    /// Another writer advanced the counter between our read and our write
    #[error("Counter was updated concurrently (expected previous count {expected})")]
    ConcurrentUpdate {
        /// The count this writer read before attempting its write
        expected: u64,
    },

    /// The update response did not carry the counter attribute
    #[error("Update response is missing the `{0}` attribute")]
    MissingCountAttribute(String),

    /// The stored counter attribute is not a non-negative integer
    #[error("Invalid counter attribute: {0}")]
    InvalidCountAttribute(String),
}

impl HitCounterError {
    /// Whether the error comes from a lost compare-and-swap race
    #[must_use]
    pub const fn is_concurrent_update(&self) -> bool {
        matches!(self, Self::ConcurrentUpdate { .. })
    }
}
