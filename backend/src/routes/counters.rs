//! Hit and visit counter routes

use axum::{Extension, Json};
use counter_storage::hit_counter::HitCounter;
use metrics::counter;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{state::Counters, types::AppError};

/// Page hit count after recording this request
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HitCountResponse {
    /// Number of page hits so far, including this one
    pub hit_count: u64,
}

/// Visit count after recording this request
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitCountResponse {
    /// Number of visits so far, including this one
    pub visit_count: u64,
}

/// Records a page hit and returns the new hit count
///
/// # Errors
///
/// - `409` if the hit lost a race against a concurrent hit (optimistic locking only)
/// - `503` if the counter storage could not be reached
pub async fn hits(
    Extension(counters): Extension<Counters>,
) -> Result<Json<HitCountResponse>, AppError> {
    let hit_count = record_hit(counters.hits.as_ref()).await?;

    Ok(Json(HitCountResponse { hit_count }))
}

/// Records a visit and returns the new visit count
///
/// # Errors
///
/// - `409` if the visit lost a race against a concurrent visit (optimistic locking only)
/// - `503` if the counter storage could not be reached
pub async fn visits(
    Extension(counters): Extension<Counters>,
) -> Result<Json<VisitCountResponse>, AppError> {
    let visit_count = record_hit(counters.visits.as_ref()).await?;

    Ok(Json(VisitCountResponse { visit_count }))
}

async fn record_hit(hit_counter: &dyn HitCounter) -> Result<u64, AppError> {
    let name = hit_counter.key().partition_key.clone();

    match hit_counter.hit().await {
        Ok(count) => {
            counter!("counter_hits", "counter" => name, "outcome" => "success").increment(1);
            Ok(count)
        }
        Err(err) => {
            let outcome = if err.is_concurrent_update() {
                "conflict"
            } else {
                "error"
            };
            counter!("counter_hits", "counter" => name, "outcome" => outcome).increment(1);
            Err(err.into())
        }
    }
}
