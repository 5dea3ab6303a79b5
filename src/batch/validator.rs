use crate::batch::{BatchRejection, MSG_BATCH_LIMIT};
use serde_json::Value;

/// Inclusive bounds on the number of requests in one batch.
pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 5;

/// Validates the batch envelope before any handler runs.
///
/// Only the batch-size check lives here: a violation terminates the whole
/// request with an aggregate rejection. Per-item shape problems are a
/// different layer and never abort the batch; those are reported slot by
/// slot during routing.
pub struct BatchValidator;

impl BatchValidator {
    pub fn validate(batch: &[Value]) -> std::result::Result<(), BatchRejection> {
        if batch.len() < MIN_BATCH_SIZE || batch.len() > MAX_BATCH_SIZE {
            return Err(BatchRejection::new(MSG_BATCH_LIMIT));
        }

        Ok(())
    }
}
