// Orchestrator module - drives one batch of update requests end to end
//
// Architecture:
// - BatchOrchestrator: validate the batch envelope, then route each item
// - UpdateRouter: per-item dispatch on the declared type
// - Handlers: core upgrade and plugin/theme automatic-update backends
// - ResultNormalizer: uniform {status, message} outcomes
// - PolicyGuard: scoped force-enable of the auto-update policy flag
pub mod handlers;
pub mod normalizer;
pub mod policy;
pub mod router;

pub use normalizer::ResultNormalizer;
pub use router::UpdateRouter;

use crate::batch::{BatchRejection, BatchValidator, UpdateOutcome, UpdateRequest};
use crate::host::HostClient;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;

/// Response of one orchestrator invocation.
///
/// Serializes to the wire contract: an array of per-item outcomes, or a
/// single `{success:false, message}` object on aggregate rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BatchResult {
    Completed(Vec<UpdateOutcome>),
    Rejected(BatchRejection),
}

/// Top-level entry point: validate, then route each request in order.
pub struct BatchOrchestrator<'a> {
    host: &'a dyn HostClient,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(host: &'a dyn HostClient) -> Self {
        Self { host }
    }

    /// Process one batch. Items run strictly in input order, one at a
    /// time; every request produces exactly one outcome in the same slot.
    pub fn run(&self, batch: &[Value]) -> BatchResult {
        if let Err(rejection) = BatchValidator::validate(batch) {
            return BatchResult::Rejected(rejection);
        }

        let router = UpdateRouter::new(self.host);

        let pb = ProgressBar::new(batch.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        let mut outcomes = Vec::with_capacity(batch.len());
        for item in batch {
            pb.set_message(format!("Updating {}", UpdateRequest::kind_label(item)));
            outcomes.push(router.route(item));
            pb.inc(1);
        }
        pb.finish_and_clear();

        BatchResult::Completed(outcomes)
    }
}
