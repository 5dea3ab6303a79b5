use crate::batch::{
    MSG_MISSING_PARAMS, MSG_UNSUPPORTED_TYPE, RequestShapeError, UpdateOutcome, UpdateRequest,
};
use crate::host::{HostClient, PackageKind};
use crate::orchestrator::handlers::{CoreUpdateHandler, PackageUpdateHandler};
use serde_json::Value;

/// Dispatches one request to the handler matching its declared type.
///
/// Total over its input: every wire object maps to exactly one outcome,
/// including malformed items and unknown type discriminants.
pub struct UpdateRouter<'a> {
    host: &'a dyn HostClient,
}

impl<'a> UpdateRouter<'a> {
    pub fn new(host: &'a dyn HostClient) -> Self {
        Self { host }
    }

    pub fn route(&self, item: &Value) -> UpdateOutcome {
        match UpdateRequest::from_value(item) {
            Ok(UpdateRequest::Core { version, locale }) => {
                CoreUpdateHandler::new(self.host).apply(version.as_deref(), locale.as_deref())
            }
            Ok(UpdateRequest::Plugin(request)) => {
                PackageUpdateHandler::new(self.host).apply(PackageKind::Plugin, &request)
            }
            Ok(UpdateRequest::Theme(request)) => {
                PackageUpdateHandler::new(self.host).apply(PackageKind::Theme, &request)
            }
            Err(RequestShapeError::MissingParameters) => {
                UpdateOutcome::failure(MSG_MISSING_PARAMS)
            }
            Err(RequestShapeError::UnsupportedType(_)) => {
                UpdateOutcome::failure(MSG_UNSUPPORTED_TYPE)
            }
        }
    }
}
