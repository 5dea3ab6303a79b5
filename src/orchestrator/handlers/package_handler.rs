use crate::batch::{MSG_UPDATE_FAILED, MSG_UPDATE_NOT_FOUND, PackageRequest, UpdateOutcome};
use crate::error::Result;
use crate::host::{HostClient, PackageKind, UpgradeStatus};
use crate::orchestrator::normalizer::ResultNormalizer;
use crate::orchestrator::policy::PolicyGuard;

/// Resolves and applies a plugin or theme upgrade, preserving plugin
/// activation state across the update.
pub struct PackageUpdateHandler<'a> {
    host: &'a dyn HostClient,
}

impl<'a> PackageUpdateHandler<'a> {
    pub fn new(host: &'a dyn HostClient) -> Self {
        Self { host }
    }

    /// Apply one plugin/theme update.
    ///
    /// The host's automatic-update policy for `kind` is force-enabled for
    /// the duration of this call only; the guard restores the prior value
    /// on every exit path.
    pub fn apply(&self, kind: PackageKind, request: &PackageRequest) -> UpdateOutcome {
        let _policy = match PolicyGuard::enable(self.host, kind) {
            Ok(guard) => guard,
            Err(e) => {
                if std::env::var("SITEUP_VERBOSE").is_ok() {
                    eprintln!("[VERBOSE] could not enable auto-update policy: {}", e);
                }
                return UpdateOutcome::failure(MSG_UPDATE_FAILED);
            }
        };

        match self.try_apply(kind, request) {
            Ok(outcome) => outcome,
            Err(e) => {
                if std::env::var("SITEUP_VERBOSE").is_ok() {
                    eprintln!("[VERBOSE] {} update aborted: {}", kind.as_str(), e);
                }
                UpdateOutcome::failure(MSG_UPDATE_FAILED)
            }
        }
    }

    fn try_apply(&self, kind: PackageKind, request: &PackageRequest) -> Result<UpdateOutcome> {
        self.host.refresh_metadata(kind)?;

        let pending = self.host.pending_updates(kind)?;
        let mut update = match pending.get(&request.slug) {
            Some(update) => update.clone(),
            None => return Ok(UpdateOutcome::failure(MSG_UPDATE_NOT_FOUND)),
        };

        if let Some(source) = &request.source {
            update.package = Some(source.clone());
        }

        let status = match kind {
            PackageKind::Plugin => self.update_plugin(request, &update)?,
            PackageKind::Theme => {
                let status = self.host.execute_automatic_update(kind, &update)?;
                self.host.refresh_metadata(kind)?;
                status
            }
        };

        Ok(ResultNormalizer::normalize(status, MSG_UPDATE_FAILED))
    }

    fn update_plugin(
        &self,
        request: &PackageRequest,
        update: &crate::host::PackageUpdate,
    ) -> Result<UpgradeStatus> {
        // Activation state must be captured before the update: the upgrade
        // path deactivates the plugin while files are swapped.
        let was_active = self.host.is_plugin_active(&request.slug)?;

        let status = self
            .host
            .execute_automatic_update(PackageKind::Plugin, update)?;

        self.host.refresh_metadata(PackageKind::Plugin)?;

        let force_activate =
            request.activate == Some(true) && matches!(status, UpgradeStatus::Applied);
        if was_active || force_activate {
            self.host.activate_plugin(&request.slug)?;
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::MSG_SUCCESS;
    use crate::host::UpstreamError;
    use crate::host::testing::{MockHost, package_update};

    fn request(slug: &str) -> PackageRequest {
        PackageRequest {
            slug: slug.to_string(),
            activate: None,
            source: None,
        }
    }

    #[test]
    fn missing_pending_entry_is_not_found() {
        let host = MockHost::new();
        let outcome =
            PackageUpdateHandler::new(&host).apply(PackageKind::Plugin, &request("x/x.php"));

        assert!(!outcome.status);
        assert_eq!(outcome.message, MSG_UPDATE_NOT_FOUND);
        assert!(host.automatic_updates().is_empty());
        // Metadata was still refreshed before the cache lookup.
        assert_eq!(host.refresh_calls(), vec![PackageKind::Plugin]);
    }

    #[test]
    fn updates_pending_plugin() {
        let host = MockHost::new()
            .with_pending(PackageKind::Plugin, package_update("x/x.php", "2.0"));
        let outcome =
            PackageUpdateHandler::new(&host).apply(PackageKind::Plugin, &request("x/x.php"));

        assert!(outcome.status);
        assert_eq!(outcome.message, MSG_SUCCESS);
        assert_eq!(host.automatic_updates().len(), 1);
        assert_eq!(
            host.refresh_calls(),
            vec![PackageKind::Plugin, PackageKind::Plugin]
        );
    }

    #[test]
    fn active_plugin_is_reactivated() {
        let host = MockHost::new()
            .with_pending(PackageKind::Plugin, package_update("x/x.php", "2.0"))
            .with_active_plugin("x/x.php");

        PackageUpdateHandler::new(&host).apply(PackageKind::Plugin, &request("x/x.php"));
        assert_eq!(host.activations(), vec!["x/x.php".to_string()]);
        assert!(host.is_active("x/x.php"));
    }

    #[test]
    fn inactive_plugin_stays_inactive() {
        let host = MockHost::new()
            .with_pending(PackageKind::Plugin, package_update("x/x.php", "2.0"));

        PackageUpdateHandler::new(&host).apply(PackageKind::Plugin, &request("x/x.php"));
        assert!(host.activations().is_empty());
        assert!(!host.is_active("x/x.php"));
    }

    #[test]
    fn activate_flag_activates_after_successful_update() {
        let host = MockHost::new()
            .with_pending(PackageKind::Plugin, package_update("x/x.php", "2.0"));
        let request = PackageRequest {
            slug: "x/x.php".to_string(),
            activate: Some(true),
            source: None,
        };

        PackageUpdateHandler::new(&host).apply(PackageKind::Plugin, &request);
        assert!(host.is_active("x/x.php"));
    }

    #[test]
    fn activate_flag_ignored_on_failed_update() {
        let host = MockHost::new()
            .with_pending(PackageKind::Plugin, package_update("x/x.php", "2.0"))
            .with_update_status(UpgradeStatus::Failed(UpstreamError::new(
                "download_failed",
                "Download failed.",
            )));
        let request = PackageRequest {
            slug: "x/x.php".to_string(),
            activate: Some(true),
            source: None,
        };

        let outcome = PackageUpdateHandler::new(&host).apply(PackageKind::Plugin, &request);
        assert!(!outcome.status);
        assert!(host.activations().is_empty());
    }

    #[test]
    fn source_overrides_package_location() {
        let host = MockHost::new()
            .with_pending(PackageKind::Plugin, package_update("x/x.php", "2.0"));
        let request = PackageRequest {
            slug: "x/x.php".to_string(),
            activate: None,
            source: Some("https://mirror.example.org/x.zip".to_string()),
        };

        PackageUpdateHandler::new(&host).apply(PackageKind::Plugin, &request);
        let (_, update) = &host.automatic_updates()[0];
        assert_eq!(
            update.package.as_deref(),
            Some("https://mirror.example.org/x.zip")
        );
    }

    #[test]
    fn plugin_failure_surfaces_upstream_message() {
        let host = MockHost::new()
            .with_pending(PackageKind::Plugin, package_update("x/x.php", "2.0"))
            .with_update_status(UpgradeStatus::Failed(
                UpstreamError::new("download_failed", "Download failed.").with_data("timeout"),
            ));

        let outcome =
            PackageUpdateHandler::new(&host).apply(PackageKind::Plugin, &request("x/x.php"));
        assert!(!outcome.status);
        assert_eq!(outcome.message, "Download failed.: timeout");
    }

    #[test]
    fn skipped_update_reports_default_failure() {
        let host = MockHost::new()
            .with_pending(PackageKind::Theme, package_update("twentytwenty", "1.9"))
            .with_update_status(UpgradeStatus::Skipped);

        let outcome =
            PackageUpdateHandler::new(&host).apply(PackageKind::Theme, &request("twentytwenty"));
        assert!(!outcome.status);
        assert_eq!(outcome.message, MSG_UPDATE_FAILED);
    }

    #[test]
    fn theme_update_skips_activation_bookkeeping() {
        let host = MockHost::new()
            .with_pending(PackageKind::Theme, package_update("twentytwenty", "1.9"));

        let outcome =
            PackageUpdateHandler::new(&host).apply(PackageKind::Theme, &request("twentytwenty"));
        assert!(outcome.status);
        assert!(host.activations().is_empty());
        assert_eq!(
            host.refresh_calls(),
            vec![PackageKind::Theme, PackageKind::Theme]
        );
    }

    #[test]
    fn policy_restored_after_success() {
        let host = MockHost::new()
            .with_policy(PackageKind::Plugin, false)
            .with_pending(PackageKind::Plugin, package_update("x/x.php", "2.0"));

        PackageUpdateHandler::new(&host).apply(PackageKind::Plugin, &request("x/x.php"));
        assert_eq!(host.policy(PackageKind::Plugin), Some(false));
    }

    #[test]
    fn policy_restored_after_not_found() {
        let host = MockHost::new().with_policy(PackageKind::Theme, false);

        PackageUpdateHandler::new(&host).apply(PackageKind::Theme, &request("missing"));
        assert_eq!(host.policy(PackageKind::Theme), Some(false));
    }

    #[test]
    fn policy_restored_after_transport_failure() {
        let host = MockHost::new()
            .with_policy(PackageKind::Plugin, false)
            .with_pending(PackageKind::Plugin, package_update("x/x.php", "2.0"))
            .with_failing_automatic_update();

        let outcome =
            PackageUpdateHandler::new(&host).apply(PackageKind::Plugin, &request("x/x.php"));
        assert!(!outcome.status);
        assert_eq!(outcome.message, MSG_UPDATE_FAILED);
        assert_eq!(host.policy(PackageKind::Plugin), Some(false));
    }
}
