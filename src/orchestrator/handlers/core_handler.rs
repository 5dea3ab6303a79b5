use crate::batch::{MSG_CORE_FAILED, MSG_UPDATE_NOT_FOUND, UpdateOutcome};
use crate::error::Result;
use crate::host::HostClient;
use crate::orchestrator::normalizer::ResultNormalizer;

/// Resolves and applies a core-version upgrade.
pub struct CoreUpdateHandler<'a> {
    host: &'a dyn HostClient,
}

impl<'a> CoreUpdateHandler<'a> {
    pub fn new(host: &'a dyn HostClient) -> Self {
        Self { host }
    }

    /// Apply a core upgrade, defaulting version and locale from the host.
    ///
    /// Never escalates: boundary errors come back as a failing outcome so
    /// the rest of the batch keeps processing.
    pub fn apply(&self, version: Option<&str>, locale: Option<&str>) -> UpdateOutcome {
        match self.try_apply(version, locale) {
            Ok(outcome) => outcome,
            Err(e) => {
                if std::env::var("SITEUP_VERBOSE").is_ok() {
                    eprintln!("[VERBOSE] core update aborted: {}", e);
                }
                UpdateOutcome::failure(MSG_CORE_FAILED)
            }
        }
    }

    fn try_apply(&self, version: Option<&str>, locale: Option<&str>) -> Result<UpdateOutcome> {
        let locale = match locale {
            Some(locale) => locale.to_string(),
            None => self.host.current_locale()?,
        };
        let version = match version {
            Some(version) => version.to_string(),
            None => self.host.installed_version()?,
        };

        let update = match self.host.locate_core_update(&version, &locale)? {
            Some(update) => update,
            None => return Ok(UpdateOutcome::failure(MSG_UPDATE_NOT_FOUND)),
        };

        // Relaxed file ownership is only safe when the update writes no
        // new files; the descriptor carries that decision.
        let relaxed_file_ownership = !update.new_files;

        let status = self
            .host
            .execute_core_upgrade(&update, relaxed_file_ownership)?;

        Ok(ResultNormalizer::normalize_core(status))
    }
}
