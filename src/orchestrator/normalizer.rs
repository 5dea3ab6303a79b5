use crate::batch::{MSG_CORE_FAILED, UpdateOutcome};
use crate::host::{UpgradeStatus, UpstreamError};

/// Error codes whose upstream message survives the core-path collapsing.
const PRESERVED_CORE_CODES: [&str; 2] = ["up_to_date", "locked"];

/// Converts an upgrade backend's terminal state into a uniform outcome.
pub struct ResultNormalizer;

impl ResultNormalizer {
    /// Plugin/theme normalization: any failure message is surfaced,
    /// falling back to `default_failure` when nothing usable remains.
    pub fn normalize(status: UpgradeStatus, default_failure: &str) -> UpdateOutcome {
        match status {
            UpgradeStatus::Applied => UpdateOutcome::success(),
            UpgradeStatus::Skipped => UpdateOutcome::failure(default_failure),
            UpgradeStatus::Failed(error) => {
                let message = Self::failure_message(&error);
                if message.is_empty() {
                    UpdateOutcome::failure(default_failure)
                } else {
                    UpdateOutcome::failure(message)
                }
            }
        }
    }

    /// Core normalization: only `up_to_date` and `locked` keep their
    /// upstream message; every other failure code collapses to the fixed
    /// "Installation failed." string. The dropped detail goes to the
    /// verbose channel so it is not lost entirely.
    pub fn normalize_core(status: UpgradeStatus) -> UpdateOutcome {
        match status {
            UpgradeStatus::Failed(error)
                if !PRESERVED_CORE_CODES.contains(&error.code.as_str()) =>
            {
                if std::env::var("SITEUP_VERBOSE").is_ok() {
                    eprintln!(
                        "[VERBOSE] core upgrade failed ({}): {}",
                        error.code,
                        Self::failure_message(&error)
                    );
                }
                UpdateOutcome::failure(MSG_CORE_FAILED)
            }
            other => Self::normalize(other, MSG_CORE_FAILED),
        }
    }

    fn failure_message(error: &UpstreamError) -> String {
        let message = match &error.data {
            Some(data) if !data.is_empty() => format!("{}: {}", error.message, data),
            _ => error.message.clone(),
        };
        message.trim().to_string()
    }
}
