use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;

pub mod admin_api;
pub use admin_api::AdminApiClient;

/// The two package kinds handled by the automatic-update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageKind {
    Plugin,
    Theme,
}

impl PackageKind {
    /// Wire value used in request payloads and policy calls.
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::Plugin => "plugin",
            PackageKind::Theme => "theme",
        }
    }

    /// Collection path segment on the host admin API.
    pub fn endpoint(&self) -> &'static str {
        match self {
            PackageKind::Plugin => "plugins",
            PackageKind::Theme => "themes",
        }
    }
}

/// Descriptor for an applicable core update located by the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoreUpdate {
    pub version: String,
    pub locale: String,
    /// Download location of the upgrade package.
    pub package: String,
    /// Whether applying this update writes files that do not exist yet.
    /// When false, the upgrade may run with relaxed file ownership.
    #[serde(default)]
    pub new_files: bool,
}

/// Descriptor for a pending plugin or theme update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageUpdate {
    pub slug: String,
    pub new_version: String,
    #[serde(default)]
    pub package: Option<String>,
}

/// Failure signal reported by the host upgrade subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamError {
    pub code: String,
    pub message: String,
    pub data: Option<String>,
}

impl UpstreamError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

/// Terminal state of one upgrade invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeStatus {
    /// The upgrade ran and the new version is in place.
    Applied,
    /// The backend declined to run without reporting an error.
    Skipped,
    /// The backend reported an error.
    Failed(UpstreamError),
}

/// Capabilities the orchestrator consumes from the host environment.
///
/// `AdminApiClient` is the production implementation; tests substitute an
/// in-memory double through this seam.
pub trait HostClient: Send + Sync {
    /// Currently installed core version.
    fn installed_version(&self) -> Result<String>;

    /// Current locale of the host.
    fn current_locale(&self) -> Result<String>;

    /// Locate an applicable core update for `(version, locale)`.
    fn locate_core_update(&self, version: &str, locale: &str) -> Result<Option<CoreUpdate>>;

    /// Run the core upgrade for a located update.
    fn execute_core_upgrade(
        &self,
        update: &CoreUpdate,
        relaxed_file_ownership: bool,
    ) -> Result<UpgradeStatus>;

    /// Refresh the host's pending-update metadata cache for a kind.
    fn refresh_metadata(&self, kind: PackageKind) -> Result<()>;

    /// Read the site-wide cache of pending updates for a kind, keyed by slug.
    fn pending_updates(&self, kind: PackageKind) -> Result<HashMap<String, PackageUpdate>>;

    /// Run the automatic-update path for one pending update.
    fn execute_automatic_update(
        &self,
        kind: PackageKind,
        update: &PackageUpdate,
    ) -> Result<UpgradeStatus>;

    /// Whether the plugin is currently active on the site.
    fn is_plugin_active(&self, slug: &str) -> Result<bool>;

    /// Activate a plugin silently: no activation notice, no redirect,
    /// never network-wide.
    fn activate_plugin(&self, slug: &str) -> Result<()>;

    /// Set the automatic-update policy flag for a kind and return the
    /// previous value so callers can restore it.
    fn set_auto_update_policy(&self, kind: PackageKind, enabled: bool) -> Result<bool>;
}
