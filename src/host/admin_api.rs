use crate::error::{Result, SiteupError};
use crate::host::{CoreUpdate, HostClient, PackageKind, PackageUpdate, UpgradeStatus, UpstreamError};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

// Upgrades download and unpack archives on the host; keep the client
// timeout generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Blocking client for the host's admin update API.
pub struct AdminApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl AdminApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| SiteupError::HostApi(format!("Invalid host URL '{}': {}", base_url, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(SiteupError::HostApi(format!(
                "Unsupported URL scheme '{}'",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("siteup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SiteupError::HostApi(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        })
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        if std::env::var("SITEUP_VERBOSE").is_ok() {
            eprintln!("[VERBOSE] GET {}", url);
        }

        let response = self
            .request(self.client.get(&url).query(query))
            .send()
            .map_err(|e| SiteupError::HostApi(format!("GET {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            return Err(SiteupError::HostApi(format!(
                "GET {} returned HTTP {}",
                path,
                response.status()
            )));
        }

        response
            .json()
            .map_err(|e| SiteupError::HostApi(format!("GET {}: invalid response: {}", path, e)))
    }

    fn post_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        if std::env::var("SITEUP_VERBOSE").is_ok() {
            eprintln!("[VERBOSE] POST {}", url);
        }

        let response = self
            .request(self.client.post(&url).json(body))
            .send()
            .map_err(|e| SiteupError::HostApi(format!("POST {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            return Err(SiteupError::HostApi(format!(
                "POST {} returned HTTP {}",
                path,
                response.status()
            )));
        }

        response
            .json()
            .map_err(|e| SiteupError::HostApi(format!("POST {}: invalid response: {}", path, e)))
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    version: String,
    locale: String,
}

#[derive(Debug, Deserialize)]
struct CoreUpdateResponse {
    update: Option<CoreUpdate>,
}

#[derive(Debug, Deserialize)]
struct PendingUpdatesResponse {
    #[serde(default)]
    updates: HashMap<String, PackageUpdate>,
}

#[derive(Debug, Deserialize)]
struct ActiveResponse {
    active: bool,
}

#[derive(Debug, Deserialize)]
struct AcknowledgeResponse {
    #[serde(default)]
    #[allow(dead_code)]
    ok: bool,
}

#[derive(Debug, Deserialize)]
struct PolicyResponse {
    previous: bool,
}

#[derive(Debug, Deserialize)]
struct UpgradeErrorBody {
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpgradeResponse {
    #[serde(default)]
    applied: bool,
    #[serde(default)]
    error: Option<UpgradeErrorBody>,
}

impl UpgradeResponse {
    fn into_status(self) -> UpgradeStatus {
        if let Some(error) = self.error {
            return UpgradeStatus::Failed(UpstreamError {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        if self.applied {
            UpgradeStatus::Applied
        } else {
            UpgradeStatus::Skipped
        }
    }
}

#[derive(Serialize)]
struct CoreUpgradePayload<'a> {
    version: &'a str,
    locale: &'a str,
    package: &'a str,
    relaxed_file_ownership: bool,
}

#[derive(Serialize)]
struct PackageUpgradePayload<'a> {
    slug: &'a str,
    new_version: &'a str,
    package: Option<&'a str>,
}

#[derive(Serialize)]
struct ActivatePayload<'a> {
    slug: &'a str,
    silent: bool,
    network_wide: bool,
}

#[derive(Serialize)]
struct PolicyPayload<'a> {
    kind: &'a str,
    enabled: bool,
}

#[derive(Serialize)]
struct Empty {}

impl HostClient for AdminApiClient {
    fn installed_version(&self) -> Result<String> {
        let status: StatusResponse = self.get_json("status", &[])?;
        Ok(status.version)
    }

    fn current_locale(&self) -> Result<String> {
        let status: StatusResponse = self.get_json("status", &[])?;
        Ok(status.locale)
    }

    fn locate_core_update(&self, version: &str, locale: &str) -> Result<Option<CoreUpdate>> {
        let response: CoreUpdateResponse =
            self.get_json("core/update", &[("version", version), ("locale", locale)])?;
        Ok(response.update)
    }

    fn execute_core_upgrade(
        &self,
        update: &CoreUpdate,
        relaxed_file_ownership: bool,
    ) -> Result<UpgradeStatus> {
        let payload = CoreUpgradePayload {
            version: &update.version,
            locale: &update.locale,
            package: &update.package,
            relaxed_file_ownership,
        };
        let response: UpgradeResponse = self.post_json("core/upgrade", &payload)?;
        Ok(response.into_status())
    }

    fn refresh_metadata(&self, kind: PackageKind) -> Result<()> {
        let path = format!("{}/refresh", kind.endpoint());
        let _: AcknowledgeResponse = self.post_json(&path, &Empty {})?;
        Ok(())
    }

    fn pending_updates(&self, kind: PackageKind) -> Result<HashMap<String, PackageUpdate>> {
        let path = format!("{}/updates", kind.endpoint());
        let response: PendingUpdatesResponse = self.get_json(&path, &[])?;
        Ok(response.updates)
    }

    fn execute_automatic_update(
        &self,
        kind: PackageKind,
        update: &PackageUpdate,
    ) -> Result<UpgradeStatus> {
        let path = format!("{}/upgrade", kind.endpoint());
        let payload = PackageUpgradePayload {
            slug: &update.slug,
            new_version: &update.new_version,
            package: update.package.as_deref(),
        };
        let response: UpgradeResponse = self.post_json(&path, &payload)?;
        Ok(response.into_status())
    }

    fn is_plugin_active(&self, slug: &str) -> Result<bool> {
        let response: ActiveResponse = self.get_json("plugins/active", &[("slug", slug)])?;
        Ok(response.active)
    }

    fn activate_plugin(&self, slug: &str) -> Result<()> {
        let payload = ActivatePayload {
            slug,
            silent: true,
            network_wide: false,
        };
        let _: AcknowledgeResponse = self.post_json("plugins/activate", &payload)?;
        Ok(())
    }

    fn set_auto_update_policy(&self, kind: PackageKind, enabled: bool) -> Result<bool> {
        let payload = PolicyPayload {
            kind: kind.as_str(),
            enabled,
        };
        let response: PolicyResponse = self.post_json("auto-update-policy", &payload)?;
        Ok(response.previous)
    }
}
