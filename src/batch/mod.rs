// Batch module - the request/response data model for one orchestrator call
//
// Requests arrive as loosely-shaped JSON objects. They are checked at
// construction time into tagged variants (`UpdateRequest`) so that every
// later stage works with a known shape; the legacy field-count inference
// of the original wire format is intentionally not reproduced.
pub mod validator;

pub use validator::BatchValidator;

use serde::Serialize;
use serde_json::Value;

/// Aggregate rejection message for out-of-bounds batch sizes.
pub const MSG_BATCH_LIMIT: &str = "Minimum 1 and Maximum 5 updates are allowed!";
/// Per-item message when a request object is structurally malformed.
pub const MSG_MISSING_PARAMS: &str = "Required parameters are missing!";
/// Per-item message for an unrecognized `type` discriminant.
pub const MSG_UNSUPPORTED_TYPE: &str = "Unsupported update type";
/// No applicable update exists for the requested item.
pub const MSG_UPDATE_NOT_FOUND: &str = "Update not found!";
/// Canonical success message.
pub const MSG_SUCCESS: &str = "Success!";
/// Collapsed failure message for the core upgrade path.
pub const MSG_CORE_FAILED: &str = "Installation failed.";
/// Default failure message for the plugin/theme upgrade path.
pub const MSG_UPDATE_FAILED: &str = "Update Failed!";

/// Parameters shared by plugin and theme requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    /// Unique identifier of the target item (e.g. `akismet/akismet.php`).
    pub slug: String,
    /// Activate the plugin after a successful update even if it was
    /// previously inactive. Ignored for themes.
    pub activate: Option<bool>,
    /// Override for the descriptor's package download location.
    pub source: Option<String>,
}

/// One update request, tagged by the `type` field of the wire object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateRequest {
    Core {
        version: Option<String>,
        locale: Option<String>,
    },
    Plugin(PackageRequest),
    Theme(PackageRequest),
}

/// Why a wire object could not be turned into an `UpdateRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestShapeError {
    /// Not an object, no usable `type`, or a required field is absent.
    MissingParameters,
    /// The `type` discriminant is none of `core`, `plugin`, `theme`.
    UnsupportedType(String),
}

impl UpdateRequest {
    /// Parse one wire object into a typed request.
    ///
    /// Shape problems and unknown discriminants are reported separately so
    /// the router can produce the two distinct per-item failure messages.
    pub fn from_value(value: &Value) -> std::result::Result<Self, RequestShapeError> {
        let object = value
            .as_object()
            .ok_or(RequestShapeError::MissingParameters)?;

        let kind = object
            .get("type")
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty())
            .ok_or(RequestShapeError::MissingParameters)?;

        match kind {
            "core" => Ok(Self::Core {
                version: string_field(object, "version"),
                locale: string_field(object, "locale"),
            }),
            "plugin" | "theme" => {
                let slug = string_field(object, "slug")
                    .filter(|slug| !slug.is_empty())
                    .ok_or(RequestShapeError::MissingParameters)?;

                let request = PackageRequest {
                    slug,
                    activate: object.get("activate").and_then(Value::as_bool),
                    source: string_field(object, "source"),
                };

                if kind == "plugin" {
                    Ok(Self::Plugin(request))
                } else {
                    Ok(Self::Theme(request))
                }
            }
            other => Err(RequestShapeError::UnsupportedType(other.to_string())),
        }
    }

    /// Short label used for progress output.
    pub fn kind_label(value: &Value) -> &str {
        value
            .get("type")
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty())
            .unwrap_or("unknown")
    }
}

fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Per-item result of one update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub status: bool,
    pub message: String,
}

impl UpdateOutcome {
    pub fn success() -> Self {
        Self {
            status: true,
            message: MSG_SUCCESS.to_string(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
        }
    }
}

/// Terminating response replacing the per-item result list when the batch
/// itself is malformed. `success` is always `false` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRejection {
    pub success: bool,
    pub message: String,
}

impl BatchRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
