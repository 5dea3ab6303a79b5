use crate::error::{Result, SiteupError};
use serde_json::Value;
use std::path::Path;

/// Loads a batch request file from disk.
///
/// The file must contain a top-level JSON array of request objects; the
/// size bounds and per-item shapes are checked later by the orchestrator,
/// not here.
pub struct BatchFile;

impl BatchFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<Value>> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(SiteupError::BatchValidation(format!(
                "Batch file '{}' does not exist",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let parsed: Value = serde_json::from_str(&content)?;

        match parsed {
            Value::Array(items) => Ok(items),
            _ => Err(SiteupError::BatchValidation(format!(
                "Batch file '{}' must contain a JSON array of update requests",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_array_of_requests() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(&path, r#"[{"type":"core"},{"type":"plugin","slug":"x/x.php"}]"#).unwrap();

        let batch = BatchFile::load(&path).unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn rejects_missing_file() {
        let dir = tempdir().unwrap();
        let err = BatchFile::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SiteupError::BatchValidation(_)));
    }

    #[test]
    fn rejects_non_array_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(&path, r#"{"type":"core"}"#).unwrap();

        let err = BatchFile::load(&path).unwrap_err();
        assert!(matches!(err, SiteupError::BatchValidation(_)));
    }

    #[test]
    fn rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(&path, "[{").unwrap();

        let err = BatchFile::load(&path).unwrap_err();
        assert!(matches!(err, SiteupError::Json(_)));
    }
}
