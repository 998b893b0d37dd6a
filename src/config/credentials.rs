//! Persisted API key
//!
//! The key lives in a small JSON document, `{"ApiKey": "..."}`. Reading is
//! forgiving: a missing, unreadable or malformed file, or an empty key, all
//! mean "no key yet" and send the user through the capture prompt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// The Jackett API key
///
/// Never empty. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, trimming surrounding whitespace
    ///
    /// Returns `None` for a blank key.
    #[must_use]
    pub fn new(key: impl AsRef<str>) -> Option<Self> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            None
        } else {
            Some(Self(key.to_string()))
        }
    }

    /// The key itself, for embedding in requests
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// On-disk shape of the credential file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialFile {
    #[serde(rename = "ApiKey", default)]
    pub api_key: String,
}

impl CredentialFile {
    /// Read the stored key
    ///
    /// Any read or parse failure is reported as `None`.
    #[must_use]
    pub fn load(path: &Path) -> Option<ApiKey> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no stored API key");
                return None;
            }
        };

        match serde_json::from_str::<Self>(&contents) {
            Ok(file) => ApiKey::new(file.api_key),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring malformed credential file"
                );
                None
            }
        }
    }

    /// Persist a key, creating the parent directory if needed
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the directory or file cannot be written.
    pub fn save(path: &Path, key: &ApiKey) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = Self {
            api_key: key.expose().to_string(),
        };
        let json = serde_json::to_string(&file).map_err(io::Error::other)?;
        fs::write(path, json)?;

        tracing::info!(path = %path.display(), "stored API key");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_api_key_rejects_blank() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   ").is_none());
        assert_eq!(ApiKey::new(" abc ").unwrap().expose(), "abc");
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("supersecret").unwrap();
        assert!(!format!("{key:?}").contains("supersecret"));
    }

    #[test]
    fn test_load_existing_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("privateer.json");
        fs::write(&path, r#"{"ApiKey":"abc123"}"#).unwrap();

        assert_eq!(CredentialFile::load(&path), ApiKey::new("abc123"));
    }

    #[test]
    fn test_load_missing_or_invalid_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("privateer.json");
        assert!(CredentialFile::load(&path).is_none());

        fs::write(&path, "not json").unwrap();
        assert!(CredentialFile::load(&path).is_none());

        fs::write(&path, r#"{"ApiKey":""}"#).unwrap();
        assert!(CredentialFile::load(&path).is_none());

        fs::write(&path, r#"{"Other":"x"}"#).unwrap();
        assert!(CredentialFile::load(&path).is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("privateer.json");
        let key = ApiKey::new("k3y").unwrap();

        CredentialFile::save(&path, &key).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, r#"{"ApiKey":"k3y"}"#);
        assert_eq!(CredentialFile::load(&path), Some(key));
    }
}
