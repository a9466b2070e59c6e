use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::AuthError;

/// The persisted credential pair. Created by an external login flow; this
/// subsystem only reads it and rewrites it when the provider rotates tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp of the last rewrite.
    #[serde(default)]
    pub updated_at: i64,
}

/// Load/persist a [`TokenPair`] at a fixed path.
///
/// Writes go through a temporary sibling file followed by a rename, so a
/// crash mid-write never leaves a torn file behind. A single active writer
/// is assumed; there is no cross-process lock.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored pair. A missing file is a configuration error, not
    /// a bootstrap opportunity: the login flow that creates the file is
    /// outside this subsystem.
    pub fn load(&self) -> Result<TokenPair, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(AuthError::MissingTokenFile(self.path.clone()));
            }
            Err(err) => {
                return Err(AuthError::Storage {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| AuthError::MalformedTokenFile {
            path: self.path.clone(),
            source,
        })
    }

    /// Persists a rotated pair atomically and stamps `updated_at`.
    pub fn save(&self, access_token: String, refresh_token: String) -> Result<TokenPair, AuthError> {
        let pair = TokenPair {
            access_token,
            refresh_token,
            updated_at: chrono::Utc::now().timestamp(),
        };

        let serialized = serde_json::to_string(&pair).map_err(|source| {
            AuthError::MalformedTokenFile {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = self.path.with_extension("tmp");
        let storage_err = |source| AuthError::Storage {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, serialized).map_err(storage_err)?;
        fs::rename(&tmp, &self.path).map_err(storage_err)?;

        Ok(pair)
    }
}
