//! File-backed settings store.
//!
//! The whole deployment shares one JSON document. Reads never fail: a
//! missing or unreadable document means "use defaults". Saves inside one
//! process are serialized by a mutex and replace the file atomically by
//! writing a sibling temp file and renaming it over the original. Across
//! processes the last rename wins.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;

use asseto_core::{DomainError, Settings, SettingsInput};

/// Errors from saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The submitted form is invalid; nothing was written.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Settings document at a fixed path.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored document, or `None` if it is missing or unparseable.
    pub async fn load(&self) -> Option<Settings> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read settings");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt settings");
                None
            }
        }
    }

    /// The stored document, or defaults.
    pub async fn current(&self) -> Settings {
        self.load().await.unwrap_or_default()
    }

    /// Validate `input` and overwrite the whole document.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` without touching the file when the
    /// form is invalid, or an I/O or serialization error if the write fails.
    pub async fn save(&self, input: &SettingsInput) -> Result<Settings, SettingsError> {
        let settings = input.validate(Utc::now())?;
        let json = serde_json::to_vec_pretty(&settings)?;

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = self.tmp_path();
        if let Err(e) = Self::replace(&tmp_path, &self.path, &json).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        tracing::info!(
            path = %self.path.display(),
            company = %settings.company_name,
            currency = %settings.currency,
            "Settings saved"
        );
        Ok(settings)
    }

    async fn replace(tmp_path: &Path, path: &Path, json: &[u8]) -> std::io::Result<()> {
        tokio::fs::write(tmp_path, json).await?;
        tokio::fs::rename(tmp_path, path).await
    }

    /// Sibling temp file, unique per save so concurrent writers in other
    /// processes never share one.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(format!(".{}.tmp", uuid::Uuid::new_v4()));
        self.path.with_file_name(name)
    }
}
