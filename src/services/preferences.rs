//! Immersive-mode preference, persisted as a one-key JSON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The persisted part of the immersive settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmersivePreference {
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files fall back to the default.
    pub async fn load(&self) -> ImmersivePreference {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Cannot read preferences {}: {}", self.path.display(), e);
                }
                return ImmersivePreference::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring corrupt preferences {}: {}", self.path.display(), e);
            ImmersivePreference::default()
        })
    }

    pub async fn save(&self, pref: ImmersivePreference) -> Result<(), PreferencesError> {
        let json = serde_json::to_string(&pref)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| self.io_error(source))?;
            }
        }

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| self.io_error(source))?;
        Ok(())
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<ImmersivePreference, PreferencesError> {
        let pref = ImmersivePreference { enabled };
        self.save(pref).await?;
        tracing::debug!("Immersive mode {}", if enabled { "enabled" } else { "disabled" });
        Ok(pref)
    }

    fn io_error(&self, source: std::io::Error) -> PreferencesError {
        PreferencesError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

