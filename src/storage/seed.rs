//! Where the initial conversation list comes from.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::path::{Path, PathBuf};

use crate::models::{Conversation, ConversationStatus, NewConversation};
use crate::storage::store::{ConversationListStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Seed file not found: {0}")]
    Missing(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Cannot serialize conversations for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid seed: {0}")]
    Store(#[from] StoreError),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn load(&self) -> Result<Vec<NewConversation>, SeedError>;

    /// Whether [`save`](SeedSource::save) writes anywhere.
    fn is_persistent(&self) -> bool {
        false
    }

    async fn save(&self, _conversations: &[Conversation]) -> Result<(), SeedError> {
        Ok(())
    }
}

/// Loads a seed and builds the store from it.
pub async fn load_store(
    source: &dyn SeedSource,
    event_capacity: usize,
) -> Result<ConversationListStore, SeedError> {
    let seed = source.load().await?;
    let store = ConversationListStore::with_event_capacity(seed, event_capacity)?;
    Ok(store)
}

/// A JSON array of conversations on disk.
#[derive(Debug, Clone)]
pub struct JsonSeedFile {
    path: PathBuf,
}

impl JsonSeedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SeedError {
        SeedError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SeedSource for JsonSeedFile {
    async fn load(&self) -> Result<Vec<NewConversation>, SeedError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SeedError::Missing(self.path.clone()))
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let seed: Vec<NewConversation> =
            serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!("Loaded {} conversations from {}", seed.len(), self.path.display());
        Ok(seed)
    }

    fn is_persistent(&self) -> bool {
        true
    }

    async fn save(&self, conversations: &[Conversation]) -> Result<(), SeedError> {
        let json = serde_json::to_string_pretty(conversations).map_err(|source| {
            SeedError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::debug!("Saved {} conversations to {}", conversations.len(), self.path.display());
        Ok(())
    }
}

/// The sidebar's sample conversations, timed relative to now.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSeed;

impl DemoSeed {
    pub fn conversations(&self) -> Vec<NewConversation> {
        let now = Utc::now();
        vec![
            NewConversation::new("1", "Conversation au restaurant", "Français")
                .with_flag("🇫🇷")
                .with_last_message("Très bien ! J'ai une jolie table...")
                .with_timestamp(now - Duration::minutes(1))
                .with_status(ConversationStatus::Active),
            NewConversation::new("2", "Shopping à Paris", "Français")
                .with_flag("🇫🇷")
                .with_last_message("Avez-vous cette robe en taille M ?")
                .with_timestamp(now - Duration::hours(1))
                .with_status(ConversationStatus::Active),
            NewConversation::new("3", "Réservation d'hôtel", "Français")
                .with_flag("🇫🇷")
                .with_last_message("Je voudrais réserver une chambre...")
                .with_timestamp(now - Duration::days(1))
                .with_status(ConversationStatus::Completed),
            NewConversation::new("4", "At the train station", "English")
                .with_flag("🇬🇧")
                .with_last_message("Which platform for London?")
                .with_timestamp(now - Duration::days(2))
                .with_status(ConversationStatus::Completed),
            NewConversation::new("5", "En el mercado", "Español")
                .with_flag("🇪🇸")
                .with_last_message("¿Cuánto cuesta esto?")
                .with_timestamp(now - Duration::days(3))
                .with_status(ConversationStatus::Archived),
        ]
    }
}

#[async_trait]
impl SeedSource for DemoSeed {
    async fn load(&self) -> Result<Vec<NewConversation>, SeedError> {
        Ok(self.conversations())
    }
}
