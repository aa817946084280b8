use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

/// Main configuration for LinguaFlow
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct Config {
    /// How long the "undo archive" affordance stays available, in seconds
    #[validate(range(min = 1, max = 60))]
    pub undo_window_secs: u64,

    /// Buffered change events per observer before it lags
    #[validate(range(min = 1, max = 4096))]
    pub event_capacity: usize,

    /// Log level (e.g., info, debug, trace)
    pub log_level: String,

    /// Optional JSON seed file; the demo conversations are used when unset
    pub seed_path: Option<String>,

    /// Where the immersive-mode flag is persisted
    #[validate(length(min = 1))]
    pub preferences_path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl Config {
    pub fn load() -> Result<Self, ConfigLoadError> {
        let home = home_dir();
        let defaults = Config::default();

        let settings = config::Config::builder()
            // Core defaults
            .set_default("undo_window_secs", defaults.undo_window_secs as i64)?
            .set_default("event_capacity", defaults.event_capacity as i64)?
            .set_default("log_level", defaults.log_level)?
            .set_default("preferences_path", defaults.preferences_path)?
            // Load from ~/.linguaflow/config.toml (if present)
            .add_source(
                config::File::with_name(&format!("{}/.linguaflow/config", home.display()))
                    .required(false),
            )
            // Environment overrides: LINGUAFLOW__UNDO_WINDOW_SECS, LINGUAFLOW__SEED_PATH, etc.
            .add_source(config::Environment::with_prefix("LINGUAFLOW").separator("__"))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_secs(self.undo_window_secs)
    }

    pub fn seed_path(&self) -> Option<PathBuf> {
        self.seed_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub fn log_directive(&self) -> String {
        format!("linguaflow={}", self.log_level)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            undo_window_secs: 5,
            event_capacity: 64,
            log_level: "info".to_string(),
            seed_path: None,
            preferences_path: home_dir()
                .join(".linguaflow")
                .join("preferences.json")
                .display()
                .to_string(),
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
