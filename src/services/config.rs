//! User configuration (`~/.ai-usage-tracker/config.json`)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::Deserialize;
use tracing::warn;

use crate::providers::Provider;
use crate::services::fetcher::UsageSource;

/// Days of history when neither flag nor config sets it
pub const DEFAULT_DAYS: u32 = 7;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub days: Option<u32>,
    pub claude_command: Option<String>,
    pub codex_command: Option<String>,
}

impl Config {
    /// Default config file location, if a home directory exists
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|d| d.home_dir().join(".ai-usage-tracker").join("config.json"))
    }

    /// Load from the default location. Never fails.
    pub fn load() -> Self {
        Self::default_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load from `path`; missing file gives defaults, invalid file warns
    pub fn load_from(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
                return Self::default();
            }
        };

        let mut config: Self = match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                return Self::default();
            }
        };

        if config.days == Some(0) {
            warn!(path = %path.display(), "days must be at least 1, ignoring");
            config.days = None;
        }
        config
    }

    /// Flag value, else config, else [`DEFAULT_DAYS`]
    pub fn resolve_days(&self, flag: Option<u32>) -> u32 {
        flag.or(self.days).unwrap_or(DEFAULT_DAYS)
    }

    /// Usage source for `provider`, honouring a configured program
    pub fn source(&self, provider: Provider) -> UsageSource {
        let configured = match provider {
            Provider::Claude => self.claude_command.as_deref(),
            Provider::Codex => self.codex_command.as_deref(),
        };
        match configured.map(str::trim).filter(|p| !p.is_empty()) {
            Some(program) => UsageSource::new(provider, program),
            None => UsageSource::default_for(provider),
        }
    }
}
