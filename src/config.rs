//! File-based configuration: which sources exist and how often to poll.
//!
//! ```yaml
//! poll_interval_secs: 120
//! sources:
//!   - realm: event
//!     alias: pyevents
//!     title: Python Events
//!     kind: rss
//!     url: https://example.org/events.rss
//!   - realm: vacancy
//!     alias: jobs
//!     title: Python Jobs
//!     kind: rss
//!     url: https://example.org/jobs.rss
//!     active: false
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::poll::POLL_INTERVAL;
use crate::registry::SourceRegistry;
use crate::source::RssSource;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// One configured source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    pub realm: String,
    pub alias: String,
    pub title: String,
    pub kind: SourceKind,
    pub url: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Backends a source can be built from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Rss,
}

fn default_poll_interval_secs() -> u64 {
    POLL_INTERVAL.as_secs()
}

fn default_active() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            sources: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        info!(path = %path.display(), sources = config.sources.len(), "loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_saphyr::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Every source needs a realm and a url.  An empty alias is allowed and
    /// simply leaves the source unregistered.
    fn validate(&self) -> Result<(), ConfigError> {
        for (index, source) in self.sources.iter().enumerate() {
            if source.realm.trim().is_empty() {
                return Err(ConfigError::InvalidSource {
                    index,
                    reason: "realm must not be empty".into(),
                });
            }
            if source.kind == SourceKind::Rss && source.url.trim().is_empty() {
                return Err(ConfigError::InvalidSource {
                    index,
                    reason: format!("source `{}` has no url", source.alias),
                });
            }
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidInterval(self.poll_interval_secs));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Register every configured source, in file order.
    pub fn build_registry(&self) -> SourceRegistry {
        let mut registry = SourceRegistry::new();
        for source in &self.sources {
            match source.kind {
                SourceKind::Rss => {
                    let mut rss = RssSource::new(
                        &source.realm,
                        &source.alias,
                        &source.title,
                        &source.url,
                    );
                    rss.active = source.active;
                    registry.register(Arc::new(rss));
                }
            }
        }
        registry
    }
}
