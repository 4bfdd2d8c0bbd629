//! Adapter configuration.
//!
//! Chosen once when a [`DomAdapter`](crate::DomAdapter) is built and never
//! changed afterwards. Loadable from JSON:
//!
//! ```json
//! { "id_lookup": "index", "class_lookup": "scan" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading an [`AdapterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for [`AdapterConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How an anchor lookup finds its candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupStrategy {
    /// Walk the (scoped) tree on every lookup.
    #[default]
    Scan,
    /// Build a map once at adapter construction and consult it per lookup.
    Index,
}

/// Lookup strategies for a [`DomAdapter`](crate::DomAdapter).
///
/// Every combination returns the same nodes; only the cost differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Strategy for `#id` anchors.
    pub id_lookup: LookupStrategy,
    /// Strategy for `.class` anchors.
    pub class_lookup: LookupStrategy,
}

impl AdapterConfig {
    /// Both lookups backed by indexes.
    #[must_use]
    pub const fn indexed() -> Self {
        Self {
            id_lookup: LookupStrategy::Index,
            class_lookup: LookupStrategy::Index,
        }
    }

    /// Parse a configuration from a JSON string. Missing fields take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON or unknown strategy names.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its contents are invalid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
