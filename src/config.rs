use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Result, SearchError};

/// Default debounce window between a keystroke and the dispatched search
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Search service configuration.
///
/// Loaded from an optional JSON file; every field has a default so a missing
/// or partial file never blocks startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Debounce window in milliseconds before a settled query is dispatched
    #[serde(default = "default_debounce_ms", rename = "debounceMs")]
    pub debounce_ms: u64,
    /// Tab whose queries are routed to the external dictionary backend
    /// instead of the local index worker
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "dictionaryTabId"
    )]
    pub dictionary_tab_id: Option<String>,
    /// Cap on results returned per search; None means unbounded
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxResults")]
    pub max_results: Option<usize>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            dictionary_tab_id: None,
            max_results: None,
        }
    }
}

impl SearchConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file falls back to defaults (and logs at info); a present
    /// but malformed file is an error so typos don't silently vanish.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No search config file, using defaults");
                return Ok(SearchConfig::default());
            }
            Err(e) => {
                return Err(SearchError::ConfigRead {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        let config: SearchConfig = serde_json::from_str(&raw)?;
        if config.debounce_ms == 0 {
            warn!("debounceMs is 0; every keystroke will dispatch a search");
        }
        info!(
            debounce_ms = config.debounce_ms,
            dictionary_tab = config.dictionary_tab_id.as_deref().unwrap_or("<none>"),
            "Search config loaded"
        );
        Ok(config)
    }
}
