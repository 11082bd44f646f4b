//! Record and message types shared between the main thread and the worker.
//!
//! The message schema is the only contract the two sides share: the worker
//! exclusively owns the indexes, the main side exclusively owns the view
//! lookups.

/// Monotonically increasing per-tab counter identifying the most recent
/// dispatched query; stale responses are discarded by comparing against it.
pub type Generation = u64;

/// One flattened, indexable content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableRecord {
    /// Stable id, unique within the tab
    pub id: String,
    /// Pre-normalized searchable text: all language-bearing and phonetic
    /// fields, lower-cased and space-joined
    pub search_data: String,
    /// Key of the owning section (accordion group)
    pub section_key: String,
}

/// A scored match. Score semantics belong to the fuzzy engine (nucleo:
/// higher is better); callers should rely on ordering, not absolute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredId {
    pub id: String,
    pub score: u32,
}

/// Commands accepted by the index worker
#[derive(Debug)]
pub enum IndexCommand {
    /// Atomically (re)build the index for a tab. An empty record set is a
    /// no-op so a late init for unloaded content never wipes a valid index.
    Init {
        tab_id: String,
        records: Vec<SearchableRecord>,
    },
    /// Run a query against a tab's index; always answered, with an empty
    /// result list when the tab has no index or nothing matches.
    Search {
        tab_id: String,
        query: String,
        generation: Generation,
    },
    /// Drop a tab's index; no-op for unknown tabs
    Clear { tab_id: String },
    /// Exit the worker loop
    Shutdown,
}

/// Worker response for one `Search` command
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub tab_id: String,
    pub query: String,
    pub generation: Generation,
    /// Ordered best-first; empty when nothing matched
    pub results: Vec<ScoredId>,
}
