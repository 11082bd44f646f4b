//! Index module - per-tab fuzzy-match indexes
//!
//! This module provides:
//! - Flattening tab content into searchable records
//! - The background worker that owns one index per tab
//! - Fuzzy scoring and highlight-index helpers built on nucleo
//!
//! # Module Structure
//!
//! - `types` - Records, scored results, and the worker message schema
//! - `indexer` - Flattening `TabContent` into `SearchableRecord`s
//! - `search` - Nucleo scoring context and ASCII case-folding helpers
//! - `worker` - The index-owning actor thread

mod indexer;
mod search;
mod types;
mod worker;

pub use indexer::{derive_record_id, flatten_tab};
pub use search::{
    contains_ignore_ascii_case, find_ignore_ascii_case, match_indices, NucleoCtx,
};
pub use types::{Generation, IndexCommand, ScoredId, SearchResponse, SearchableRecord};
pub use worker::IndexWorker;

#[cfg(test)]
#[path = "../index_tests.rs"]
mod index_tests;
