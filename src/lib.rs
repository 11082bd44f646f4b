//! Kotoba Search - per-tab fuzzy search service for the Kotoba study app
//!
//! This library provides the incremental search layer that sits between a
//! tab's content and its rendered view:
//!
//! - `content` - the content-provider contract (sections, items, field table)
//! - `index` - the background index worker, tab indexer, and fuzzy scoring
//! - `dispatch` - keystroke debouncing and query routing
//! - `project` - mapping scored results back onto a view surface
//! - `service` - the per-session object tying the above together
//!
//! Rendering, persistence, and the external dictionary backend stay outside
//! this crate; they are reached through the traits in `project` and
//! `dispatch`.

pub mod config;
pub mod content;
pub mod dispatch;
pub mod error;
pub mod index;
pub mod logging;
pub mod project;
pub mod service;

pub use config::SearchConfig;
pub use content::{ContentItem, ContentKind, Section, TabContent};
pub use dispatch::{DictionaryBackend, DispatchEvent, QueryDispatcher};
pub use error::{Result, SearchError};
pub use index::{IndexCommand, IndexWorker, ScoredId, SearchResponse, SearchableRecord};
pub use project::{ExpandedState, ResultProjector, TabLookup, TabSurface};
pub use service::SearchIndexService;
