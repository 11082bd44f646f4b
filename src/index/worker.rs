//! Search index worker - the actor thread that owns every tab index.
//!
//! Indexing a tab with hundreds of cards must never block input handling or
//! rendering, so all index state lives on one background thread and the two
//! sides talk only through channels. The worker processes commands in
//! arrival order; an index rebuild is a single map insert, so a search can
//! never observe a partially-built index.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use tracing::{debug, info, warn};

use crate::error::{Result, SearchError};

use super::search::NucleoCtx;
use super::types::{Generation, IndexCommand, ScoredId, SearchResponse, SearchableRecord};

/// One tab's fuzzy-match index: the flattened records, scored per query
struct TabIndex {
    records: Vec<SearchableRecord>,
}

impl TabIndex {
    fn build(records: Vec<SearchableRecord>) -> Self {
        TabIndex { records }
    }

    /// Score every record's `search_data` against the query, best first.
    /// Ties break on id so result order is deterministic.
    fn search(&self, query: &str, max_results: Option<usize>) -> Vec<ScoredId> {
        let mut nucleo = NucleoCtx::new(query);
        let mut matches: Vec<ScoredId> = self
            .records
            .iter()
            .filter_map(|record| {
                nucleo.score(&record.search_data).map(|score| ScoredId {
                    id: record.id.clone(),
                    score,
                })
            })
            .collect();

        matches.sort_by(|a, b| match b.score.cmp(&a.score) {
            std::cmp::Ordering::Equal => a.id.cmp(&b.id),
            other => other,
        });

        if let Some(cap) = max_results {
            matches.truncate(cap);
        }
        matches
    }
}

/// Handle to the worker thread.
///
/// Construction hands back the response receiver alongside the handle; the
/// owning service drains it into the projector. Dropping the handle sends
/// `Shutdown` and joins the thread.
pub struct IndexWorker {
    tx: Sender<IndexCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl IndexWorker {
    /// Spawn the worker thread.
    ///
    /// Returns the handle and the receiver on which `SearchResponse`s
    /// arrive.
    pub fn spawn(max_results: Option<usize>) -> Result<(Self, Receiver<SearchResponse>)> {
        let (cmd_tx, cmd_rx) = channel();
        let (res_tx, res_rx) = channel();

        let thread = thread::Builder::new()
            .name("search-index".to_string())
            .spawn(move || worker_loop(cmd_rx, res_tx, max_results))?;

        Ok((
            IndexWorker {
                tx: cmd_tx,
                thread: Some(thread),
            },
            res_rx,
        ))
    }

    /// (Re)build the index for a tab. Empty record sets are dropped here as
    /// well as in the worker, so callers get the no-op for free.
    pub fn init(&self, tab_id: &str, records: Vec<SearchableRecord>) -> Result<()> {
        self.send(IndexCommand::Init {
            tab_id: tab_id.to_string(),
            records,
        })
    }

    /// Query a tab's index; the response arrives on the receiver returned
    /// from [`IndexWorker::spawn`].
    pub fn search(&self, tab_id: &str, query: &str, generation: Generation) -> Result<()> {
        self.send(IndexCommand::Search {
            tab_id: tab_id.to_string(),
            query: query.to_string(),
            generation,
        })
    }

    /// Drop a tab's index, freeing its memory
    pub fn clear(&self, tab_id: &str) -> Result<()> {
        self.send(IndexCommand::Clear {
            tab_id: tab_id.to_string(),
        })
    }

    /// Command sender for components that dispatch searches themselves
    pub fn command_sender(&self) -> Sender<IndexCommand> {
        self.tx.clone()
    }

    fn send(&self, command: IndexCommand) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| SearchError::WorkerUnavailable)
    }
}

impl Drop for IndexWorker {
    fn drop(&mut self) {
        let _ = self.tx.send(IndexCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Worker loop: single-threaded owner of all tab indexes
fn worker_loop(
    rx: Receiver<IndexCommand>,
    tx: Sender<SearchResponse>,
    max_results: Option<usize>,
) {
    let mut indexes: HashMap<String, TabIndex> = HashMap::new();
    info!(worker = "search-index", "Index worker started");

    while let Ok(command) = rx.recv() {
        match command {
            IndexCommand::Init { tab_id, records } => {
                if records.is_empty() {
                    // A late init for not-yet-loaded content must not wipe
                    // a still-valid index
                    warn!(tab_id = %tab_id, "Ignoring empty index init");
                    continue;
                }
                debug!(tab_id = %tab_id, records = records.len(), "Index rebuilt");
                indexes.insert(tab_id, TabIndex::build(records));
            }
            IndexCommand::Search {
                tab_id,
                query,
                generation,
            } => {
                // Missing index reads as "no matches", never an error
                let results = indexes
                    .get(&tab_id)
                    .map(|index| index.search(&query, max_results))
                    .unwrap_or_default();

                let response = SearchResponse {
                    tab_id,
                    query,
                    generation,
                    results,
                };
                if tx.send(response).is_err() {
                    // Main side went away; nothing left to serve
                    break;
                }
            }
            IndexCommand::Clear { tab_id } => {
                if indexes.remove(&tab_id).is_some() {
                    debug!(tab_id = %tab_id, "Index cleared");
                }
            }
            IndexCommand::Shutdown => break,
        }
    }

    info!(worker = "search-index", "Index worker shutting down");
}
