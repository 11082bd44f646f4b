//! Search index service - the one object a session owns for tab search.
//!
//! Replaces the ad hoc per-tab globals of older revisions with an explicit
//! owner: the worker handle, the dispatcher, the shared generation
//! counters, and the projector all live here, constructed once per app
//! session and passed by reference to whoever needs search.

use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::content::TabContent;
use crate::dispatch::{DictionaryBackend, DispatchEvent, QueryDispatcher, SharedGenerations};
use crate::error::Result;
use crate::index::{flatten_tab, IndexWorker, SearchResponse};
use crate::project::{ExpandedState, ResultProjector, TabLookup, TabSurface};

pub struct SearchIndexService {
    worker: IndexWorker,
    responses: Receiver<SearchResponse>,
    dispatcher: QueryDispatcher,
    events: Receiver<DispatchEvent>,
    projector: ResultProjector,
    generations: SharedGenerations,
}

impl SearchIndexService {
    /// Build the service: spawns the index worker and the dispatcher.
    ///
    /// `dictionary` handles queries on the configured dictionary tab; pass
    /// None when the session has no dictionary tab.
    pub fn new(
        config: &SearchConfig,
        dictionary: Option<Box<dyn DictionaryBackend + 'static>>,
    ) -> Result<Self> {
        let generations: SharedGenerations = Arc::new(Mutex::new(HashMap::new()));

        let (worker, responses) = IndexWorker::spawn(config.max_results)?;
        let (dispatcher, events) = QueryDispatcher::start(
            worker.command_sender(),
            generations.clone(),
            config,
            dictionary,
        )?;
        let projector = ResultProjector::new(generations.clone());

        info!("Search index service started");
        Ok(SearchIndexService {
            worker,
            responses,
            dispatcher,
            events,
            projector,
            generations,
        })
    }

    /// (Re)index a tab from its content.
    ///
    /// Called when the tab's data first loads and again on every language
    /// or level switch. Content that flattens to nothing is a no-op so an
    /// early call for still-loading data never wipes a valid index.
    pub fn index_tab(&mut self, tab_id: &str, content: &TabContent) -> Result<()> {
        let records = flatten_tab(content);
        if records.is_empty() {
            debug!(tab_id = %tab_id, "No indexable content yet, keeping existing index");
            return Ok(());
        }
        self.projector
            .install_lookup(tab_id, TabLookup::from_records(&records));
        self.worker.init(tab_id, records)
    }

    /// Drop a tab's index and lookup, freeing their memory
    pub fn clear_tab(&mut self, tab_id: &str) -> Result<()> {
        self.projector.remove_lookup(tab_id);
        self.generations.lock().remove(tab_id);
        self.worker.clear(tab_id)
    }

    /// Record the tab the user is looking at; responses for any other tab
    /// are discarded on arrival.
    pub fn set_active_tab(&mut self, tab_id: &str) {
        self.projector.set_active_tab(tab_id);
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.projector.active_tab()
    }

    /// Feed one keystroke's worth of search-box input
    pub fn on_input(&self, tab_id: &str, text: &str) -> Result<()> {
        self.dispatcher.on_input(tab_id, text)
    }

    /// Drain pending dispatcher events and worker responses into the
    /// surface. Call from the UI thread's idle/frame hook. Returns the
    /// number of messages processed (including ones discarded as stale).
    pub fn pump(&mut self, surface: &mut dyn TabSurface, expanded: &dyn ExpandedState) -> usize {
        let mut processed = 0;

        while let Ok(event) = self.events.try_recv() {
            processed += 1;
            match event {
                DispatchEvent::ResetFilter { tab_id } => {
                    self.projector.reset(&tab_id, surface, expanded);
                }
            }
        }

        while let Ok(response) = self.responses.try_recv() {
            processed += 1;
            self.projector.apply(&response, surface);
        }

        processed
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
