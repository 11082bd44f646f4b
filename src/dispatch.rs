//! Query dispatcher - turns raw keystrokes into at most one in-flight
//! search per tab.
//!
//! Keystrokes are debounced on a background thread (trailing edge, latest
//! event wins). A settled query is normalized, then either dropped (empty
//! query resets the filter locally, no worker call), routed to the external
//! dictionary backend (dictionary tab only), or dispatched to the index
//! worker tagged with a fresh generation token.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::index::{Generation, IndexCommand};

/// Per-tab generation counters, shared between the dispatcher (writer) and
/// the result projector (reader).
pub type SharedGenerations = Arc<Mutex<HashMap<String, Generation>>>;

/// Bump and return the generation for a tab. Called for every settled
/// query, including empty ones, so clearing the input also invalidates any
/// search still in flight.
pub fn next_generation(generations: &SharedGenerations, tab_id: &str) -> Generation {
    let mut map = generations.lock();
    let counter = map.entry(tab_id.to_string()).or_insert(0);
    *counter += 1;
    *counter
}

/// Latest generation issued for a tab (0 when none ever was)
pub fn current_generation(generations: &SharedGenerations, tab_id: &str) -> Generation {
    generations.lock().get(tab_id).copied().unwrap_or(0)
}

/// External, network-backed dictionary search path. Queries on the
/// dictionary tab go here instead of the local index worker.
pub trait DictionaryBackend: Send {
    fn lookup(&self, query: &str);
}

/// Events the dispatcher emits back to the main side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// The user cleared the query; the projector should restore the
    /// unfiltered view for this tab.
    ResetFilter { tab_id: String },
}

/// One raw keystroke, tagged with the tab it was typed into
struct InputEvent {
    tab_id: String,
    text: String,
}

/// Debouncing keystroke router.
///
/// `on_input` returns immediately; the debounce window runs on a background
/// thread. Dropping the dispatcher closes the input channel and joins the
/// thread.
pub struct QueryDispatcher {
    input_tx: Option<Sender<InputEvent>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl QueryDispatcher {
    /// Start the dispatcher thread.
    ///
    /// `worker_tx` is the index worker's command channel; `generations` is
    /// the shared per-tab counter map also read by the projector.
    pub fn start(
        worker_tx: Sender<IndexCommand>,
        generations: SharedGenerations,
        config: &SearchConfig,
        dictionary: Option<Box<dyn DictionaryBackend + 'static>>,
    ) -> Result<(Self, Receiver<DispatchEvent>)> {
        let (input_tx, input_rx) = channel();
        let (event_tx, event_rx) = channel();

        let window = Duration::from_millis(config.debounce_ms);
        let dictionary_tab = config.dictionary_tab_id.clone();

        let thread = thread::Builder::new()
            .name("query-dispatch".to_string())
            .spawn(move || {
                dispatch_loop(
                    input_rx,
                    event_tx,
                    worker_tx,
                    generations,
                    window,
                    dictionary_tab,
                    dictionary,
                );
            })?;

        Ok((
            QueryDispatcher {
                input_tx: Some(input_tx),
                thread: Some(thread),
            },
            event_rx,
        ))
    }

    /// Feed one keystroke's worth of input for a tab
    pub fn on_input(&self, tab_id: &str, text: &str) -> Result<()> {
        let tx = self
            .input_tx
            .as_ref()
            .ok_or(SearchError::DispatcherUnavailable)?;
        tx.send(InputEvent {
            tab_id: tab_id.to_string(),
            text: text.to_string(),
        })
        .map_err(|_| SearchError::DispatcherUnavailable)
    }
}

impl Drop for QueryDispatcher {
    fn drop(&mut self) {
        // Closing the input channel ends the dispatch loop
        self.input_tx.take();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Debounce loop: wait for input, then keep restarting the window while
/// more keystrokes arrive; only the latest survives.
fn dispatch_loop(
    input_rx: Receiver<InputEvent>,
    event_tx: Sender<DispatchEvent>,
    worker_tx: Sender<IndexCommand>,
    generations: SharedGenerations,
    window: Duration,
    dictionary_tab: Option<String>,
    dictionary: Option<Box<dyn DictionaryBackend>>,
) {
    info!(
        debounce_ms = window.as_millis() as u64,
        "Query dispatcher started"
    );

    loop {
        let mut pending = match input_rx.recv() {
            Ok(event) => event,
            Err(_) => break,
        };

        loop {
            match input_rx.recv_timeout(window) {
                // Newer keystroke cancels the pending one and restarts the window
                Ok(event) => pending = event,
                Err(RecvTimeoutError::Timeout) => {
                    settle(
                        pending,
                        &event_tx,
                        &worker_tx,
                        &generations,
                        dictionary_tab.as_deref(),
                        dictionary.as_deref(),
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Query dispatcher shutting down");
                    return;
                }
            }
        }
    }

    info!("Query dispatcher shutting down");
}

/// Handle one settled (debounced) input value
fn settle(
    event: InputEvent,
    event_tx: &Sender<DispatchEvent>,
    worker_tx: &Sender<IndexCommand>,
    generations: &SharedGenerations,
    dictionary_tab: Option<&str>,
    dictionary: Option<&dyn DictionaryBackend>,
) {
    let query = event.text.trim().to_lowercase();

    if query.is_empty() {
        // Invalidate any in-flight search, then tell the main side to
        // restore the unfiltered view
        next_generation(generations, &event.tab_id);
        debug!(tab_id = %event.tab_id, "Empty query, resetting filter");
        let _ = event_tx.send(DispatchEvent::ResetFilter {
            tab_id: event.tab_id,
        });
        return;
    }

    if dictionary_tab == Some(event.tab_id.as_str()) {
        // Different data source entirely; the local index never sees this
        match dictionary {
            Some(backend) => {
                debug!(query = %query, "Routing query to dictionary backend");
                backend.lookup(&query);
            }
            None => warn!("Dictionary tab active but no backend configured"),
        }
        return;
    }

    let generation = next_generation(generations, &event.tab_id);
    debug!(tab_id = %event.tab_id, query = %query, generation, "Dispatching search");
    if worker_tx
        .send(IndexCommand::Search {
            tab_id: event.tab_id,
            query,
            generation,
        })
        .is_err()
    {
        warn!("Index worker unavailable, dropping query");
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod dispatch_tests;
