//! Result projector - applies scored results to the visible tab.
//!
//! The projector owns the main-thread side of search state: the per-tab
//! id -> section lookups and the staleness guard. The view itself is
//! reached through the [`TabSurface`] trait so the rendering layer stays
//! outside this crate; persisted accordion state comes in through
//! [`ExpandedState`].

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::dispatch::{current_generation, SharedGenerations};
use crate::index::{SearchResponse, SearchableRecord};

/// Rendering-layer collaborator: one tab's visible surface.
///
/// Item-level calls return whether a node existed for the id; missing nodes
/// (item removed from data after indexing) are skipped silently by the
/// projector.
pub trait TabSurface {
    /// Has this section's content been materialized yet?
    fn is_section_rendered(&self, section_key: &str) -> bool;
    /// Build the section's content now (lazy materialization trigger)
    fn materialize_section(&mut self, section_key: &str);
    fn set_section_visible(&mut self, section_key: &str, visible: bool);
    fn set_section_expanded(&mut self, section_key: &str, expanded: bool);
    /// Show or hide one item. Returns false when no node exists for the id.
    fn set_item_visible(&mut self, id: &str, visible: bool) -> bool;
    /// Apply inline highlighting of the query's matched text within the
    /// item. Returns false when no node exists for the id.
    fn highlight_item(&mut self, id: &str, query: &str) -> bool;
    /// Remove all inline highlight markup, restoring original item content
    fn clear_highlights(&mut self);
    /// Show the "no results for <query>" indicator
    fn show_no_results(&mut self, query: &str);
    /// Hide the no-results indicator
    fn clear_no_results(&mut self);
}

/// Persisted-UI-state collaborator: which sections the user keeps open
pub trait ExpandedState {
    fn expanded_sections(&self, tab_id: &str) -> HashSet<String>;
}

/// Main-thread map from record ids to their sections, in display order.
/// Rebuilt from the flattened records every time a tab is (re)indexed.
#[derive(Debug, Clone, Default)]
pub struct TabLookup {
    sections: Vec<String>,
    entries: Vec<(String, String)>,
    section_of: HashMap<String, String>,
}

impl TabLookup {
    pub fn from_records(records: &[SearchableRecord]) -> Self {
        let mut lookup = TabLookup::default();
        for record in records {
            if !lookup.section_of.contains_key(&record.id) {
                lookup
                    .entries
                    .push((record.id.clone(), record.section_key.clone()));
                lookup
                    .section_of
                    .insert(record.id.clone(), record.section_key.clone());
            }
            if lookup.sections.last() != Some(&record.section_key)
                && !lookup.sections.contains(&record.section_key)
            {
                lookup.sections.push(record.section_key.clone());
            }
        }
        lookup
    }

    /// Section keys in first-appearance order
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// (id, section_key) pairs in record order
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn section_of(&self, id: &str) -> Option<&str> {
        self.section_of.get(id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Applies worker responses to the active tab, discarding anything stale.
pub struct ResultProjector {
    generations: SharedGenerations,
    lookups: HashMap<String, TabLookup>,
    active_tab: Option<String>,
}

impl ResultProjector {
    pub fn new(generations: SharedGenerations) -> Self {
        ResultProjector {
            generations,
            lookups: HashMap::new(),
            active_tab: None,
        }
    }

    /// Replace the id lookup for a tab (called on every reindex)
    pub fn install_lookup(&mut self, tab_id: &str, lookup: TabLookup) {
        self.lookups.insert(tab_id.to_string(), lookup);
    }

    /// Forget a tab entirely (index cleared)
    pub fn remove_lookup(&mut self, tab_id: &str) {
        self.lookups.remove(tab_id);
    }

    pub fn set_active_tab(&mut self, tab_id: &str) {
        self.active_tab = Some(tab_id.to_string());
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.active_tab.as_deref()
    }

    /// Apply one worker response to the surface.
    ///
    /// Responses for an inactive tab or a superseded generation are
    /// discarded silently; a slow early response can never overwrite the
    /// state established by a faster later one.
    pub fn apply(&self, response: &SearchResponse, surface: &mut dyn TabSurface) {
        if self.active_tab.as_deref() != Some(response.tab_id.as_str()) {
            trace!(tab_id = %response.tab_id, "Dropping response for inactive tab");
            return;
        }
        let latest = current_generation(&self.generations, &response.tab_id);
        if response.generation < latest {
            trace!(
                tab_id = %response.tab_id,
                generation = response.generation,
                latest,
                "Dropping stale response"
            );
            return;
        }
        let Some(lookup) = self.lookups.get(&response.tab_id) else {
            return;
        };

        surface.clear_no_results();
        surface.clear_highlights();

        if response.results.is_empty() {
            for section in lookup.sections() {
                surface.set_section_visible(section, false);
            }
            surface.show_no_results(&response.query);
            debug!(tab_id = %response.tab_id, query = %response.query, "No results");
            return;
        }

        let matched: HashSet<&str> = response.results.iter().map(|r| r.id.as_str()).collect();
        let matched_sections: HashSet<&str> = matched
            .iter()
            .filter_map(|id| lookup.section_of(id))
            .collect();

        for section in lookup.sections() {
            if matched_sections.contains(section.as_str()) {
                // A section that matched but was never drawn must still be
                // shown
                if !surface.is_section_rendered(section) {
                    surface.materialize_section(section);
                }
                surface.set_section_visible(section, true);
                surface.set_section_expanded(section, true);
            } else {
                surface.set_section_visible(section, false);
            }
        }

        for (id, section) in lookup.entries() {
            if !matched_sections.contains(section.as_str()) {
                // Whole section is hidden; no per-item work
                continue;
            }
            let visible = matched.contains(id.as_str());
            if !surface.set_item_visible(id, visible) {
                continue;
            }
            if visible {
                surface.highlight_item(id, &response.query);
            }
        }

        debug!(
            tab_id = %response.tab_id,
            query = %response.query,
            matches = response.results.len(),
            "Applied search results"
        );
    }

    /// Restore the unfiltered view for a tab: every section and item
    /// visible, expansion back to the persisted per-tab state, highlights
    /// removed.
    pub fn reset(&self, tab_id: &str, surface: &mut dyn TabSurface, expanded: &dyn ExpandedState) {
        if self.active_tab.as_deref() != Some(tab_id) {
            return;
        }
        let Some(lookup) = self.lookups.get(tab_id) else {
            return;
        };

        surface.clear_no_results();
        surface.clear_highlights();

        let open = expanded.expanded_sections(tab_id);
        for section in lookup.sections() {
            surface.set_section_visible(section, true);
            surface.set_section_expanded(section, open.contains(section));
        }
        for (id, _) in lookup.entries() {
            surface.set_item_visible(id, true);
        }

        debug!(tab_id = %tab_id, "Restored unfiltered view");
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod project_tests;
