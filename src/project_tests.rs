use super::*;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::dispatch::next_generation;
use crate::index::ScoredId;

/// In-memory stand-in for the rendering layer
#[derive(Default)]
struct FakeSurface {
    rendered: HashSet<String>,
    materialized: Vec<String>,
    section_visible: HashMap<String, bool>,
    section_expanded: HashMap<String, bool>,
    item_visible: HashMap<String, bool>,
    highlighted: HashMap<String, String>,
    /// Ids with no DOM node (removed from data after indexing)
    missing: HashSet<String>,
    no_results: Option<String>,
    touched: bool,
}

impl TabSurface for FakeSurface {
    fn is_section_rendered(&self, section_key: &str) -> bool {
        self.rendered.contains(section_key)
    }

    fn materialize_section(&mut self, section_key: &str) {
        self.touched = true;
        self.rendered.insert(section_key.to_string());
        self.materialized.push(section_key.to_string());
    }

    fn set_section_visible(&mut self, section_key: &str, visible: bool) {
        self.touched = true;
        self.section_visible.insert(section_key.to_string(), visible);
    }

    fn set_section_expanded(&mut self, section_key: &str, expanded: bool) {
        self.touched = true;
        self.section_expanded
            .insert(section_key.to_string(), expanded);
    }

    fn set_item_visible(&mut self, id: &str, visible: bool) -> bool {
        self.touched = true;
        if self.missing.contains(id) {
            return false;
        }
        self.item_visible.insert(id.to_string(), visible);
        true
    }

    fn highlight_item(&mut self, id: &str, query: &str) -> bool {
        self.touched = true;
        if self.missing.contains(id) {
            return false;
        }
        self.highlighted.insert(id.to_string(), query.to_string());
        true
    }

    fn clear_highlights(&mut self) {
        self.touched = true;
        self.highlighted.clear();
    }

    fn show_no_results(&mut self, query: &str) {
        self.touched = true;
        self.no_results = Some(query.to_string());
    }

    fn clear_no_results(&mut self) {
        self.touched = true;
        self.no_results = None;
    }
}

#[derive(Default)]
struct FakeExpandedState {
    open: HashMap<String, HashSet<String>>,
}

impl ExpandedState for FakeExpandedState {
    fn expanded_sections(&self, tab_id: &str) -> HashSet<String> {
        self.open.get(tab_id).cloned().unwrap_or_default()
    }
}

fn record(id: &str, section_key: &str) -> SearchableRecord {
    SearchableRecord {
        id: id.to_string(),
        search_data: id.to_string(),
        section_key: section_key.to_string(),
    }
}

/// Two sections: "greetings" (3 items) and "numbers" (2 items)
fn vocab_lookup() -> TabLookup {
    TabLookup::from_records(&[
        record("hello", "greetings"),
        record("morning", "greetings"),
        record("evening", "greetings"),
        record("one", "numbers"),
        record("two", "numbers"),
    ])
}

fn new_generations() -> SharedGenerations {
    Arc::new(Mutex::new(HashMap::new()))
}

fn response(tab_id: &str, query: &str, generation: u64, ids: &[&str]) -> SearchResponse {
    SearchResponse {
        tab_id: tab_id.to_string(),
        query: query.to_string(),
        generation,
        results: ids
            .iter()
            .map(|id| ScoredId {
                id: id.to_string(),
                score: 100,
            })
            .collect(),
    }
}

fn vocab_projector(generations: &SharedGenerations) -> ResultProjector {
    let mut projector = ResultProjector::new(generations.clone());
    projector.install_lookup("vocab", vocab_lookup());
    projector.set_active_tab("vocab");
    projector
}

// ============================================
// TAB LOOKUP TESTS
// ============================================

#[test]
fn test_lookup_preserves_section_order() {
    let lookup = vocab_lookup();
    assert_eq!(lookup.sections(), &["greetings", "numbers"]);
    assert_eq!(lookup.entries().len(), 5);
    assert_eq!(lookup.section_of("two"), Some("numbers"));
    assert_eq!(lookup.section_of("nope"), None);
}

// ============================================
// PROJECTION TESTS
// ============================================

#[test]
fn test_match_in_one_section_hides_the_other() {
    let generations = new_generations();
    let projector = vocab_projector(&generations);
    next_generation(&generations, "vocab");

    let mut surface = FakeSurface::default();
    surface.rendered.insert("greetings".to_string());
    surface.rendered.insert("numbers".to_string());

    projector.apply(&response("vocab", "hello", 1, &["hello"]), &mut surface);

    assert_eq!(surface.section_visible.get("greetings"), Some(&true));
    assert_eq!(surface.section_expanded.get("greetings"), Some(&true));
    assert_eq!(surface.section_visible.get("numbers"), Some(&false));

    // Only the matched item stays visible within the matched section
    assert_eq!(surface.item_visible.get("hello"), Some(&true));
    assert_eq!(surface.item_visible.get("morning"), Some(&false));
    assert_eq!(surface.item_visible.get("evening"), Some(&false));
    // Items of hidden sections are untouched
    assert!(!surface.item_visible.contains_key("one"));

    assert_eq!(surface.highlighted.get("hello").map(String::as_str), Some("hello"));
    assert!(!surface.highlighted.contains_key("morning"));
    assert!(surface.no_results.is_none());
}

#[test]
fn test_zero_matches_shows_no_results_state() {
    let generations = new_generations();
    let projector = vocab_projector(&generations);
    next_generation(&generations, "vocab");

    let mut surface = FakeSurface::default();
    projector.apply(&response("vocab", "xyzxyz", 1, &[]), &mut surface);

    assert_eq!(surface.no_results.as_deref(), Some("xyzxyz"));
    assert_eq!(surface.section_visible.get("greetings"), Some(&false));
    assert_eq!(surface.section_visible.get("numbers"), Some(&false));
}

#[test]
fn test_matched_unrendered_section_is_materialized() {
    let generations = new_generations();
    let projector = vocab_projector(&generations);
    next_generation(&generations, "vocab");

    // "numbers" has never been drawn
    let mut surface = FakeSurface::default();
    surface.rendered.insert("greetings".to_string());

    projector.apply(&response("vocab", "one", 1, &["one"]), &mut surface);

    assert_eq!(surface.materialized, vec!["numbers".to_string()]);
    assert_eq!(surface.section_visible.get("numbers"), Some(&true));
}

#[test]
fn test_response_for_inactive_tab_never_touches_surface() {
    let generations = new_generations();
    let mut projector = ResultProjector::new(generations.clone());
    projector.install_lookup("vocab", vocab_lookup());
    projector.set_active_tab("kanji");
    next_generation(&generations, "vocab");

    let mut surface = FakeSurface::default();
    projector.apply(&response("vocab", "hello", 1, &["hello"]), &mut surface);

    assert!(!surface.touched, "late vocab response must not touch kanji DOM");
}

#[test]
fn test_stale_generation_is_discarded() {
    let generations = new_generations();
    let projector = vocab_projector(&generations);

    // Two searches went out; the newer one resolved first
    next_generation(&generations, "vocab"); // g1
    next_generation(&generations, "vocab"); // g2

    let mut surface = FakeSurface::default();
    projector.apply(&response("vocab", "one", 2, &["one"]), &mut surface);
    // The slow g1 response arrives after g2 was applied
    projector.apply(&response("vocab", "hello", 1, &["hello"]), &mut surface);

    // State still reflects g2 only
    assert_eq!(surface.item_visible.get("one"), Some(&true));
    assert!(!surface.highlighted.contains_key("hello"));
    assert_eq!(surface.highlighted.get("one").map(String::as_str), Some("one"));
    assert_eq!(surface.section_visible.get("greetings"), Some(&false));
}

#[test]
fn test_missing_dom_node_is_skipped() {
    let generations = new_generations();
    let projector = vocab_projector(&generations);
    next_generation(&generations, "vocab");

    let mut surface = FakeSurface::default();
    surface.missing.insert("hello".to_string());

    projector.apply(
        &response("vocab", "ello", 1, &["hello", "evening"]),
        &mut surface,
    );

    // The missing item is skipped; the rest still processes
    assert!(!surface.highlighted.contains_key("hello"));
    assert_eq!(surface.item_visible.get("evening"), Some(&true));
    assert_eq!(surface.highlighted.get("evening").map(String::as_str), Some("ello"));
}

#[test]
fn test_reset_restores_unfiltered_view() {
    let generations = new_generations();
    let projector = vocab_projector(&generations);
    next_generation(&generations, "vocab");

    let mut surface = FakeSurface::default();
    projector.apply(&response("vocab", "hello", 1, &["hello"]), &mut surface);

    // The user kept only "numbers" open before filtering
    let mut expanded = FakeExpandedState::default();
    expanded.open.insert(
        "vocab".to_string(),
        ["numbers".to_string()].into_iter().collect(),
    );

    projector.reset("vocab", &mut surface, &expanded);

    assert_eq!(surface.section_visible.get("greetings"), Some(&true));
    assert_eq!(surface.section_visible.get("numbers"), Some(&true));
    // Expansion comes from persisted state, not "all open"
    assert_eq!(surface.section_expanded.get("greetings"), Some(&false));
    assert_eq!(surface.section_expanded.get("numbers"), Some(&true));
    for id in ["hello", "morning", "evening", "one", "two"] {
        assert_eq!(surface.item_visible.get(id), Some(&true), "{id} visible");
    }
    assert!(surface.highlighted.is_empty());
    assert!(surface.no_results.is_none());
}

#[test]
fn test_reset_for_inactive_tab_is_ignored() {
    let generations = new_generations();
    let mut projector = vocab_projector(&generations);
    projector.set_active_tab("kanji");

    let mut surface = FakeSurface::default();
    projector.reset("vocab", &mut surface, &FakeExpandedState::default());
    assert!(!surface.touched);
}

#[test]
fn test_new_query_clears_previous_no_results() {
    let generations = new_generations();
    let projector = vocab_projector(&generations);
    next_generation(&generations, "vocab");

    let mut surface = FakeSurface::default();
    projector.apply(&response("vocab", "xyzxyz", 1, &[]), &mut surface);
    assert!(surface.no_results.is_some());

    next_generation(&generations, "vocab");
    projector.apply(&response("vocab", "hello", 2, &["hello"]), &mut surface);
    assert!(surface.no_results.is_none());
}
