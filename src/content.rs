//! Content provider contract - the shape of tab data handed to the indexer.
//!
//! The host app loads each tab's content (vocabulary lists, kana charts,
//! grammar notes) from remote JSON and renders it as collapsible sections.
//! This module defines that shape plus the declarative table of which fields
//! on each content kind participate in search.

use serde::Deserialize;

/// Discriminates the content kinds that tabs can hold.
///
/// The kind decides which item fields go into `search_data` - see
/// [`search_fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Vocabulary entries (term + reading + localized meanings)
    #[default]
    Vocab,
    /// Kana chart cells (kana glyph + romaji)
    Kana,
    /// Grammar notes (pattern + reading + explanation)
    Grammar,
    /// Example phrases
    Phrase,
}

/// One item within a section - a flashcard, chart cell, or note.
///
/// All text fields are optional; the content files are hand-curated and
/// sparse. `is_placeholder` marks decorative empty grid cells (kana charts
/// pad their grids) which must never be indexed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentItem {
    /// Explicit stable id, when the content file assigns one
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub kind: ContentKind,
    /// Native-script term (kanji/kana)
    #[serde(default)]
    pub term: Option<String>,
    /// Kana reading
    #[serde(default)]
    pub reading: Option<String>,
    /// Romanized reading, for cross-script matching
    #[serde(default)]
    pub romaji: Option<String>,
    /// Primary localized meaning
    #[serde(default)]
    pub meaning: Option<String>,
    /// Secondary localization of the meaning
    #[serde(default, rename = "meaningAlt")]
    pub meaning_alt: Option<String>,
    /// Free-form usage notes (grammar tab)
    #[serde(default)]
    pub notes: Option<String>,
    /// Decorative grid filler - excluded from indexing
    #[serde(default, rename = "isPlaceholder")]
    pub is_placeholder: bool,
}

/// A named, collapsible group of items within a tab
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Section {
    /// Section key, unique within the tab (accordion group id)
    pub key: String,
    /// Localized section title, display-only
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

/// A full tab's content: ordered sections of items
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TabContent {
    pub sections: Vec<Section>,
}

/// Accessor into one searchable field of an item
pub type FieldAccessor = fn(&ContentItem) -> Option<&str>;

fn term(item: &ContentItem) -> Option<&str> {
    item.term.as_deref()
}
fn reading(item: &ContentItem) -> Option<&str> {
    item.reading.as_deref()
}
fn romaji(item: &ContentItem) -> Option<&str> {
    item.romaji.as_deref()
}
fn meaning(item: &ContentItem) -> Option<&str> {
    item.meaning.as_deref()
}
fn meaning_alt(item: &ContentItem) -> Option<&str> {
    item.meaning_alt.as_deref()
}
fn notes(item: &ContentItem) -> Option<&str> {
    item.notes.as_deref()
}

/// Ordered searchable fields per content kind.
///
/// Indexing is one generic fold over this table; adding a field to search
/// means adding it here, not adding another property check to the indexer.
pub fn search_fields(kind: ContentKind) -> &'static [FieldAccessor] {
    match kind {
        ContentKind::Vocab => &[term, reading, romaji, meaning, meaning_alt],
        ContentKind::Kana => &[term, romaji],
        ContentKind::Grammar => &[term, reading, meaning, meaning_alt, notes],
        ContentKind::Phrase => &[term, reading, romaji, meaning, meaning_alt],
    }
}
