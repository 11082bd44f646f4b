//! Tab indexer - flattens a tab's nested sections into searchable records.
//!
//! Called when a tab's backing data first loads and again on every language
//! or level switch; each call is a full rebuild, never a patch.

use tracing::debug;

use crate::content::{search_fields, ContentItem, TabContent};

use super::types::SearchableRecord;

/// Flatten a tab's content into the records consumed by the index worker.
///
/// Placeholder items are skipped. `search_data` is the item's searchable
/// fields (per the content-kind field table), lower-cased and joined with
/// single spaces. Ids are the item's own id when present, otherwise derived
/// from the section key, a phonetic discriminator, and the item's position,
/// so they stay unique even when two items share identical visible text.
pub fn flatten_tab(content: &TabContent) -> Vec<SearchableRecord> {
    let mut records = Vec::new();

    for section in &content.sections {
        for (position, item) in section.items.iter().enumerate() {
            if item.is_placeholder {
                continue;
            }

            let search_data = build_search_data(item);
            if search_data.is_empty() {
                // Nothing searchable on this item
                continue;
            }

            records.push(SearchableRecord {
                id: derive_record_id(item, &section.key, position),
                search_data,
                section_key: section.key.clone(),
            });
        }
    }

    debug!(
        sections = content.sections.len(),
        records = records.len(),
        "Flattened tab content"
    );
    records
}

/// Fold the content-kind field table into one normalized search string
fn build_search_data(item: &ContentItem) -> String {
    let mut parts = Vec::new();
    for accessor in search_fields(item.kind) {
        if let Some(text) = accessor(item) {
            let text = text.trim();
            if !text.is_empty() {
                parts.push(text.to_lowercase());
            }
        }
    }
    parts.join(" ")
}

/// Stable id for a record: the item's explicit id, else
/// `<section>-<discriminator>-<position>`.
pub fn derive_record_id(item: &ContentItem, section_key: &str, position: usize) -> String {
    if let Some(id) = item.id.as_deref() {
        if !id.is_empty() {
            return id.to_string();
        }
    }

    // Phonetic fields make the best human-readable discriminator
    let discriminator = item
        .romaji
        .as_deref()
        .or(item.reading.as_deref())
        .or(item.term.as_deref())
        .unwrap_or("item");

    format!("{}-{}-{}", section_key, slug(discriminator), position)
}

/// Lowercase alphanumeric slug; runs of other characters collapse to one '-'
fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    out
}
