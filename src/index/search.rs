//! Fuzzy scoring context and ASCII case-folding helpers.
//!
//! Scoring uses nucleo for typo-tolerant matching; the helpers below avoid
//! per-call allocations on the hot path (one score per record per
//! keystroke) and compute highlight indices lazily for visible rows only.

use nucleo_matcher::pattern::Pattern;
use nucleo_matcher::{Matcher, Utf32Str};

/// Check if haystack contains needle using ASCII case-insensitive matching.
/// `needle_lower` must already be lowercase.
/// No allocation - O(n*m) worst case but typically much faster.
#[inline]
pub fn contains_ignore_ascii_case(haystack: &str, needle_lower: &str) -> bool {
    find_ignore_ascii_case(haystack, needle_lower).is_some()
}

/// Find the position of needle in haystack using ASCII case-insensitive
/// matching. `needle_lower` must already be lowercase.
/// Returns Some(byte position) if found, None otherwise.
#[inline]
pub fn find_ignore_ascii_case(haystack: &str, needle_lower: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle_lower.as_bytes();
    if n.is_empty() {
        return Some(0);
    }
    if n.len() > h.len() {
        return None;
    }
    'outer: for i in 0..=(h.len() - n.len()) {
        for j in 0..n.len() {
            if h[i + j].to_ascii_lowercase() != n[j] {
                continue 'outer;
            }
        }
        return Some(i);
    }
    None
}

/// Compute the character indices of `query_lower` matched in order against
/// `text`, for inline highlighting. Returns an empty Vec when the query is
/// not a fuzzy match.
///
/// Called by view surfaces only for visible rows, so match positions are
/// never computed during the scoring phase.
pub fn match_indices(text: &str, query: &str) -> Vec<usize> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return Vec::new();
    }

    // Prefer a contiguous substring run when one exists
    if let Some(pos) = find_ignore_ascii_case(text, &query_lower) {
        let start = text[..pos].chars().count();
        return (start..start + query_lower.chars().count()).collect();
    }

    // Fall back to in-order character matching
    let mut indices = Vec::new();
    let mut query_chars = query_lower.chars().peekable();
    for (idx, ch) in text.chars().enumerate() {
        if let Some(&q) = query_chars.peek() {
            if ch.to_lowercase().next() == Some(q) {
                indices.push(idx);
                query_chars.next();
            }
        }
    }

    if query_chars.peek().is_none() {
        indices
    } else {
        Vec::new()
    }
}

/// Context for nucleo fuzzy matching that reuses allocations across calls.
///
/// Built once per query, then used to score every record in a tab's index.
pub struct NucleoCtx {
    pattern: Pattern,
    matcher: Matcher,
    buf: Vec<char>,
}

impl NucleoCtx {
    /// Create a new NucleoCtx for the given query string.
    /// The query is parsed with case-insensitive matching and smart normalization.
    pub fn new(query: &str) -> Self {
        let pattern = Pattern::parse(
            query,
            nucleo_matcher::pattern::CaseMatching::Ignore,
            nucleo_matcher::pattern::Normalization::Smart,
        );
        Self {
            pattern,
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
            buf: Vec::with_capacity(64),
        }
    }

    /// Score a haystack string against this context's pattern.
    /// Returns Some(score) if matched, None otherwise.
    #[inline]
    pub fn score(&mut self, haystack: &str) -> Option<u32> {
        self.buf.clear();
        let utf32 = Utf32Str::new(haystack, &mut self.buf);
        self.pattern.score(utf32, &mut self.matcher)
    }
}
