//! Live filtering of the overlay tree.
//!
//! Case-insensitive substring matching over card and sub-entry labels.
//! Matches are highlighted, matching entries are stably moved ahead of
//! non-matching ones, and sections without a single match are hidden.

use std::ops::Range;

use tracing::debug;

use crate::tree::{HighlightedLabel, OverlayTree};

/// Outcome of a filter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub query: String,
    pub matched_cards: usize,
    pub hidden_sections: usize,
}

/// Byte ranges of `raw` covered by sequential, non-overlapping,
/// leftmost-first case-insensitive occurrences of `needle`.
///
/// Matching runs on the lower-cased text; ranges are mapped back to whole
/// characters of `raw`, so labels whose case mapping changes length are
/// handled.
pub fn find_matches(raw: &str, needle: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }
    // folded char -> byte span of the source char it came from
    let mut folded = Vec::with_capacity(raw.len());
    let mut spans = Vec::with_capacity(raw.len());
    for (start, ch) in raw.char_indices() {
        let end = start + ch.len_utf8();
        for lower in ch.to_lowercase() {
            folded.push(lower);
            spans.push(start..end);
        }
    }

    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut i = 0;
    while i + needle.len() <= folded.len() {
        if folded[i..i + needle.len()] == needle[..] {
            let start = spans[i].start;
            let end = spans[i + needle.len() - 1].end;
            match ranges.last_mut() {
                Some(last) if last.end > start => last.end = last.end.max(end),
                _ => ranges.push(start..end),
            }
            i += needle.len();
        } else {
            i += 1;
        }
    }
    ranges
}

fn highlight(label: &mut HighlightedLabel, query: &str) -> bool {
    if query.is_empty() {
        label.set_highlights(&[]);
        return true;
    }
    let ranges = find_matches(label.raw(), query);
    let matched = !ranges.is_empty();
    label.set_highlights(&ranges);
    matched
}

/// Run one filter pass for `query` (trimmed first). Re-running the same
/// query is a no-op on the visible set and order.
pub fn apply_filter(tree: &mut OverlayTree, query: &str) -> FilterSummary {
    let query = query.trim();
    let has_query = !query.is_empty();
    let mut summary = FilterSummary {
        query: query.to_string(),
        ..FilterSummary::default()
    };

    for section in &mut tree.sections {
        for card in &mut section.cards {
            let title_match = highlight(&mut card.label, query);
            let mut sub_matches = 0;
            for sub in &mut card.subs {
                let matched = highlight(&mut sub.label, query);
                sub.dimmed = !matched;
                if matched {
                    sub_matches += 1;
                }
            }
            card.subs.sort_by_key(|sub| (sub.dimmed, sub.idx()));

            let card_match = title_match || sub_matches > 0;
            card.dimmed = has_query && !card_match;
            card.filter_expanded = has_query && sub_matches > 0 && !title_match;
        }
        section.cards.sort_by_key(|card| (card.dimmed, card.idx()));

        let matching = section.cards.iter().filter(|card| !card.dimmed).count();
        section.hidden = has_query && matching == 0;
        summary.matched_cards += matching;
        if section.hidden {
            summary.hidden_sections += 1;
        }
    }
    tree.query = query.to_string();

    debug!(
        query = %summary.query,
        matched = summary.matched_cards,
        hidden_sections = summary.hidden_sections,
        "filter applied"
    );
    summary
}
