//! The rendered overlay tree.
//!
//! Built once per activation cycle from the composed sections. Afterwards
//! only presentation attributes change: dim/hidden flags, highlight
//! segments, the order of cards within a section and of sub-entries within
//! a card. Cards and sub-entries are never added or removed.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::constants::{OVERLAY_TITLE, SEARCH_PLACEHOLDER};
use crate::links::SiteOrigin;
use crate::model::{Icon, NavigationItem, Section, SectionKind};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Weak handle to a card. Stale once the tree it came from is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId {
    generation: u64,
    section: usize,
    idx: usize,
}

impl CardId {
    pub fn section(&self) -> usize {
        self.section
    }

    /// Original (pre-filter) position within the section.
    pub fn idx(&self) -> usize {
        self.idx
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSegment {
    pub text: String,
    pub highlighted: bool,
}

/// A label plus the raw copy it is re-highlighted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedLabel {
    raw: String,
    segments: Vec<LabelSegment>,
}

impl HighlightedLabel {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = vec![LabelSegment {
            text: raw.clone(),
            highlighted: false,
        }];
        Self { raw, segments }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[LabelSegment] {
        &self.segments
    }

    pub fn is_highlighted(&self) -> bool {
        self.segments.iter().any(|s| s.highlighted)
    }

    /// Rebuild segments from byte ranges of the raw text. An empty range
    /// list restores the plain label.
    pub(crate) fn set_highlights(&mut self, ranges: &[std::ops::Range<usize>]) {
        let mut segments = Vec::with_capacity(ranges.len() * 2 + 1);
        let mut cursor = 0;
        for range in ranges {
            if range.start > cursor {
                segments.push(LabelSegment {
                    text: self.raw[cursor..range.start].to_string(),
                    highlighted: false,
                });
            }
            segments.push(LabelSegment {
                text: self.raw[range.clone()].to_string(),
                highlighted: true,
            });
            cursor = range.end;
        }
        if cursor < self.raw.len() || segments.is_empty() {
            segments.push(LabelSegment {
                text: self.raw[cursor..].to_string(),
                highlighted: false,
            });
        }
        self.segments = segments;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubEntry {
    idx: usize,
    href: String,
    external: bool,
    pub(crate) label: HighlightedLabel,
    pub(crate) dimmed: bool,
}

impl SubEntry {
    pub fn idx(&self) -> usize {
        self.idx
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn external(&self) -> bool {
        self.external
    }

    pub fn label(&self) -> &HighlightedLabel {
        &self.label
    }

    pub fn dimmed(&self) -> bool {
        self.dimmed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    idx: usize,
    item_id: String,
    href: String,
    external: bool,
    icon: Icon,
    meta: String,
    search_key: String,
    pub(crate) label: HighlightedLabel,
    pub(crate) dimmed: bool,
    /// Sub-list forced open because only sub-entries matched the query.
    pub(crate) filter_expanded: bool,
    pub(crate) subs: Vec<SubEntry>,
}

impl Card {
    fn build(idx: usize, item: &NavigationItem, site: &SiteOrigin) -> Self {
        let subs = item
            .subs()
            .iter()
            .enumerate()
            .map(|(sidx, sub)| SubEntry {
                idx: sidx,
                href: sub.href.clone(),
                external: site.is_external(&sub.href),
                label: HighlightedLabel::new(sub.label.as_str()),
                dimmed: false,
            })
            .collect();
        Self {
            idx,
            item_id: item.id().to_string(),
            href: item.href().to_string(),
            external: site.is_external(item.href()),
            icon: item.icon().clone(),
            meta: item.meta_text(),
            search_key: item.label().to_lowercase(),
            label: HighlightedLabel::new(item.label()),
            dimmed: false,
            filter_expanded: false,
            subs,
        }
    }

    pub fn idx(&self) -> usize {
        self.idx
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn external(&self) -> bool {
        self.external
    }

    pub fn icon(&self) -> &Icon {
        &self.icon
    }

    pub fn meta(&self) -> &str {
        &self.meta
    }

    /// Lower-cased label used as the sort/search key.
    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    pub fn label(&self) -> &HighlightedLabel {
        &self.label
    }

    pub fn dimmed(&self) -> bool {
        self.dimmed
    }

    pub fn filter_expanded(&self) -> bool {
        self.filter_expanded
    }

    /// Sub-entries in current display order.
    pub fn subs(&self) -> &[SubEntry] {
        &self.subs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionNode {
    kind: SectionKind,
    pub(crate) hidden: bool,
    pub(crate) cards: Vec<Card>,
}

impl SectionNode {
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Cards in current display order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: &'static str,
    pub placeholder: &'static str,
    pub cards_label: &'static str,
    pub expanded_label: &'static str,
    pub help_label: &'static str,
    pub close_label: &'static str,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            title: OVERLAY_TITLE,
            placeholder: SEARCH_PLACEHOLDER,
            cards_label: "Cards",
            expanded_label: "Expanded",
            help_label: "?",
            close_label: "Close",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayTree {
    generation: u64,
    header: Header,
    pub(crate) query: String,
    pub(crate) sections: Vec<SectionNode>,
}

impl OverlayTree {
    /// Render the composed sections. Empty sections are skipped.
    pub fn build(sections: &[Section], site: &SiteOrigin) -> Self {
        let sections = sections
            .iter()
            .filter(|section| !section.items.is_empty())
            .map(|section| SectionNode {
                kind: section.kind,
                hidden: false,
                cards: section
                    .items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| Card::build(idx, item, site))
                    .collect(),
            })
            .collect();
        Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            header: Header::default(),
            query: String::new(),
            sections,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn sections(&self) -> &[SectionNode] {
        &self.sections
    }

    /// The active (trimmed) filter text.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn card_id(&self, section: usize, idx: usize) -> CardId {
        CardId {
            generation: self.generation,
            section,
            idx,
        }
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        if id.generation != self.generation {
            return None;
        }
        self.sections
            .get(id.section)?
            .cards
            .iter()
            .find(|card| card.idx == id.idx)
    }

    /// Shown on screen: belongs to this tree and its section is not hidden.
    pub fn is_visible(&self, id: CardId) -> bool {
        self.card(id).is_some() && !self.sections[id.section].hidden
    }

    /// Eligible for keyboard selection under the current filter.
    pub fn is_candidate(&self, id: CardId) -> bool {
        self.is_visible(id) && self.card(id).is_some_and(|card| !self.has_query() || !card.dimmed)
    }

    /// Candidate cards in document order.
    pub fn candidate_cards(&self) -> Vec<CardId> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, section)| !section.hidden)
            .flat_map(|(s, section)| {
                section
                    .cards
                    .iter()
                    .filter(|card| !self.has_query() || !card.dimmed)
                    .map(move |card| (s, card.idx))
            })
            .map(|(section, idx)| self.card_id(section, idx))
            .collect()
    }

    /// Display positions of a card's selectable sub-entries.
    pub fn candidate_subs(&self, id: CardId) -> Vec<usize> {
        let Some(card) = self.card(id) else {
            return Vec::new();
        };
        card.subs
            .iter()
            .enumerate()
            .filter(|(_, sub)| !self.has_query() || !sub.dimmed)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// All cards in document order, including dimmed and hidden ones.
    pub fn all_cards(&self) -> impl Iterator<Item = (CardId, &Card)> {
        self.sections.iter().enumerate().flat_map(move |(s, section)| {
            section
                .cards
                .iter()
                .map(move |card| (self.card_id(s, card.idx), card))
        })
    }

    /// Plain-text listing of what the overlay shows, one line per card and
    /// sub-entry. Hidden sections and filtered-out entries are left out.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for section in self.sections.iter().filter(|section| !section.hidden) {
            out.push_str(section.title());
            out.push('\n');
            for card in &section.cards {
                if self.has_query() && card.dimmed {
                    continue;
                }
                let marker = if card.external { " ↗" } else { "" };
                out.push_str(&format!(
                    "  {}{marker}  [{}]  {}\n",
                    card.label.raw(),
                    card.href,
                    card.meta
                ));
                for sub in &card.subs {
                    if self.has_query() && sub.dimmed {
                        continue;
                    }
                    let marker = if sub.external { " ↗" } else { "" };
                    out.push_str(&format!("    - {}{marker}  [{}]\n", sub.label.raw(), sub.href));
                }
            }
        }
        out
    }
}
