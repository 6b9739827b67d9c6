//! Cell geometry of the overlay body.
//!
//! Coordinates are virtual: `x` is relative to the body's left edge and `y`
//! to the top of the (unscrolled) content. The same layout drives drawing,
//! pointer hit-testing and keyboard navigation measurement.

use ratatui::layout::Rect;

use crate::nav::{CardBounds, LayoutMeasure};
use crate::tree::{CardId, OverlayTree};
use crate::view_state::ViewMode;

pub const CARD_MIN_WIDTH: u16 = 22;
pub const EXPANDED_MIN_WIDTH: u16 = 30;
const GAP_X: u16 = 2;
const GAP_Y: u16 = 1;
/// Cards mode: border, label, meta, border.
const CARD_HEIGHT: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSlot {
    pub id: CardId,
    pub rect: Rect,
    /// Virtual row of each inline sub-entry, by display position. Empty in
    /// cards mode where lists float below the card.
    pub sub_rows: Vec<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSlot {
    pub index: usize,
    pub title_y: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: u16,
    pub card_width: u16,
    pub height: u16,
    pub sections: Vec<SectionSlot>,
    pub cards: Vec<CardSlot>,
}

impl GridLayout {
    pub fn compute(tree: &OverlayTree, view: ViewMode, width: u16) -> Self {
        if width == 0 {
            return Self::default();
        }
        let min_width = match view {
            ViewMode::Cards => CARD_MIN_WIDTH,
            ViewMode::Expanded => EXPANDED_MIN_WIDTH,
        };
        let columns = ((width + GAP_X) / (min_width + GAP_X)).max(1);
        let card_width = (width.saturating_sub(GAP_X * (columns - 1)) / columns).max(1);

        let mut layout = Self {
            columns,
            card_width,
            ..Self::default()
        };
        let mut y: u16 = 0;
        for (index, section) in tree.sections().iter().enumerate() {
            if section.hidden() {
                continue;
            }
            if !layout.sections.is_empty() {
                y = y.saturating_add(1);
            }
            layout.sections.push(SectionSlot { index, title_y: y });
            y = y.saturating_add(1);

            for row in section.cards().chunks(columns as usize) {
                let mut row_height = 0;
                for (col, card) in row.iter().enumerate() {
                    let height = match view {
                        ViewMode::Cards => CARD_HEIGHT,
                        ViewMode::Expanded if card.subs().is_empty() => CARD_HEIGHT,
                        ViewMode::Expanded => 3 + card.subs().len().min(u16::MAX as usize / 2) as u16,
                    };
                    row_height = row_height.max(height);
                    let x = col as u16 * (card_width + GAP_X);
                    let rect = Rect::new(x, y, card_width, height);
                    let sub_rows = match view {
                        ViewMode::Cards => Vec::new(),
                        ViewMode::Expanded => (0..card.subs().len())
                            .map(|pos| y.saturating_add(2 + pos as u16))
                            .collect(),
                    };
                    layout.cards.push(CardSlot {
                        id: tree.card_id(index, card.idx()),
                        rect,
                        sub_rows,
                    });
                }
                y = y.saturating_add(row_height + GAP_Y);
            }
        }
        layout.height = y;
        layout
    }

    pub fn slot(&self, id: CardId) -> Option<&CardSlot> {
        self.cards.iter().find(|slot| slot.id == id)
    }

    /// Virtual rows `(top, bottom)` that must be on screen to show the card
    /// or, when given, one of its inline sub-entries.
    pub fn focus_span(&self, id: CardId, sub: Option<usize>) -> Option<(u16, u16)> {
        let slot = self.slot(id)?;
        match sub.and_then(|pos| slot.sub_rows.get(pos)) {
            Some(&row) => Some((row, row + 1)),
            None => Some((slot.rect.y, slot.rect.bottom())),
        }
    }
}

impl LayoutMeasure for GridLayout {
    fn bounds(&self, card: CardId) -> Option<CardBounds> {
        self.slot(card).map(|slot| {
            CardBounds::new(
                slot.rect.x as f32,
                slot.rect.y as f32,
                slot.rect.width as f32,
                slot.rect.height as f32,
            )
        })
    }

    /// Cells are whole rows; cards share a row only when their tops match.
    fn row_tolerance(&self) -> f32 {
        0.5
    }
}

/// Smallest scroll offset change that brings `span` into a viewport of
/// `height` rows ("nearest" alignment).
pub fn scroll_to_nearest(scroll: u16, height: u16, span: (u16, u16)) -> u16 {
    let (top, bottom) = span;
    if top < scroll {
        top
    } else if bottom > scroll.saturating_add(height) {
        bottom.saturating_sub(height).min(top)
    } else {
        scroll
    }
}
