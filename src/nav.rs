//! Spatial keyboard navigation over the overlay tree.
//!
//! Selection is geometric: every move re-measures the candidate cards through
//! a [`LayoutMeasure`] and buckets them into rows and columns, because the
//! layout can reflow between moves (filtering, resizing, view changes).
//! Nothing measured is cached across moves.
//!
//! States: idle (no active card), card-active, sub-active.

use tracing::debug;

use crate::constants::ROW_TOLERANCE;
use crate::links::SiteOrigin;
use crate::tree::{CardId, OverlayTree};
use crate::view_state::ViewMode;

/// Bounding box of a rendered card, in whatever units the measurer uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CardBounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// Geometry provider. Cards without bounds are treated as not laid out.
pub trait LayoutMeasure {
    fn bounds(&self, card: CardId) -> Option<CardBounds>;

    /// Vertical distance within which two cards share a row.
    fn row_tolerance(&self) -> f32 {
        ROW_TOLERANCE
    }
}

/// Rows (left to right) and columns (top to bottom) of the candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutModel {
    pub rows: Vec<Vec<CardId>>,
    pub columns: Vec<Vec<CardId>>,
}

struct Measured {
    id: CardId,
    bounds: CardBounds,
}

impl LayoutModel {
    pub fn measure(candidates: &[CardId], measure: &dyn LayoutMeasure) -> Self {
        let mut entries: Vec<Measured> = candidates
            .iter()
            .filter_map(|&id| measure.bounds(id).map(|bounds| Measured { id, bounds }))
            .collect();
        if entries.is_empty() {
            return Self::default();
        }
        entries.sort_by(|a, b| {
            a.bounds
                .top
                .total_cmp(&b.bounds.top)
                .then(a.bounds.left.total_cmp(&b.bounds.left))
        });

        let tolerance = measure.row_tolerance();
        let mut rows: Vec<Vec<&Measured>> = Vec::new();
        for entry in &entries {
            match rows.last_mut() {
                Some(row) if (entry.bounds.top - row[0].bounds.top).abs() <= tolerance => {
                    row.push(entry)
                }
                _ => rows.push(vec![entry]),
            }
        }
        for row in &mut rows {
            row.sort_by(|a, b| a.bounds.left.total_cmp(&b.bounds.left));
        }

        let centers: Vec<f32> = rows[0].iter().map(|e| e.bounds.center_x()).collect();
        let mut columns: Vec<Vec<&Measured>> = vec![Vec::new(); centers.len()];
        for entry in &entries {
            let cx = entry.bounds.center_x();
            let mut best = 0;
            let mut best_distance = f32::INFINITY;
            for (i, center) in centers.iter().enumerate() {
                let distance = (cx - center).abs();
                if distance < best_distance {
                    best_distance = distance;
                    best = i;
                }
            }
            columns[best].push(entry);
        }
        for column in &mut columns {
            column.sort_by(|a, b| a.bounds.top.total_cmp(&b.bounds.top));
        }

        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|e| e.id).collect())
                .collect(),
            columns: columns
                .into_iter()
                .map(|col| col.into_iter().map(|e| e.id).collect())
                .collect(),
        }
    }

    fn locate(lines: &[Vec<CardId>], id: CardId) -> Option<(usize, usize)> {
        lines
            .iter()
            .enumerate()
            .find_map(|(i, line)| line.iter().position(|&c| c == id).map(|j| (i, j)))
    }
}

/// What a keyboard activation currently targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Idle,
    Card(CardId),
    /// Card plus the position of the selected sub-entry among its
    /// candidate sub-entries.
    Sub(CardId, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationTarget {
    /// Same browsing context.
    Current,
    /// New context with no reference back to this one.
    Detached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub href: String,
    pub external: bool,
    pub target: ActivationTarget,
}

impl Activation {
    pub(crate) fn new(href: &str, external: bool) -> Self {
        Self {
            href: href.to_string(),
            external,
            target: if external {
                ActivationTarget::Detached
            } else {
                ActivationTarget::Current
            },
        }
    }

    /// Absolute URL of the target, resolved against the site.
    pub fn resolve(&self, site: &SiteOrigin) -> String {
        site.resolve(&self.href)
            .map(|url| url.to_string())
            .unwrap_or_else(|| self.href.clone())
    }
}

/// Per-session navigation state. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    active: Option<CardId>,
    sub_index: Option<usize>,
    keyboard_mode: bool,
    last_hover: Option<CardId>,
    query: String,
    view: ViewMode,
}

impl NavigationState {
    pub fn new(view: ViewMode) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn active(&self) -> Option<CardId> {
        self.active
    }

    pub fn sub_index(&self) -> Option<usize> {
        self.sub_index
    }

    pub fn keyboard_mode(&self) -> bool {
        self.keyboard_mode
    }

    pub fn last_hover(&self) -> Option<CardId> {
        self.last_hover
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Switching layouts drops keyboard mode and any sub-selection.
    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
        self.keyboard_mode = false;
        self.sub_index = None;
    }

    pub fn set_keyboard_mode(&mut self, on: bool) {
        self.keyboard_mode = on;
    }

    pub fn selection(&self) -> Selection {
        match (self.active, self.sub_index) {
            (None, _) => Selection::Idle,
            (Some(card), None) => Selection::Card(card),
            (Some(card), Some(sub)) => Selection::Sub(card, sub),
        }
    }

    /// Drop references into a tree that has since been rebuilt.
    pub fn sync_tree(&mut self, tree: &OverlayTree) {
        if self.active.is_some_and(|id| tree.card(id).is_none()) {
            self.active = None;
            self.sub_index = None;
        }
        if self.last_hover.is_some_and(|id| tree.card(id).is_none()) {
            self.last_hover = None;
        }
    }

    /// Clear all transient selection state (used when the overlay closes).
    pub fn reset(&mut self) {
        self.active = None;
        self.sub_index = None;
        self.keyboard_mode = false;
        self.last_hover = None;
    }

    fn set_active(&mut self, tree: &OverlayTree, card: Option<CardId>) {
        if self.active == card {
            return;
        }
        self.active = card.filter(|&id| tree.is_visible(id));
        self.sub_index = None;
    }

    fn pick_start(&self, tree: &OverlayTree) -> Option<CardId> {
        self.last_hover
            .filter(|&id| tree.is_visible(id))
            .or_else(|| self.active.filter(|&id| tree.is_visible(id)))
            .or_else(|| tree.candidate_cards().first().copied())
    }

    /// Make sure there is an active card to move from. Returns false when
    /// there is nothing to navigate.
    fn ensure_active(&mut self, tree: &OverlayTree) -> bool {
        let Some(start) = self.pick_start(tree) else {
            return false;
        };
        if self.active.is_none() {
            self.set_active(tree, Some(start));
        }
        self.active.is_some()
    }

    /// Step left (`delta < 0`) or right along rows, wrapping across rows.
    pub fn move_horizontal(&mut self, tree: &OverlayTree, measure: &dyn LayoutMeasure, delta: i32) {
        self.keyboard_mode = true;
        self.sub_index = None;
        if !self.ensure_active(tree) {
            return;
        }
        let model = LayoutModel::measure(&tree.candidate_cards(), measure);
        if model.rows.is_empty() {
            return;
        }
        let Some((row, col)) = self
            .active
            .and_then(|id| LayoutModel::locate(&model.rows, id))
        else {
            self.set_active(tree, Some(model.rows[0][0]));
            return;
        };

        let rows = &model.rows;
        let (next_row, next_col) = if delta > 0 {
            if col + 1 < rows[row].len() {
                (row, col + 1)
            } else {
                ((row + 1) % rows.len(), 0)
            }
        } else if col > 0 {
            (row, col - 1)
        } else {
            let prev = (row + rows.len() - 1) % rows.len();
            (prev, rows[prev].len() - 1)
        };
        self.set_active(tree, Some(rows[next_row][next_col]));
        debug!(row = next_row, col = next_col, "horizontal move");
    }

    /// Step along columns, wrapping into the next/previous column.
    fn move_vertical_global(&mut self, tree: &OverlayTree, measure: &dyn LayoutMeasure, dir: i32) {
        if !self.ensure_active(tree) {
            return;
        }
        let model = LayoutModel::measure(&tree.candidate_cards(), measure);
        let columns = &model.columns;
        if columns.is_empty() {
            return;
        }
        let Some((col, row)) = self
            .active
            .and_then(|id| LayoutModel::locate(columns, id))
        else {
            return;
        };
        let (next_col, next_row) = if dir > 0 {
            if row + 1 < columns[col].len() {
                (col, row + 1)
            } else {
                ((col + 1) % columns.len(), 0)
            }
        } else if row > 0 {
            (col, row - 1)
        } else {
            let prev = (col + columns.len() - 1) % columns.len();
            (prev, columns[prev].len().saturating_sub(1))
        };
        if let Some(&next) = columns[next_col].get(next_row) {
            self.set_active(tree, Some(next));
        }
    }

    fn select_last_sub(&mut self, tree: &OverlayTree) {
        if let Some(active) = self.active {
            let count = tree.candidate_subs(active).len();
            if count > 0 {
                self.sub_index = Some(count - 1);
            }
        }
    }

    /// Move up (`dir < 0`) or down through sub-entries and cards.
    pub fn move_vertical(&mut self, tree: &OverlayTree, measure: &dyn LayoutMeasure, dir: i32) {
        self.keyboard_mode = true;
        if !self.ensure_active(tree) {
            return;
        }
        let Some(active) = self.active else {
            return;
        };
        let subs = tree.candidate_subs(active).len();

        if subs == 0 {
            self.move_vertical_global(tree, measure, dir);
            if dir < 0 {
                // moving up lands on the bottom of the previous card's list
                self.select_last_sub(tree);
            }
            return;
        }

        match self.sub_index {
            None if dir > 0 => self.sub_index = Some(0),
            None => {
                self.move_vertical_global(tree, measure, -1);
                self.select_last_sub(tree);
            }
            Some(index) => {
                if dir > 0 {
                    if index + 1 < subs {
                        self.sub_index = Some(index + 1);
                    } else {
                        self.sub_index = None;
                        self.move_vertical_global(tree, measure, 1);
                    }
                } else if index > 0 {
                    self.sub_index = Some(index - 1);
                } else {
                    self.sub_index = None;
                }
            }
        }
        debug!(selection = ?self.selection(), "vertical move");
    }

    /// The link the current selection points at, if any.
    pub fn activate(&self, tree: &OverlayTree) -> Option<Activation> {
        let active = self.active?;
        let card = tree.card(active)?;
        if let Some(index) = self.sub_index {
            let positions = tree.candidate_subs(active);
            if let Some(sub) = positions.get(index).and_then(|&pos| card.subs().get(pos)) {
                return Some(Activation::new(sub.href(), sub.external()));
            }
        }
        Some(Activation::new(card.href(), card.external()))
    }

    /// Pointer moved onto `card`. A different card than the keyboard
    /// selection hands control back to hover highlighting.
    pub fn hover(&mut self, card: CardId) {
        self.last_hover = Some(card);
        if self.keyboard_mode && self.active.is_some_and(|active| active != card) {
            self.active = None;
            self.sub_index = None;
            self.keyboard_mode = false;
            debug!("keyboard selection released by pointer");
        }
    }

    /// Re-anchor the selection after a filter pass.
    pub fn after_filter(&mut self, tree: &OverlayTree) {
        self.sub_index = None;
        self.query = tree.query().to_string();
        let Some(first) = tree.candidate_cards().first().copied() else {
            self.set_active(tree, None);
            return;
        };
        if !self.active.is_some_and(|id| tree.is_candidate(id)) {
            self.set_active(tree, Some(first));
        }
    }
}
