//! The quick menu overlay: header chrome, sectioned card grid, sub-lists,
//! help panel and pointer hit-testing.
//!
//! Wraps a [`QuickMenu`] controller. Every frame re-derives the grid from the
//! current tree, so filtering and view changes never leave stale geometry
//! behind; keyboard moves measure a fresh layout the same way.

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Widget};

use crate::components::grid::{CardSlot, GridLayout, scroll_to_nearest};
use crate::components::help_overlay::HelpOverlay;
use crate::components::{Component, ComponentContext};
use crate::keybindings::{Action, KeyDispatch};
use crate::menu::{MenuEvent, QuickMenu};
use crate::model::Icon;
use crate::nav::{Activation, Selection};
use crate::presentation::CardPresentation;
use crate::theme;
use crate::tree::{Card, CardId, HighlightedLabel};
use crate::ui::{UiFrame, ellipsize, safe_set_string};
use crate::view_state::ViewMode;

const MAX_PANEL_WIDTH: u16 = 124;
const HEADER_ROWS: u16 = 3;
const EXTERNAL_MARKER: &str = " ↗";
/// Body width assumed for keyboard moves before the first frame is drawn.
const FALLBACK_BODY_WIDTH: u16 = 80;

/// What sits under a screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Card(CardId),
    Sub(CardId, usize),
    Search,
    View(ViewMode),
    Help,
    Close,
    Panel,
    Backdrop,
}

#[derive(Debug)]
pub struct QuickMenuComponent {
    menu: QuickMenu,
    help: HelpOverlay,
    scroll: u16,
    viewport: Rect,
    layout: GridLayout,
    /// Regions from the last frame, bottom-most first.
    hits: Vec<(Rect, Hit)>,
    followed: Option<Selection>,
    activation: Option<Activation>,
}

impl QuickMenuComponent {
    pub fn new(menu: QuickMenu) -> Self {
        let help = HelpOverlay::new(menu.platform());
        Self {
            menu,
            help,
            scroll: 0,
            viewport: Rect::default(),
            layout: GridLayout::default(),
            hits: Vec::new(),
            followed: None,
            activation: None,
        }
    }

    pub fn menu(&self) -> &QuickMenu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut QuickMenu {
        &mut self.menu
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Body area of the last frame.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// The activation produced by the last handled event, if any.
    pub fn take_activation(&mut self) -> Option<Activation> {
        self.activation.take()
    }

    /// Topmost region under `pos` as of the last frame.
    pub fn hit_at(&self, pos: Position) -> Option<Hit> {
        self.hits
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(pos))
            .map(|&(_, hit)| hit)
    }

    /// Fresh geometry for the current tree at the current body width.
    pub fn measure(&self) -> GridLayout {
        let width = if self.viewport.width > 0 {
            self.viewport.width
        } else {
            FALLBACK_BODY_WIDTH
        };
        GridLayout::compute(self.menu.tree(), self.menu.view(), width)
    }

    fn record(&mut self, outcome: MenuEvent) -> bool {
        let handled = !outcome.is_ignored();
        match outcome {
            MenuEvent::Activated(activation) => self.activation = Some(activation),
            MenuEvent::Opened | MenuEvent::Closed => {
                self.scroll = 0;
                self.followed = None;
            }
            MenuEvent::Handled | MenuEvent::Ignored => {}
        }
        handled
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.layout.height.saturating_sub(self.viewport.height) as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max.max(0)) as u16;
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let layout = self.measure();
        let mut dispatch = KeyDispatch::new(key);
        let outcome = self.menu.handle_key(&mut dispatch, &layout);
        if self.record(outcome) {
            return true;
        }
        if !self.menu.visible() {
            return false;
        }
        if self.menu.help_visible() {
            return self
                .help
                .handle_event(&Event::Key(key), &ComponentContext::new(true));
        }
        let page = self.viewport.height.max(1) as i32;
        match self.menu.bindings().action_for_key(&key) {
            Some(Action::ScrollPageUp) => self.scroll_by(-page),
            Some(Action::ScrollPageDown) => self.scroll_by(page),
            _ => return false,
        }
        true
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        if !self.menu.visible() {
            return false;
        }
        let pos = Position::new(mouse.column, mouse.row);
        if self.menu.help_visible() {
            return match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) if !self.help.contains(pos) => {
                    self.menu.set_help_visible(false);
                    true
                }
                MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => self
                    .help
                    .handle_event(&Event::Mouse(*mouse), &ComponentContext::new(true)),
                _ => true,
            };
        }

        let hit = self.hit_at(pos);
        match mouse.kind {
            MouseEventKind::Moved => {
                if let Some(Hit::Card(id) | Hit::Sub(id, _)) = hit {
                    self.menu.hover(id);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => match hit {
                Some(Hit::Card(id)) => {
                    let outcome = self.menu.click(id, None);
                    self.record(outcome);
                }
                Some(Hit::Sub(id, sub)) => {
                    let outcome = self.menu.click(id, Some(sub));
                    self.record(outcome);
                }
                Some(Hit::Search) => self.menu.focus_search(),
                Some(Hit::View(view)) => {
                    if view != self.menu.view() {
                        self.menu.set_view(view);
                        self.followed = None;
                    }
                }
                Some(Hit::Help) => self.menu.set_help_visible(true),
                Some(Hit::Close) | Some(Hit::Backdrop) => {
                    let outcome = self.menu.hide();
                    self.record(outcome);
                }
                Some(Hit::Panel) => {}
                None => return false,
            },
            MouseEventKind::ScrollUp => self.scroll_by(-3),
            MouseEventKind::ScrollDown => self.scroll_by(3),
            _ => {}
        }
        hit.is_some()
    }

    fn render_header(&mut self, frame: &mut UiFrame<'_>, inner: Rect, ctx: &ComponentContext) {
        let header = self.menu.tree().header().clone();
        let panel_style = Style::default().bg(theme::panel_bg()).fg(theme::text());
        let buffer = frame.buffer_mut();

        safe_set_string(
            buffer,
            inner,
            inner.x,
            inner.y,
            header.title,
            panel_style.add_modifier(Modifier::BOLD),
        );

        // Buttons are laid out right to left.
        let view = self.menu.view();
        let buttons = [
            (format!(" {} ", header.close_label), Hit::Close, false),
            (format!(" {} ", header.help_label), Hit::Help, self.menu.help_visible()),
            (
                format!(" {} ", header.expanded_label),
                Hit::View(ViewMode::Expanded),
                view == ViewMode::Expanded,
            ),
            (
                format!(" {} ", header.cards_label),
                Hit::View(ViewMode::Cards),
                view == ViewMode::Cards,
            ),
        ];
        let mut right = inner.right();
        let title_end = inner.x.saturating_add(header.title.len() as u16 + 1);
        for (text, hit, active) in buttons {
            let width = text.chars().count() as u16;
            let gap = if matches!(hit, Hit::View(ViewMode::Cards)) { 0 } else { 1 };
            let x = right.saturating_sub(width);
            if x < title_end {
                break;
            }
            let style = if active {
                theme::button_active()
            } else {
                theme::button()
            };
            safe_set_string(buffer, inner, x, inner.y, &text, style);
            self.hits.push((Rect::new(x, inner.y, width, 1), hit));
            right = x.saturating_sub(gap);
        }

        if inner.height > 1 {
            let field = Rect::new(inner.x, inner.y + 1, inner.width, 1);
            let mut search = self.menu.search().clone();
            let field_ctx = ctx.with_focus(self.menu.search_focused() && !self.menu.help_visible());
            search.render(frame, field, &field_ctx);
            self.hits.push((field, Hit::Search));
        }
        if inner.height > 2 {
            let y = inner.y + 2;
            let rule = "─".repeat(inner.width as usize);
            let buffer = frame.buffer_mut();
            safe_set_string(buffer, inner, inner.x, y, &rule, panel_style.patch(theme::muted()));
            let tree = self.menu.tree();
            if tree.has_query() {
                let count = tree.candidate_cards().len();
                let summary = format!(" {count} {} ", if count == 1 { "match" } else { "matches" });
                let x = inner.right().saturating_sub(summary.chars().count() as u16 + 1);
                safe_set_string(buffer, inner, x, y, &summary, panel_style.patch(theme::muted()));
            }
        }
    }

    fn follow_selection(&mut self, layout: &GridLayout, viewport: Rect) {
        let selection = self.menu.selection();
        if !self.menu.nav().keyboard_mode() || self.followed == Some(selection) {
            self.followed = Some(selection);
            return;
        }
        self.followed = Some(selection);
        let (card, sub) = match selection {
            Selection::Idle => return,
            Selection::Card(card) => (card, None),
            Selection::Sub(card, index) => {
                let pos = self.menu.tree().candidate_subs(card).get(index).copied();
                (card, pos)
            }
        };
        if let Some(span) = layout.focus_span(card, sub) {
            self.scroll = scroll_to_nearest(self.scroll, viewport.height, span);
        }
    }

    fn render_body(&mut self, frame: &mut UiFrame<'_>, viewport: Rect, hovered: Option<CardId>) {
        let presentation = self.menu.presentation();
        let layout = GridLayout::compute(self.menu.tree(), presentation.view, viewport.width);
        self.follow_selection(&layout, viewport);
        self.scroll = self.scroll.min(layout.height.saturating_sub(viewport.height));

        let tree = self.menu.tree();
        if layout.cards.is_empty() {
            let message = if tree.has_query() {
                format!("No matches for \"{}\"", tree.query())
            } else {
                "Nothing to show".to_string()
            };
            let style = Style::default().bg(theme::panel_bg()).patch(theme::muted());
            safe_set_string(frame.buffer_mut(), viewport, viewport.x, viewport.y, &message, style);
            self.layout = layout;
            return;
        }

        let mut content = Buffer::empty(Rect::new(0, 0, viewport.width, layout.height.max(1)));
        content.set_style(content.area, Style::default().bg(theme::panel_bg()));
        for slot in &layout.sections {
            let title = tree.sections()[slot.index].title();
            content.set_string(0, slot.title_y, title, theme::section_title().bg(theme::panel_bg()));
        }
        for slot in &layout.cards {
            let (Some(card), Some(state)) = (tree.card(slot.id), presentation.card(slot.id)) else {
                continue;
            };
            draw_card(&mut content, slot, card, state, presentation.view);
        }
        frame.blit_window(&content, self.scroll, viewport);

        let mut hits = Vec::new();
        for slot in &layout.cards {
            let Some(rect) = to_screen(slot.rect, self.scroll, viewport) else {
                continue;
            };
            hits.push((rect, Hit::Card(slot.id)));
            for (pos, &row) in slot.sub_rows.iter().enumerate() {
                let line = Rect::new(slot.rect.x + 1, row, slot.rect.width.saturating_sub(2), 1);
                if let Some(rect) = to_screen(line, self.scroll, viewport) {
                    hits.push((rect, Hit::Sub(slot.id, pos)));
                }
            }
        }

        if presentation.view == ViewMode::Cards {
            for slot in &layout.cards {
                let (Some(card), Some(state)) = (tree.card(slot.id), presentation.card(slot.id))
                else {
                    continue;
                };
                let hovering = hovered == Some(slot.id) && !presentation.keyboard_mode;
                if card.subs().is_empty() || !(state.sub_open || hovering) {
                    continue;
                }
                draw_dropdown(frame, slot, card, state, self.scroll, viewport, &mut hits);
            }
        }
        self.hits.extend(hits);
        self.layout = layout;
    }
}

impl Component for QuickMenuComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let hovered = ctx
            .pointer()
            .and_then(|pos| self.hit_at(pos))
            .and_then(|hit| match hit {
                Hit::Card(id) | Hit::Sub(id, _) => Some(id),
                _ => None,
            });
        self.hits.clear();
        if !self.menu.visible() || area.width == 0 || area.height == 0 {
            self.viewport = Rect::default();
            self.help.reset();
            return;
        }

        let top = self.menu.pinned_toolbar_height().min(area.height);
        let region = Rect::new(area.x, area.y + top, area.width, area.height - top);
        frame.patch_style(region, Style::default().add_modifier(Modifier::DIM));
        self.hits.push((region, Hit::Backdrop));

        let panel = panel_rect(region);
        frame.render_widget(Clear, panel);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::panel_border()))
            .style(Style::default().bg(theme::panel_bg()).fg(theme::text()));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);
        self.hits.push((panel, Hit::Panel));

        self.render_header(frame, inner, ctx);
        let viewport = Rect::new(
            inner.x,
            inner.y.saturating_add(HEADER_ROWS),
            inner.width,
            inner.height.saturating_sub(HEADER_ROWS),
        );
        self.viewport = viewport;
        self.render_body(frame, viewport, hovered);

        if self.menu.help_visible() {
            self.help.render(frame, region, ctx);
        } else {
            self.help.reset();
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Paste(text) => {
                let outcome = self.menu.paste(text);
                self.record(outcome)
            }
            _ => false,
        }
    }
}

/// Panel box inside the region below the host toolbar.
pub fn panel_rect(region: Rect) -> Rect {
    let margin_x = if region.width > 60 { 2 } else { 0 };
    let margin_y = if region.height > 12 { 1 } else { 0 };
    let width = region
        .width
        .saturating_sub(margin_x * 2)
        .min(MAX_PANEL_WIDTH);
    let x = region.x + (region.width - width) / 2;
    Rect::new(
        x,
        region.y + margin_y,
        width,
        region.height.saturating_sub(margin_y * 2),
    )
}

/// Map a virtual body rect to the screen, clipped to the viewport.
fn to_screen(rect: Rect, scroll: u16, viewport: Rect) -> Option<Rect> {
    let top = rect.y as i32 - scroll as i32 + viewport.y as i32;
    let bottom = top + rect.height as i32;
    let clip_top = top.max(viewport.y as i32);
    let clip_bottom = bottom.min(viewport.bottom() as i32);
    if clip_bottom <= clip_top {
        return None;
    }
    let screen = Rect::new(
        viewport.x + rect.x,
        clip_top as u16,
        rect.width,
        (clip_bottom - clip_top) as u16,
    );
    let clipped = screen.intersection(viewport);
    (!clipped.is_empty()).then_some(clipped)
}

fn icon_symbol(icon: &Icon) -> &'static str {
    match icon {
        Icon::Glyph(token) => match token.trim_start_matches("dashicons-") {
            "dashboard" => "◷",
            "admin-post" => "✎",
            "admin-media" => "▣",
            "admin-page" => "▤",
            "admin-comments" | "testimonial" => "✉",
            "admin-appearance" => "◐",
            "admin-plugins" => "⌁",
            "admin-users" | "admin-users-alt" => "☺",
            "admin-tools" => "⚒",
            "admin-settings" => "⚙",
            "admin-site" | "admin-home" => "⌂",
            "plus" | "plus-alt" => "+",
            "update" => "⟳",
            "cart" => "$",
            _ => "◆",
        },
        Icon::Background(_) | Icon::Image(_) | Icon::Svg(_) => "▪",
        Icon::Generic => "•",
    }
}

fn label_spans(label: &HighlightedLabel, base: Style) -> Vec<Span<'static>> {
    label
        .segments()
        .iter()
        .map(|seg| {
            if seg.highlighted {
                Span::styled(seg.text.clone(), theme::match_highlight())
            } else {
                Span::styled(seg.text.clone(), base)
            }
        })
        .collect()
}

fn sub_line(card: &Card, pos: usize, state: &CardPresentation) -> Line<'static> {
    let Some(sub) = card.subs().get(pos) else {
        return Line::default();
    };
    let active = state.active_sub == Some(pos);
    let base = if active {
        theme::sub_active()
    } else if sub.dimmed() {
        theme::dimmed()
    } else {
        Style::default().fg(theme::text())
    };
    let mut spans = vec![Span::styled(if active { "› " } else { "  " }, base)];
    spans.extend(label_spans(sub.label(), base));
    if sub.external() {
        spans.push(Span::styled(EXTERNAL_MARKER, theme::external_marker()));
    }
    Line::from(spans)
}

fn draw_card(buf: &mut Buffer, slot: &CardSlot, card: &Card, state: &CardPresentation, view: ViewMode) {
    let rect = slot.rect;
    let bg = if state.active {
        theme::card_active_bg()
    } else {
        theme::card_bg()
    };
    let mut base = Style::default().bg(bg).fg(theme::text());
    if state.dimmed {
        base = base.patch(theme::dimmed());
    }
    let border = if state.active {
        Style::default().fg(theme::highlight())
    } else {
        Style::default().fg(theme::card_border())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(base);
    let inner = block.inner(rect);
    block.render(rect, buf);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let mut spans = vec![Span::styled(format!("{} ", icon_symbol(card.icon())), base)];
    spans.extend(label_spans(card.label(), base.add_modifier(Modifier::BOLD)));
    if card.external() {
        spans.push(Span::styled(EXTERNAL_MARKER, theme::external_marker().bg(bg)));
    }
    buf.set_line(inner.x, inner.y, &Line::from(spans), inner.width);

    if inner.height < 2 {
        return;
    }
    if view == ViewMode::Expanded && !card.subs().is_empty() {
        for (pos, &row) in slot.sub_rows.iter().enumerate() {
            if row >= inner.bottom() {
                break;
            }
            let line = sub_line(card, pos, state);
            buf.set_line(inner.x, row, &line, inner.width);
        }
    } else {
        let meta = ellipsize(card.meta(), inner.width as usize);
        buf.set_string(inner.x, inner.y + 1, meta, base.patch(theme::muted()));
    }
}

fn draw_dropdown(
    frame: &mut UiFrame<'_>,
    slot: &CardSlot,
    card: &Card,
    state: &CardPresentation,
    scroll: u16,
    viewport: Rect,
    hits: &mut Vec<(Rect, Hit)>,
) {
    let card_bottom = slot.rect.bottom() as i32 - scroll as i32 + viewport.y as i32;
    if card_bottom <= viewport.y as i32 || card_bottom >= viewport.bottom() as i32 {
        return;
    }
    let top = card_bottom as u16;
    let wanted = card.subs().len() as u16 + 1;
    let height = wanted.min(viewport.bottom() - top);
    let rect = Rect::new(viewport.x + slot.rect.x, top, slot.rect.width, height);
    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
        .border_style(Style::default().fg(theme::card_border()))
        .style(Style::default().bg(theme::card_bg()));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let buffer = frame.buffer_mut();
    for pos in 0..card.subs().len() {
        let y = inner.y + pos as u16;
        if y >= inner.bottom() {
            break;
        }
        let line = sub_line(card, pos, state);
        buffer.set_line(inner.x, y, &line, inner.width);
        hits.push((Rect::new(inner.x, y, inner.width, 1), Hit::Sub(slot.id, pos)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    use crate::config::HelmConfig;
    use crate::keybindings::{KeyBindings, Platform};
    use crate::model::{NavigationItem, Section, SectionKind, SubItem};
    use crate::view_state::ViewStore;

    fn component() -> QuickMenuComponent {
        let items = vec![
            NavigationItem::new(
                "menu-posts",
                "Posts",
                "edit.php",
                Icon::glyph("dashicons-admin-post"),
                vec![SubItem::new("All Posts", "edit.php"), SubItem::new("Tags", "edit-tags.php")],
            )
            .unwrap(),
            NavigationItem::new("x", "Docs", "https://wordpress.org/", Icon::Generic, vec![])
                .unwrap(),
        ];
        let menu = QuickMenu::from_sections(
            HelmConfig::default().freeze(),
            &[Section {
                kind: SectionKind::System,
                items,
            }],
            Vec::new(),
            Vec::new(),
            ViewStore::ephemeral(),
            KeyBindings::for_platform(Platform::Other),
        );
        QuickMenuComponent::new(menu)
    }

    fn draw(c: &mut QuickMenuComponent, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        c.render(&mut frame, area, &ComponentContext::default());
        buf
    }

    fn screen_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.y..area.bottom())
            .map(|y| {
                (area.x..area.right())
                    .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn hidden_overlay_draws_nothing() {
        let mut c = component();
        let buf = draw(&mut c, Rect::new(0, 0, 80, 24));
        assert!(screen_text(&buf).trim().is_empty());
        assert_eq!(c.hit_at(Position::new(10, 10)), None);
    }

    #[test]
    fn open_overlay_shows_header_sections_and_external_marker() {
        let mut c = component();
        c.menu_mut().show(Some(1));
        let buf = draw(&mut c, Rect::new(0, 0, 100, 30));
        let text = screen_text(&buf);
        assert!(text.contains("Quick Menu"));
        assert!(text.contains("Filter apps and actions..."));
        assert!(text.contains("System"));
        assert!(text.contains("✎ Posts"));
        assert!(text.contains("2 shortcuts"));
        assert!(text.contains("Docs ↗"));
        // nothing drawn over the toolbar row
        assert!(!text.lines().next().unwrap().contains("Quick Menu"));
    }

    #[test]
    fn clicking_a_card_activates_and_closes() {
        let mut c = component();
        c.menu_mut().show(Some(1));
        draw(&mut c, Rect::new(0, 0, 100, 30));
        let posts = c.menu().tree().card_id(0, 0);
        let rect = c
            .hits
            .iter()
            .find(|(_, hit)| *hit == Hit::Card(posts))
            .map(|(rect, _)| *rect)
            .unwrap();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x + 1,
            row: rect.y + 1,
            modifiers: KeyModifiers::NONE,
        };
        assert!(c.handle_event(&Event::Mouse(click), &ComponentContext::default()));
        assert_eq!(c.take_activation().unwrap().href, "edit.php");
        assert!(!c.menu().visible());
    }

    #[test]
    fn keyboard_sub_selection_opens_dropdown() {
        let mut c = component();
        c.menu_mut().show(Some(1));
        draw(&mut c, Rect::new(0, 0, 100, 30));
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::CONTROL);
        assert!(c.handle_event(&Event::Key(down), &ComponentContext::default()));
        let buf = draw(&mut c, Rect::new(0, 0, 100, 30));
        let text = screen_text(&buf);
        assert!(text.contains("› All Posts"));
        assert!(text.contains("  Tags"));
    }

    #[test]
    fn backdrop_click_closes() {
        let mut c = component();
        c.menu_mut().show(Some(1));
        draw(&mut c, Rect::new(0, 0, 100, 30));
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 29,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(c.hit_at(Position::new(0, 29)), Some(Hit::Backdrop));
        c.handle_event(&Event::Mouse(click), &ComponentContext::default());
        assert!(!c.menu().visible());
    }

    #[test]
    fn panel_fits_region() {
        let region = Rect::new(0, 2, 200, 40);
        let panel = panel_rect(region);
        assert_eq!(panel.width, MAX_PANEL_WIDTH);
        assert_eq!(panel.y, 3);
        assert_eq!(panel.x, (200 - MAX_PANEL_WIDTH) / 2);
        let small = panel_rect(Rect::new(0, 1, 30, 8));
        assert_eq!(small, Rect::new(0, 1, 30, 8));
    }
}
