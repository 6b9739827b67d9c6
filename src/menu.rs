//! The quick menu controller.
//!
//! Owns the overlay tree and every piece of per-session state around it:
//! visibility, the filter field, help panel, navigation cursor and the
//! persisted view mode. It has no terminal dependency; the host feeds it key
//! dispatches, pointer hits and toolbar measurements and renders from
//! [`QuickMenu::presentation`].

use std::sync::Arc;

use crossterm::event::KeyCode;
use tracing::{debug, info};

use crate::classify::{collect_toolbar, compose_sections};
use crate::components::search_input::{InputOutcome, SearchInput};
use crate::config::HelmConfig;
use crate::filter::{FilterSummary, apply_filter};
use crate::keybindings::{Action, KeyBindings, KeyDispatch, Platform};
use crate::model::{NavigationItem, Section};
use crate::nav::{Activation, LayoutMeasure, NavigationState, Selection};
use crate::presentation::{Presentation, project};
use crate::snapshot::ToolbarCapture;
use crate::source::ItemSource;
use crate::state::OverlayVisibility;
use crate::tree::{CardId, OverlayTree};
use crate::view_state::{ViewMode, ViewStore};

/// Result of feeding an input to the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    Ignored,
    Handled,
    Opened,
    Closed,
    /// A link was chosen; the overlay has already closed.
    Activated(Activation),
}

impl MenuEvent {
    pub fn is_ignored(&self) -> bool {
        matches!(self, MenuEvent::Ignored)
    }
}

#[derive(Debug)]
pub struct QuickMenu {
    config: Arc<HelmConfig>,
    tree: OverlayTree,
    nav: NavigationState,
    store: ViewStore,
    bindings: KeyBindings,
    visibility: OverlayVisibility,
    search: SearchInput,
    search_focused: bool,
    help_visible: bool,
    /// Latest host toolbar measurement, used when the shortcut opens the
    /// overlay.
    toolbar_measure: Option<u16>,
    toolbar_entries: Vec<NavigationItem>,
    hidden_toolbar_ids: Vec<String>,
}

impl QuickMenu {
    /// Classify both inputs and build the overlay.
    pub fn new(
        config: Arc<HelmConfig>,
        source: &dyn ItemSource,
        toolbar: &ToolbarCapture,
        store: ViewStore,
        bindings: KeyBindings,
    ) -> Self {
        let menu = source.collect(&config);
        let toolbar = collect_toolbar(toolbar, &config);
        let toolbar_entries = toolbar.system.clone();
        let hidden = toolbar.hidden_ids.clone();
        let sections = compose_sections(menu, toolbar, config.updates_count());
        Self::from_sections(config, &sections, toolbar_entries, hidden, store, bindings)
    }

    /// Build from already composed sections.
    pub fn from_sections(
        config: Arc<HelmConfig>,
        sections: &[Section],
        toolbar_entries: Vec<NavigationItem>,
        hidden_toolbar_ids: Vec<String>,
        store: ViewStore,
        bindings: KeyBindings,
    ) -> Self {
        let tree = OverlayTree::build(sections, config.site());
        let nav = NavigationState::new(store.view());
        info!(
            sections = tree.sections().len(),
            cards = tree.all_cards().count(),
            view = %store.view(),
            "quick menu built"
        );
        let placeholder = tree.header().placeholder;
        Self {
            config,
            tree,
            nav,
            store,
            bindings,
            visibility: OverlayVisibility::default(),
            search: SearchInput::new(placeholder),
            search_focused: false,
            help_visible: false,
            toolbar_measure: None,
            toolbar_entries,
            hidden_toolbar_ids,
        }
    }

    pub fn config(&self) -> &HelmConfig {
        &self.config
    }

    pub fn tree(&self) -> &OverlayTree {
        &self.tree
    }

    pub fn nav(&self) -> &NavigationState {
        &self.nav
    }

    pub fn selection(&self) -> Selection {
        self.nav.selection()
    }

    pub fn presentation(&self) -> Presentation {
        project(&self.tree, &self.nav)
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn platform(&self) -> Platform {
        self.bindings.platform()
    }

    pub fn search(&self) -> &SearchInput {
        &self.search
    }

    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn view(&self) -> ViewMode {
        self.nav.view()
    }

    pub fn visible(&self) -> bool {
        self.visibility.visible()
    }

    pub fn pinned_toolbar_height(&self) -> u16 {
        self.visibility.pinned_toolbar_height()
    }

    /// Toolbar entries the host strip keeps showing.
    pub fn toolbar_entries(&self) -> &[NavigationItem] {
        &self.toolbar_entries
    }

    /// Toolbar entries moved into the overlay.
    pub fn hidden_toolbar_ids(&self) -> &[String] {
        &self.hidden_toolbar_ids
    }

    /// Open the overlay beneath a toolbar of the measured height. Opening an
    /// open overlay does nothing.
    pub fn show(&mut self, toolbar_height: Option<u16>) -> MenuEvent {
        if !self.visibility.show(toolbar_height) {
            return MenuEvent::Handled;
        }
        debug!(toolbar_height = self.pinned_toolbar_height(), "overlay shown");
        MenuEvent::Opened
    }

    /// Close the overlay and drop every transient selection. The filter
    /// text survives.
    pub fn hide(&mut self) -> MenuEvent {
        self.help_visible = false;
        self.search_focused = false;
        self.nav.reset();
        if self.visibility.hide() {
            debug!("overlay hidden");
            MenuEvent::Closed
        } else {
            MenuEvent::Handled
        }
    }

    pub fn toggle(&mut self, toolbar_height: Option<u16>) -> MenuEvent {
        if self.visible() {
            self.hide()
        } else {
            self.show(toolbar_height)
        }
    }

    /// Re-pin after the toolbar may have reflowed (resize, or the frame
    /// after opening).
    pub fn remeasure_toolbar(&mut self, toolbar_height: Option<u16>) {
        self.note_toolbar_height(toolbar_height);
        if self.visible() {
            self.visibility.pin_toolbar_height(toolbar_height);
        }
    }

    /// Run work deferred from [`QuickMenu::show`]. Called once per tick.
    pub fn run_pending(&mut self, toolbar_height: Option<u16>) {
        self.note_toolbar_height(toolbar_height);
        let pending = self.visibility.take_pending();
        if pending.remeasure_toolbar {
            self.visibility.pin_toolbar_height(toolbar_height);
        }
        if pending.focus_search && self.visible() {
            self.search_focused = true;
        }
    }

    /// Record the host toolbar height as currently laid out.
    pub fn note_toolbar_height(&mut self, toolbar_height: Option<u16>) {
        self.toolbar_measure = toolbar_height;
    }

    pub fn focus_search(&mut self) {
        if self.visible() {
            self.search_focused = true;
        }
    }

    pub fn blur_search(&mut self) {
        self.search_focused = false;
    }

    pub fn set_help_visible(&mut self, visible: bool) {
        if self.help_visible == visible {
            return;
        }
        self.help_visible = visible;
        if visible {
            self.search_focused = false;
        } else {
            self.focus_search();
        }
    }

    /// Replace the filter text and re-run the filter.
    pub fn set_query(&mut self, query: &str) -> FilterSummary {
        if self.search.value() != query {
            self.search.set_value(query);
        }
        self.refilter()
    }

    fn refilter(&mut self) -> FilterSummary {
        let summary = apply_filter(&mut self.tree, self.search.value());
        self.nav.after_filter(&self.tree);
        summary
    }

    /// Switch layout, persist it and return focus to the filter field.
    pub fn set_view(&mut self, view: ViewMode) {
        self.store.set_view(view);
        self.nav.set_view(view);
        self.focus_search();
        info!(view = %view, "view mode changed");
    }

    pub fn hover(&mut self, card: CardId) {
        if self.tree.card(card).is_some() {
            self.nav.hover(card);
        }
    }

    /// Pointer activation of a card, or of one of its sub-entries by display
    /// position.
    pub fn click(&mut self, card: CardId, sub: Option<usize>) -> MenuEvent {
        let Some(entry) = self.tree.card(card) else {
            return MenuEvent::Ignored;
        };
        let activation = match sub.and_then(|pos| entry.subs().get(pos)) {
            Some(sub) => Activation::new(sub.href(), sub.external()),
            None => Activation::new(entry.href(), entry.external()),
        };
        self.hide();
        MenuEvent::Activated(activation)
    }

    /// Feed a key through every listener in registration order. Each one
    /// skips events an earlier listener already handled.
    pub fn handle_key(&mut self, dispatch: &mut KeyDispatch, measure: &dyn LayoutMeasure) -> MenuEvent {
        let outcomes = [
            self.on_navigation_key(dispatch, measure),
            self.on_escape(dispatch),
            self.on_shortcut(dispatch),
            self.on_text_input(dispatch),
        ];
        outcomes
            .into_iter()
            .find(|outcome| !outcome.is_ignored())
            .unwrap_or(MenuEvent::Ignored)
    }

    fn on_navigation_key(&mut self, dispatch: &mut KeyDispatch, measure: &dyn LayoutMeasure) -> MenuEvent {
        if dispatch.handled() || !self.visible() || self.help_visible {
            return MenuEvent::Ignored;
        }
        let Some(action) = self.bindings.action_for_key(&dispatch.key) else {
            return MenuEvent::Ignored;
        };
        match action {
            Action::NavLeft | Action::NavRight => {
                let delta = if action == Action::NavLeft { -1 } else { 1 };
                self.nav.move_horizontal(&self.tree, measure, delta);
            }
            Action::NavUp | Action::NavDown => {
                let dir = if action == Action::NavUp { -1 } else { 1 };
                self.nav.move_vertical(&self.tree, measure, dir);
            }
            Action::Activate => {
                let Some(activation) = self.nav.activate(&self.tree) else {
                    return MenuEvent::Ignored;
                };
                dispatch.mark_handled();
                info!(href = %activation.href, external = activation.external, "activated");
                self.hide();
                return MenuEvent::Activated(activation);
            }
            Action::ToggleView => self.set_view(self.view().toggled()),
            Action::ToggleHelp => self.set_help_visible(true),
            _ => return MenuEvent::Ignored,
        }
        dispatch.mark_handled();
        MenuEvent::Handled
    }

    fn on_escape(&mut self, dispatch: &mut KeyDispatch) -> MenuEvent {
        if dispatch.handled() || !self.visible() {
            return MenuEvent::Ignored;
        }
        let closes_help =
            self.help_visible && self.bindings.matches(Action::ToggleHelp, &dispatch.key);
        if !closes_help && !self.bindings.matches(Action::Close, &dispatch.key) {
            return MenuEvent::Ignored;
        }
        dispatch.mark_handled();
        if self.help_visible {
            self.set_help_visible(false);
            MenuEvent::Handled
        } else {
            self.hide()
        }
    }

    fn on_shortcut(&mut self, dispatch: &mut KeyDispatch) -> MenuEvent {
        if dispatch.handled() || !self.bindings.matches(Action::ToggleOverlay, &dispatch.key) {
            return MenuEvent::Ignored;
        }
        dispatch.mark_handled();
        self.toggle(self.toolbar_measure)
    }

    fn on_text_input(&mut self, dispatch: &mut KeyDispatch) -> MenuEvent {
        if dispatch.handled() || !self.visible() || !self.search_focused || self.help_visible {
            return MenuEvent::Ignored;
        }
        if matches!(dispatch.key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Tab) {
            return MenuEvent::Ignored;
        }
        match self.search.handle_key(&dispatch.key) {
            InputOutcome::Ignored => MenuEvent::Ignored,
            InputOutcome::Moved => {
                dispatch.mark_handled();
                MenuEvent::Handled
            }
            InputOutcome::Edited => {
                dispatch.mark_handled();
                let summary = self.refilter();
                debug!(
                    query = %summary.query,
                    matched = summary.matched_cards,
                    hidden_sections = summary.hidden_sections,
                    "filter applied"
                );
                MenuEvent::Handled
            }
        }
    }

    /// Insert pasted text into the filter field.
    pub fn paste(&mut self, text: &str) -> MenuEvent {
        if !self.visible() || !self.search_focused || self.help_visible {
            return MenuEvent::Ignored;
        }
        for c in text.chars().filter(|c| !c.is_control()) {
            self.search.insert_char(c);
        }
        self.refilter();
        MenuEvent::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    use crate::model::{Icon, SectionKind, SubItem};
    use crate::nav::CardBounds;

    struct Column;

    impl LayoutMeasure for Column {
        fn bounds(&self, card: CardId) -> Option<CardBounds> {
            Some(CardBounds::new(0.0, card.idx() as f32 * 50.0, 100.0, 40.0))
        }
    }

    fn menu() -> QuickMenu {
        let items = vec![
            NavigationItem::new(
                "menu-posts",
                "Posts",
                "edit.php",
                Icon::Generic,
                vec![SubItem::new("All Posts", "edit.php"), SubItem::new("Tags", "edit-tags.php")],
            )
            .unwrap(),
            NavigationItem::new("menu-media", "Media", "upload.php", Icon::Generic, vec![]).unwrap(),
        ];
        QuickMenu::from_sections(
            HelmConfig::default().freeze(),
            &[Section {
                kind: SectionKind::System,
                items,
            }],
            Vec::new(),
            Vec::new(),
            ViewStore::ephemeral(),
            KeyBindings::for_platform(Platform::Other),
        )
    }

    fn press(menu: &mut QuickMenu, code: KeyCode, mods: KeyModifiers) -> MenuEvent {
        let mut dispatch = KeyDispatch::new(KeyEvent::new(code, mods));
        menu.handle_key(&mut dispatch, &Column)
    }

    fn open_chord() -> (KeyCode, KeyModifiers) {
        (KeyCode::Char('.'), KeyModifiers::CONTROL | KeyModifiers::SHIFT)
    }

    #[test]
    fn shortcut_toggles_and_show_is_idempotent() {
        let mut m = menu();
        let (code, mods) = open_chord();
        assert_eq!(press(&mut m, code, mods), MenuEvent::Opened);
        assert_eq!(m.show(None), MenuEvent::Handled);
        m.run_pending(Some(2));
        assert_eq!(m.pinned_toolbar_height(), 2);
        assert!(m.search_focused());
        assert_eq!(press(&mut m, code, mods), MenuEvent::Closed);
        assert!(!m.visible());
    }

    #[test]
    fn shortcut_pins_latest_toolbar_measurement() {
        let mut m = menu();
        m.note_toolbar_height(Some(3));
        let (code, mods) = open_chord();
        assert_eq!(press(&mut m, code, mods), MenuEvent::Opened);
        assert_eq!(m.pinned_toolbar_height(), 3);
    }

    #[test]
    fn navigation_keys_ignored_while_closed() {
        let mut m = menu();
        assert_eq!(
            press(&mut m, KeyCode::Right, KeyModifiers::CONTROL),
            MenuEvent::Ignored
        );
        assert_eq!(m.selection(), Selection::Idle);
    }

    #[test]
    fn escape_closes_help_before_overlay() {
        let mut m = menu();
        m.show(None);
        m.set_help_visible(true);
        assert_eq!(press(&mut m, KeyCode::Esc, KeyModifiers::NONE), MenuEvent::Handled);
        assert!(m.visible());
        assert!(!m.help_visible());
        assert!(m.search_focused());
        assert_eq!(press(&mut m, KeyCode::Esc, KeyModifiers::NONE), MenuEvent::Closed);
    }

    #[test]
    fn typing_filters_and_enter_activates_first_match() {
        let mut m = menu();
        m.show(None);
        m.run_pending(None);
        for c in "tag".chars() {
            press(&mut m, KeyCode::Char(c), KeyModifiers::NONE);
        }
        assert_eq!(m.tree().query(), "tag");
        press(&mut m, KeyCode::Down, KeyModifiers::CONTROL);
        match press(&mut m, KeyCode::Enter, KeyModifiers::NONE) {
            MenuEvent::Activated(a) => assert_eq!(a.href, "edit-tags.php"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!m.visible());
        assert_eq!(m.selection(), Selection::Idle);
        assert_eq!(m.search().value(), "tag");
    }

    #[test]
    fn view_toggle_resets_keyboard_state() {
        let mut m = menu();
        m.show(None);
        press(&mut m, KeyCode::Down, KeyModifiers::CONTROL);
        assert!(m.nav().keyboard_mode());
        press(&mut m, KeyCode::F(2), KeyModifiers::NONE);
        assert_eq!(m.view(), ViewMode::Expanded);
        assert!(!m.nav().keyboard_mode());
        assert_eq!(m.nav().sub_index(), None);
    }

    #[test]
    fn click_activates_sub_by_position() {
        let mut m = menu();
        m.show(None);
        let posts = m.tree().card_id(0, 0);
        match m.click(posts, Some(1)) {
            MenuEvent::Activated(a) => assert_eq!(a.href, "edit-tags.php"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
