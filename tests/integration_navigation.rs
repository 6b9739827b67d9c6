use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use helm_menu::config::HelmConfig;
use helm_menu::keybindings::{KeyBindings, KeyDispatch, Platform};
use helm_menu::links::SiteOrigin;
use helm_menu::menu::{MenuEvent, QuickMenu};
use helm_menu::model::{Icon, NavigationItem, Section, SectionKind, SubItem};
use helm_menu::nav::{CardBounds, LayoutMeasure, NavigationState, Selection};
use helm_menu::tree::{CardId, OverlayTree};
use helm_menu::view_state::{ViewMode, ViewStore};

/// Synthetic grid: cards laid out left to right, `columns` per row, in the
/// order given.
struct FakeGrid {
    columns: usize,
    slots: HashMap<CardId, usize>,
}

impl FakeGrid {
    fn new(columns: usize, ids: &[CardId]) -> Self {
        Self {
            columns,
            slots: ids.iter().enumerate().map(|(i, &id)| (id, i)).collect(),
        }
    }
}

impl LayoutMeasure for FakeGrid {
    fn bounds(&self, card: CardId) -> Option<CardBounds> {
        let slot = *self.slots.get(&card)?;
        let col = (slot % self.columns) as f32;
        let row = (slot / self.columns) as f32;
        Some(CardBounds::new(col * 220.0, row * 120.0, 200.0, 100.0))
    }
}

fn item(label: &str, subs: &[&str]) -> NavigationItem {
    NavigationItem::new(
        "",
        label,
        format!("{}.php", label.to_lowercase()),
        Icon::Generic,
        subs.iter()
            .map(|s| SubItem::new(*s, format!("{}.php", s.to_lowercase().replace(' ', "-"))))
            .collect(),
    )
    .unwrap()
}

fn tree(items: Vec<NavigationItem>) -> OverlayTree {
    OverlayTree::build(
        &[Section {
            kind: SectionKind::System,
            items,
        }],
        &SiteOrigin::parse("https://example.com/wp-admin/").unwrap(),
    )
}

fn ids(tree: &OverlayTree) -> Vec<CardId> {
    tree.all_cards().map(|(id, _)| id).collect()
}

#[test]
fn horizontal_moves_wrap_across_rows() {
    let tree = tree(["A", "B", "C", "D", "E"].iter().map(|l| item(l, &[])).collect());
    let cards = ids(&tree);
    let grid = FakeGrid::new(2, &cards);
    let mut nav = NavigationState::new(ViewMode::Cards);

    // end of the first row continues on the next one
    nav.hover(cards[1]);
    nav.move_horizontal(&tree, &grid, 1);
    assert_eq!(nav.selection(), Selection::Card(cards[2]));

    nav.move_horizontal(&tree, &grid, 1);
    nav.move_horizontal(&tree, &grid, 1);
    assert_eq!(nav.selection(), Selection::Card(cards[4]));

    // end of the last row wraps to the very first card
    nav.move_horizontal(&tree, &grid, 1);
    assert_eq!(nav.selection(), Selection::Card(cards[0]));

    // and back again
    nav.move_horizontal(&tree, &grid, -1);
    assert_eq!(nav.selection(), Selection::Card(cards[4]));
    assert!(nav.keyboard_mode());
}

#[test]
fn moving_up_enters_the_last_sub_entry() {
    let tree = tree(vec![
        item("Posts", &["All Posts", "Add New", "Tags"]),
        item("Media", &[]),
    ]);
    let cards = ids(&tree);
    let grid = FakeGrid::new(1, &cards);
    let mut nav = NavigationState::new(ViewMode::Cards);

    nav.hover(cards[1]);
    nav.move_vertical(&tree, &grid, -1);
    assert_eq!(nav.selection(), Selection::Sub(cards[0], 2));

    // down walks the list then leaves it for the next card
    nav.move_vertical(&tree, &grid, 1);
    assert_eq!(nav.selection(), Selection::Card(cards[1]));
}

#[test]
fn moving_down_does_not_open_the_next_cards_list() {
    let tree = tree(vec![item("Media", &[]), item("Posts", &["All Posts", "Tags"])]);
    let cards = ids(&tree);
    let grid = FakeGrid::new(1, &cards);
    let mut nav = NavigationState::new(ViewMode::Cards);

    nav.hover(cards[0]);
    nav.move_vertical(&tree, &grid, 1);
    assert_eq!(nav.selection(), Selection::Card(cards[1]));
}

#[test]
fn enter_on_a_sub_entry_opens_the_sub_link() {
    let config = HelmConfig::default().freeze();
    let mut menu = QuickMenu::from_sections(
        config,
        &[Section {
            kind: SectionKind::System,
            items: vec![item("Posts", &["All Posts", "Add New", "Tags"])],
        }],
        Vec::new(),
        Vec::new(),
        ViewStore::ephemeral(),
        KeyBindings::for_platform(Platform::Other),
    );
    let grid = FakeGrid::new(3, &ids(menu.tree()));
    menu.show(None);

    let down = KeyEvent::new(KeyCode::Down, KeyModifiers::CONTROL);
    for _ in 0..2 {
        let outcome = menu.handle_key(&mut KeyDispatch::new(down), &grid);
        assert_eq!(outcome, MenuEvent::Handled);
    }
    let card = menu.tree().card_id(0, 0);
    assert_eq!(menu.selection(), Selection::Sub(card, 1));

    let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
    match menu.handle_key(&mut KeyDispatch::new(enter), &grid) {
        MenuEvent::Activated(activation) => {
            assert_eq!(activation.href, "add-new.php");
            assert!(!activation.external);
        }
        other => panic!("expected activation, got {other:?}"),
    }
    assert!(!menu.visible());
}

#[test]
fn navigation_keys_are_ignored_while_closed() {
    let mut menu = QuickMenu::from_sections(
        HelmConfig::default().freeze(),
        &[Section {
            kind: SectionKind::System,
            items: vec![item("Posts", &[])],
        }],
        Vec::new(),
        Vec::new(),
        ViewStore::ephemeral(),
        KeyBindings::for_platform(Platform::Other),
    );
    let grid = FakeGrid::new(1, &ids(menu.tree()));
    let right = KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL);
    assert_eq!(
        menu.handle_key(&mut KeyDispatch::new(right), &grid),
        MenuEvent::Ignored
    );
    assert_eq!(menu.selection(), Selection::Idle);
}
