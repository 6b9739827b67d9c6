//! Pure projection from tree + navigation state to presentation attributes.

use crate::nav::NavigationState;
use crate::tree::{CardId, OverlayTree};
use crate::view_state::ViewMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPresentation {
    pub id: CardId,
    pub active: bool,
    pub dimmed: bool,
    /// Sub-list is shown regardless of hover.
    pub sub_open: bool,
    /// Display position of the highlighted sub-entry.
    pub active_sub: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPresentation {
    pub index: usize,
    pub hidden: bool,
    pub cards: Vec<CardPresentation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub keyboard_mode: bool,
    pub has_query: bool,
    pub view: ViewMode,
    pub sections: Vec<SectionPresentation>,
}

impl Presentation {
    pub fn card(&self, id: CardId) -> Option<&CardPresentation> {
        self.sections
            .get(id.section())?
            .cards
            .iter()
            .find(|card| card.id == id)
    }
}

pub fn project(tree: &OverlayTree, nav: &NavigationState) -> Presentation {
    let active = nav.active().filter(|&id| tree.card(id).is_some());
    let active_sub = active.and_then(|id| {
        let index = nav.sub_index()?;
        tree.candidate_subs(id).get(index).copied()
    });

    let sections = tree
        .sections()
        .iter()
        .enumerate()
        .map(|(s, section)| SectionPresentation {
            index: s,
            hidden: section.hidden(),
            cards: section
                .cards()
                .iter()
                .map(|card| {
                    let id = tree.card_id(s, card.idx());
                    let is_active = active == Some(id);
                    let selected_sub = if is_active { active_sub } else { None };
                    CardPresentation {
                        id,
                        active: is_active,
                        dimmed: tree.has_query() && card.dimmed(),
                        sub_open: card.filter_expanded() || selected_sub.is_some(),
                        active_sub: selected_sub,
                    }
                })
                .collect(),
        })
        .collect();

    Presentation {
        keyboard_mode: nav.keyboard_mode(),
        has_query: tree.has_query(),
        view: nav.view(),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::apply_filter;
    use crate::links::SiteOrigin;
    use crate::model::{Icon, NavigationItem, Section, SectionKind, SubItem};

    fn tree() -> OverlayTree {
        let items = vec![
            NavigationItem::new(
                "",
                "Posts",
                "/p",
                Icon::Generic,
                vec![SubItem::new("Categories", "/c"), SubItem::new("Tags", "/t")],
            )
            .unwrap(),
            NavigationItem::new("", "Media", "/m", Icon::Generic, vec![]).unwrap(),
        ];
        OverlayTree::build(
            &[Section {
                kind: SectionKind::System,
                items,
            }],
            &SiteOrigin::parse("https://example.com/").unwrap(),
        )
    }

    #[test]
    fn idle_state_projects_plain_cards() {
        let t = tree();
        let p = project(&t, &NavigationState::default());
        assert!(p.sections[0].cards.iter().all(|c| !c.active && !c.sub_open));
        assert!(!p.has_query);
    }

    #[test]
    fn sub_only_match_forces_list_open() {
        let mut t = tree();
        apply_filter(&mut t, "tag");
        let p = project(&t, &NavigationState::default());
        let posts = p.card(t.card_id(0, 0)).unwrap();
        assert!(posts.sub_open);
        assert!(!posts.dimmed);
        let media = p.card(t.card_id(0, 1)).unwrap();
        assert!(media.dimmed);
        // matching sub moved first
        assert_eq!(t.sections()[0].cards()[0].subs()[0].label().raw(), "Tags");
    }
}
