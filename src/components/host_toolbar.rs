use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use unicode_width::UnicodeWidthStr;

use crate::components::{Component, ComponentContext};
use crate::keybindings::Platform;
use crate::model::NavigationItem;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

const GAP: u16 = 2;

/// Top strip standing in for the host's admin toolbar: the menu trigger
/// followed by the toolbar entries that stay visible. Wraps onto extra
/// lines when the terminal is narrow, so its height depends on width.
#[derive(Debug, Clone)]
pub struct HostToolbar {
    trigger: String,
    entries: Vec<String>,
    trigger_rect: Option<Rect>,
}

impl HostToolbar {
    pub fn new(platform: Platform, entries: &[NavigationItem]) -> Self {
        Self {
            trigger: format!(" ≡ Menu  {} ", platform.shortcut_label()),
            entries: entries.iter().map(|item| item.label().to_string()).collect(),
            trigger_rect: None,
        }
    }

    fn chips(&self) -> impl Iterator<Item = (&str, bool)> {
        std::iter::once((self.trigger.as_str(), true))
            .chain(self.entries.iter().map(|label| (label.as_str(), false)))
    }

    /// Chip positions relative to the strip origin for a given width.
    fn layout(&self, width: u16) -> Vec<(u16, u16, usize)> {
        let mut placed = Vec::new();
        let (mut x, mut y) = (0u16, 0u16);
        for (i, (text, _)) in self.chips().enumerate() {
            let w = (text.width().min(u16::MAX as usize) as u16).min(width.max(1));
            if x > 0 && x.saturating_add(w) > width {
                x = 0;
                y = y.saturating_add(1);
            }
            placed.push((x, y, i));
            x = x.saturating_add(w).saturating_add(GAP);
        }
        placed
    }

    /// Rows needed at `width`. `None` when there is nothing to measure.
    pub fn measure_height(&self, width: u16) -> Option<u16> {
        if width == 0 {
            return None;
        }
        self.layout(width)
            .last()
            .map(|&(_, y, _)| y.saturating_add(1))
    }

    /// Whether `pos` hits the menu trigger as last drawn.
    pub fn hits_trigger(&self, pos: Position) -> bool {
        self.trigger_rect.is_some_and(|rect| rect.contains(pos))
    }
}

impl Component for HostToolbar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        self.trigger_rect = None;
        if area.height == 0 || area.width == 0 {
            return;
        }
        frame.fill(area, Style::default().bg(theme::toolbar_bg()));
        let layout = self.layout(area.width);
        let chips: Vec<(String, bool)> = self
            .chips()
            .map(|(text, trigger)| (text.to_string(), trigger))
            .collect();
        let buffer = frame.buffer_mut();
        for (x, y, i) in layout {
            let (text, is_trigger) = &chips[i];
            let style = if *is_trigger {
                theme::toolbar_trigger()
            } else {
                Style::default().fg(theme::toolbar_fg()).bg(theme::toolbar_bg())
            };
            let (cx, cy) = (area.x.saturating_add(x), area.y.saturating_add(y));
            let end = safe_set_string(buffer, area, cx, cy, text, style);
            if *is_trigger && end > cx && cy < area.y.saturating_add(area.height) {
                self.trigger_rect = Some(Rect::new(cx, cy, end - cx, 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Icon;
    use ratatui::buffer::Buffer;

    fn toolbar() -> HostToolbar {
        let entries: Vec<NavigationItem> = ["My Site", "New", "Howdy, admin"]
            .iter()
            .filter_map(|label| NavigationItem::new("", *label, "#", Icon::Generic, vec![]))
            .collect();
        HostToolbar::new(Platform::Other, &entries)
    }

    #[test]
    fn height_grows_when_narrow() {
        let t = toolbar();
        assert_eq!(t.measure_height(120), Some(1));
        assert_eq!(t.measure_height(24), Some(3));
        assert_eq!(t.measure_height(0), None);
    }

    #[test]
    fn trigger_is_hit_testable_after_render() {
        let mut t = toolbar();
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        t.render(&mut frame, area, &ComponentContext::default());
        assert!(t.hits_trigger(Position::new(2, 0)));
        assert!(!t.hits_trigger(Position::new(70, 0)));
        let line: String = (0..area.width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect();
        assert!(line.starts_with(" ≡ Menu  Ctrl+Shift+. "));
        assert!(line.contains("Howdy, admin"));
    }
}
