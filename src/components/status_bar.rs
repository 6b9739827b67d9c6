use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthStr;

use crate::components::ComponentContext;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

/// One-line footer: last navigation on the left, hints on the right. The
/// right side is dropped when both do not fit.
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    left: String,
    right: String,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }
}

impl super::Component for StatusBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        frame.fill(Rect::new(area.x, area.y, area.width, 1), self.style);
        let width = area.width as usize;
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }

        let left = truncate_to_width(&self.left, width);
        let left_end = safe_set_string(buffer, bounds, area.x, area.y, &left, self.style);

        let right = truncate_to_width(&self.right, width);
        let right_width = right.width();
        if right_width == 0 || right_width >= width {
            return;
        }
        let start_x = area.x.saturating_add((width - right_width) as u16);
        if start_x > left_end {
            safe_set_string(buffer, bounds, start_x, area.y, &right, self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;
    use ratatui::buffer::Buffer;

    fn row(buf: &Buffer) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, 0)).map(|c| c.symbol()).unwrap_or(" "))
            .collect()
    }

    #[test]
    fn left_and_right_share_the_line() {
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        let mut bar = StatusBar::new();
        bar.set_left("edit.php");
        bar.set_right("Ctrl+Q quit");
        bar.render(&mut UiFrame::from_parts(area, &mut buf), area, &ComponentContext::default());
        let line = row(&buf);
        assert!(line.starts_with("edit.php"));
        assert!(line.ends_with("Ctrl+Q quit"));
    }

    #[test]
    fn right_side_yields_to_long_left() {
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        let mut bar = StatusBar::new();
        bar.set_left("https://example.com/");
        bar.set_right("quit");
        bar.render(&mut UiFrame::from_parts(area, &mut buf), area, &ComponentContext::default());
        assert_eq!(row(&buf), "https://exam");
    }
}
