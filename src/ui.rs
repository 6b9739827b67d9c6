//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area.
//!
//! Overlay geometry is computed from the terminal size, the pinned toolbar
//! height and the scroll offset, so rectangles regularly drift partly off
//! screen. Writing out of bounds into a `Buffer` panics; every draw call here
//! is clipped first.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthChar;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer (tests and
    /// offscreen rendering).
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Apply `style` to every cell of `area` that is on screen.
    pub fn patch_style(&mut self, area: Rect, style: Style) {
        let Some(clipped) = self.clip_rect(area) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_style(style);
                }
            }
        }
    }

    /// Copy the window of `src` starting at row `src_top` into `dest`.
    /// Source cells outside `src` leave the destination untouched.
    pub fn blit_window(&mut self, src: &Buffer, src_top: u16, dest: Rect) {
        let Some(clipped) = self.clip_rect(dest) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            let sy = src.area.y.saturating_add(src_top).saturating_add(y - dest.y);
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                let sx = src.area.x.saturating_add(x - dest.x);
                if let (Some(src_cell), Some(dst_cell)) =
                    (src.cell((sx, sy)), self.buffer.cell_mut((x, y)))
                {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }

    /// Fill `area` with blanks in `style`.
    pub fn fill(&mut self, area: Rect, style: Style) {
        let Some(clipped) = self.clip_rect(area) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_style(style);
                }
            }
        }
    }
}

/// Write `text` at (`x`, `y`), clipped to `bounds`. Returns the column after
/// the last written cell.
pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) -> u16 {
    let bounds = bounds.intersection(buffer.area);
    if bounds.width == 0 || bounds.height == 0 {
        return x;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return x;
    }
    let available = max_x.saturating_sub(x);
    let text = truncate_to_width(text, available as usize);
    let (end, _) = buffer.set_stringn(x, y, &text, available as usize, style);
    end
}

/// Longest prefix of `value` that fits in `width` terminal columns.
pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for ch in value.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Like [`truncate_to_width`] but marks a cut with a trailing ellipsis.
pub(crate) fn ellipsize(value: &str, width: usize) -> String {
    let full = truncate_to_width(value, width);
    if full.len() == value.len() || width == 0 {
        return full;
    }
    let mut cut = truncate_to_width(value, width - 1);
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    #[test]
    fn truncate_counts_columns() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(ellipsize("Settings", 5), "Sett…");
        assert_eq!(ellipsize("Tools", 5), "Tools");
    }

    #[test]
    fn safe_set_string_writes_within_bounds() {
        let bounds = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(bounds);
        let end = safe_set_string(&mut buf, bounds, 1, 0, "hello", Style::default());
        assert_eq!(end, 6);
        assert_eq!(buf.cell((1, 0)).unwrap().symbol(), "h");

        // outside bounds should be ignored (no panic)
        safe_set_string(&mut buf, bounds, 100, 0, "x", Style::default());
        safe_set_string(&mut buf, bounds, 8, 1, "clipped", Style::default());
        assert_eq!(buf.cell((9, 1)).unwrap().symbol(), "l");
    }

    #[test]
    fn blit_window_copies_scrolled_rows() {
        let src_area = Rect::new(0, 0, 3, 4);
        let mut src = Buffer::empty(src_area);
        for y in 0..4 {
            src.set_string(0, y, format!("{y}{y}{y}"), Style::default());
        }
        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        ui.blit_window(&src, 2, Rect::new(1, 0, 5, 3));
        assert_eq!(buf.cell((1, 0)).unwrap().symbol(), "2");
        assert_eq!(buf.cell((3, 1)).unwrap().symbol(), "3");
        // past the source: untouched
        assert_eq!(buf.cell((1, 2)).unwrap().symbol(), " ");
        assert_eq!(buf.cell((4, 0)).unwrap().symbol(), " ");
    }

    #[test]
    fn fill_clips_to_frame_area() {
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        let style = Style::default().bg(ratatui::style::Color::Blue);
        ui.fill(Rect::new(3, 1, 5, 5), style);
        assert_eq!(buf.cell((4, 2)).unwrap().bg, ratatui::style::Color::Blue);
        assert_ne!(buf.cell((2, 1)).unwrap().bg, ratatui::style::Color::Blue);
    }
}
