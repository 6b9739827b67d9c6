use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Clear;

use crate::ui::UiFrame;

/// Centered box drawn above everything else, with an optional dimmed
/// backdrop.
#[derive(Debug, Clone)]
pub struct DialogOverlay {
    width: u16,
    height: u16,
    dim_backdrop: bool,
}

impl DialogOverlay {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            dim_backdrop: false,
        }
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn set_dim_backdrop(&mut self, dim: bool) {
        self.dim_backdrop = dim;
    }

    /// Clamp the dialog to `area` so a small terminal never draws outside
    /// the buffer.
    pub fn rect_for(&self, area: Rect) -> Rect {
        let mut width = area.width.min(self.width).max(1);
        let mut height = area.height.min(self.height).max(1);
        if area.width >= 24 {
            width = width.max(24);
        }
        if area.height >= 5 {
            height = height.max(5);
        }
        let x = area.x.saturating_add(area.width.saturating_sub(width) / 2);
        let y = area
            .y
            .saturating_add(area.height.saturating_sub(height) / 2);
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Dim `area` (when enabled) and clear the dialog box. Returns the box.
    pub fn prepare(&self, frame: &mut UiFrame<'_>, area: Rect) -> Rect {
        if self.dim_backdrop {
            frame.patch_style(area, Style::default().add_modifier(Modifier::DIM));
        }
        let rect = self.rect_for(area);
        frame.render_widget(Clear, rect);
        rect
    }
}
