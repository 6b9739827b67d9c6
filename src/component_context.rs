//! Shared component rendering context.
//!
//! `ComponentContext` carries the UI state components need while rendering
//! and handling events, so the `Component` trait stays stable and components
//! do not grow ad-hoc boolean parameters.

use ratatui::layout::Position;

/// - `focused`: the component receives keyboard input.
/// - `overlay`: the component is drawn above other content.
/// - `pointer`: last known mouse position, used for hover affordances.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentContext {
    focused: bool,
    overlay: bool,
    pointer: Option<Position>,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            overlay: false,
            pointer: None,
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn overlay(&self) -> bool {
        self.overlay
    }

    pub const fn pointer(&self) -> Option<Position> {
        self.pointer
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }

    pub const fn with_pointer(mut self, pointer: Option<Position>) -> Self {
        self.pointer = pointer;
        self
    }
}
