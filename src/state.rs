use crate::constants::FALLBACK_TOOLBAR_HEIGHT;

/// Work deferred until the next loop tick after the overlay is shown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingTasks {
    pub remeasure_toolbar: bool,
    pub focus_search: bool,
}

impl PendingTasks {
    pub fn is_empty(&self) -> bool {
        !self.remeasure_toolbar && !self.focus_search
    }
}

/// Overlay visibility plus the host toolbar height it is pinned beneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayVisibility {
    visible: bool,
    pinned_toolbar_height: u16,
    pending: PendingTasks,
}

impl Default for OverlayVisibility {
    fn default() -> Self {
        Self {
            visible: false,
            pinned_toolbar_height: FALLBACK_TOOLBAR_HEIGHT,
            pending: PendingTasks::default(),
        }
    }
}

impl OverlayVisibility {
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn pinned_toolbar_height(&self) -> u16 {
        self.pinned_toolbar_height
    }

    /// Record a fresh toolbar measurement. `None` means the toolbar could
    /// not be measured.
    pub fn pin_toolbar_height(&mut self, measured: Option<u16>) {
        self.pinned_toolbar_height = measured.unwrap_or(FALLBACK_TOOLBAR_HEIGHT);
    }

    /// Show the overlay. Returns false when it was already visible.
    pub fn show(&mut self, measured: Option<u16>) -> bool {
        if self.visible {
            return false;
        }
        self.pin_toolbar_height(measured);
        self.visible = true;
        self.pending = PendingTasks {
            remeasure_toolbar: true,
            focus_search: true,
        };
        true
    }

    /// Hide the overlay. Returns false when it was already hidden.
    pub fn hide(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.visible = false;
        self.pending = PendingTasks::default();
        true
    }

    pub fn request_focus(&mut self) {
        self.pending.focus_search = true;
    }

    pub fn take_pending(&mut self) -> PendingTasks {
        std::mem::take(&mut self.pending)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AppState {
    mouse_capture_enabled: bool,
    mouse_capture_dirty: bool,
    body_scroll: u16,
    quit_requested: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            mouse_capture_enabled: true,
            mouse_capture_dirty: false,
            body_scroll: 0,
            quit_requested: false,
        }
    }

    pub fn mouse_capture_enabled(&self) -> bool {
        self.mouse_capture_enabled
    }

    pub fn set_mouse_capture_enabled(&mut self, enabled: bool) {
        if self.mouse_capture_enabled == enabled {
            return;
        }
        self.mouse_capture_enabled = enabled;
        self.mouse_capture_dirty = true;
    }

    pub fn take_mouse_capture_change(&mut self) -> Option<bool> {
        if self.mouse_capture_dirty {
            self.mouse_capture_dirty = false;
            Some(self.mouse_capture_enabled)
        } else {
            None
        }
    }

    /// Put capture back to what the terminal actually has, without
    /// queueing another change.
    pub fn restore_mouse_capture(&mut self, enabled: bool) {
        self.mouse_capture_enabled = enabled;
        self.mouse_capture_dirty = false;
    }

    pub fn body_scroll(&self) -> u16 {
        self.body_scroll
    }

    pub fn scroll_body(&mut self, delta: i32) {
        let next = (self.body_scroll as i32 + delta).max(0);
        self.body_scroll = next.min(u16::MAX as i32) as u16;
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_is_idempotent_and_queues_deferred_work() {
        let mut v = OverlayVisibility::default();
        assert!(v.show(Some(2)));
        assert_eq!(v.pinned_toolbar_height(), 2);
        assert!(!v.show(Some(5)));
        assert_eq!(v.pinned_toolbar_height(), 2);
        let pending = v.take_pending();
        assert!(pending.remeasure_toolbar && pending.focus_search);
        assert!(v.take_pending().is_empty());
    }

    #[test]
    fn hide_drops_pending_and_unmeasured_falls_back() {
        let mut v = OverlayVisibility::default();
        v.show(None);
        assert_eq!(v.pinned_toolbar_height(), FALLBACK_TOOLBAR_HEIGHT);
        assert!(v.hide());
        assert!(!v.hide());
        assert!(v.take_pending().is_empty());
    }

    #[test]
    fn mouse_capture_toggle_and_take_change() {
        let mut s = AppState::new();
        assert!(s.mouse_capture_enabled());
        s.set_mouse_capture_enabled(true);
        assert!(s.take_mouse_capture_change().is_none());
        s.set_mouse_capture_enabled(false);
        assert_eq!(s.take_mouse_capture_change(), Some(false));
        assert!(s.take_mouse_capture_change().is_none());

        s.set_mouse_capture_enabled(true);
        s.restore_mouse_capture(false);
        assert!(!s.mouse_capture_enabled());
        assert!(s.take_mouse_capture_change().is_none());
    }

    #[test]
    fn body_scroll_saturates_at_zero() {
        let mut s = AppState::new();
        s.scroll_body(-3);
        assert_eq!(s.body_scroll(), 0);
        s.scroll_body(4);
        assert_eq!(s.body_scroll(), 4);
    }
}
