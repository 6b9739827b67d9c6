//! Raw key event cleanup applied before any listener sees an event.
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` for events that should be dropped.
    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        let Event::Key(mut key) = evt else {
            return Some(evt);
        };
        if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
            key.code = KeyCode::BackTab;
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
        // Enhanced keyboard protocols report Shift+. as '.' plus SHIFT.
        if key.code == KeyCode::Char('.') && key.modifiers.contains(KeyModifiers::SHIFT) {
            key.code = KeyCode::Char('>');
        }
        if let KeyCode::Char(c) = key.code
            && !c.is_alphabetic()
        {
            key.modifiers.remove(KeyModifiers::SHIFT);
        }

        match key.kind {
            KeyEventKind::Release => {
                if key.code == KeyCode::Esc {
                    self.esc_down = false;
                }
                return None;
            }
            KeyEventKind::Repeat if cfg!(windows) => return None,
            _ => {}
        }
        if cfg!(windows) {
            // Windows consoles repeat Esc presses while held.
            if key.code == KeyCode::Esc {
                if self.esc_down {
                    return None;
                }
                self.esc_down = true;
            } else {
                self.esc_down = false;
            }
        }
        Some(Event::Key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn normalized(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        let mut norm = KeyboardNormalizer::new();
        match norm.normalize(Event::Key(KeyEvent::new(code, mods))) {
            Some(Event::Key(k)) => k,
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn tab_with_shift_becomes_backtab() {
        let k = normalized(KeyCode::Tab, KeyModifiers::SHIFT);
        assert_eq!(k.code, KeyCode::BackTab);
        assert!(!k.modifiers.contains(KeyModifiers::SHIFT));
    }

    #[test]
    fn shifted_period_becomes_greater_than() {
        let k = normalized(
            KeyCode::Char('.'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        assert_eq!(k.code, KeyCode::Char('>'));
        assert_eq!(k.modifiers, KeyModifiers::CONTROL);
        let upper = normalized(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(upper.modifiers, KeyModifiers::SHIFT);
    }

    #[test]
    fn release_key_is_ignored() {
        let mut norm = KeyboardNormalizer::new();
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(norm.normalize(Event::Key(key)).is_none());
    }

    #[test]
    fn non_key_events_pass_through() {
        let mut norm = KeyboardNormalizer::new();
        assert!(norm.normalize(Event::Resize(10, 20)).is_some());
    }
}
