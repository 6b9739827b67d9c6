use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Platform family; decides the navigation modifier and shortcut chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Mac,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }

    /// Modifier used for horizontal card navigation and the open chord.
    pub fn primary_modifier(self) -> KeyModifiers {
        match self {
            Platform::Mac => KeyModifiers::SUPER,
            Platform::Other => KeyModifiers::CONTROL,
        }
    }

    pub fn modifier_label(self) -> &'static str {
        match self {
            Platform::Mac => "⌘",
            Platform::Other => "Ctrl",
        }
    }

    /// Label shown next to the toolbar toggle.
    pub fn shortcut_label(self) -> &'static str {
        match self {
            Platform::Mac => "⌘⇧.",
            Platform::Other => "Ctrl+Shift+.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    ToggleOverlay,
    Close,
    ToggleHelp,
    ToggleView,
    NavLeft,
    NavRight,
    NavUp,
    NavDown,
    Activate,
    ScrollPageUp,
    ScrollPageDown,
    ToggleMouseCapture,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::ToggleOverlay => "Open / Close menu",
            Action::Close => "Close menu or help",
            Action::ToggleHelp => "Toggle help",
            Action::ToggleView => "Switch Cards / Expanded",
            Action::NavLeft => "Previous card",
            Action::NavRight => "Next card",
            Action::NavUp => "Previous list item",
            Action::NavDown => "Next list item",
            Action::Activate => "Open selection",
            Action::ScrollPageUp => "Scroll page up",
            Action::ScrollPageDown => "Scroll page down",
            Action::ToggleMouseCapture => "Toggle mouse capture",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::SUPER) {
            parts.push("Cmd".to_string());
        }
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    platform: Platform,
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            map: HashMap::new(),
        }
    }

    pub fn for_platform(platform: Platform) -> Self {
        use Action::*;
        let primary = platform.primary_modifier();
        let mut kb = Self::new(platform);
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        // Shift+. arrives as '>' on most layouts, sometimes still flagged SHIFT.
        kb.add(
            ToggleOverlay,
            KeyCombo::new(KeyCode::Char('.'), primary | KeyModifiers::SHIFT),
        );
        kb.add(
            ToggleOverlay,
            KeyCombo::new(KeyCode::Char('>'), primary | KeyModifiers::SHIFT),
        );
        kb.add(ToggleOverlay, KeyCombo::new(KeyCode::Char('>'), primary));
        kb.add(Close, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        kb.add(ToggleHelp, KeyCombo::new(KeyCode::F(1), KeyModifiers::NONE));
        kb.add(ToggleView, KeyCombo::new(KeyCode::F(2), KeyModifiers::NONE));
        kb.add(NavLeft, KeyCombo::new(KeyCode::Left, primary));
        kb.add(NavRight, KeyCombo::new(KeyCode::Right, primary));
        for mods in [KeyModifiers::CONTROL, KeyModifiers::SUPER] {
            kb.add(NavUp, KeyCombo::new(KeyCode::Up, mods));
            kb.add(NavDown, KeyCombo::new(KeyCode::Down, mods));
        }
        kb.add(Activate, KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE));
        kb.add(
            ScrollPageUp,
            KeyCombo::new(KeyCode::PageUp, KeyModifiers::NONE),
        );
        kb.add(
            ScrollPageDown,
            KeyCombo::new(KeyCode::PageDown, KeyModifiers::NONE),
        );
        kb.add(
            ToggleMouseCapture,
            KeyCombo::new(KeyCode::F(12), KeyModifiers::NONE),
        );
        kb
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        for (act, list) in &self.map {
            if list.iter().any(|c| c.matches(key)) {
                return Some(*act);
            }
        }
        None
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

/// A key event on its way through the listeners.
///
/// The first listener that acts on the event marks it handled; later
/// listeners bound to the same chord must skip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDispatch {
    pub key: KeyEvent,
    handled: bool,
}

impl KeyDispatch {
    pub fn new(key: KeyEvent) -> Self {
        Self {
            key,
            handled: false,
        }
    }

    pub fn handled(&self) -> bool {
        self.handled
    }

    pub fn mark_handled(&mut self) {
        self.handled = true;
    }
}
