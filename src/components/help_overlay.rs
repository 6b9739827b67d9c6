use std::str;

use crossterm::event::{Event, KeyCode, MouseEventKind};
use pulldown_cmark::{Event as MdEvent, Options, Parser, Tag, TagEnd};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::components::dialog_overlay::DialogOverlay;
use crate::components::{Component, ComponentContext};
use crate::keybindings::Platform;
use crate::theme;
use crate::ui::UiFrame;

static HELP_MD: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/help.md"));

const TITLE: &str = "Keyboard shortcuts";

#[derive(Debug)]
pub struct HelpOverlay {
    dialog: DialogOverlay,
    text: Text<'static>,
    scroll: u16,
    last_rect: Option<Rect>,
}

impl HelpOverlay {
    pub fn new(platform: Platform) -> Self {
        let mut dialog = DialogOverlay::new(64, 16);
        dialog.set_dim_backdrop(true);
        let raw = str::from_utf8(HELP_MD).unwrap_or_default();
        Self {
            dialog,
            text: markdown_to_text(&expand_placeholders(raw, platform)),
            scroll: 0,
            last_rect: None,
        }
    }

    pub fn text(&self) -> &Text<'static> {
        &self.text
    }

    /// Whether `pos` falls inside the panel as last drawn.
    pub fn contains(&self, pos: Position) -> bool {
        self.last_rect.is_some_and(|rect| rect.contains(pos))
    }

    pub fn reset(&mut self) {
        self.scroll = 0;
        self.last_rect = None;
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.text.lines.len().saturating_sub(1) as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max) as u16;
    }
}

impl Component for HelpOverlay {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            self.last_rect = None;
            return;
        }
        let rect = self.dialog.prepare(frame, area);
        self.last_rect = Some(rect);
        let block = Block::default()
            .title(TITLE)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::panel_border()))
            .style(Style::default().bg(theme::dialog_bg()).fg(theme::dialog_fg()));
        let paragraph = Paragraph::new(self.text.clone())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, rect);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) => match key.code {
                KeyCode::Up => self.scroll_by(-1),
                KeyCode::Down => self.scroll_by(1),
                KeyCode::PageUp => self.scroll_by(-5),
                KeyCode::PageDown => self.scroll_by(5),
                _ => return false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll_by(-1),
                MouseEventKind::ScrollDown => self.scroll_by(1),
                _ => return false,
            },
            _ => return false,
        }
        true
    }
}

fn expand_placeholders(raw: &str, platform: Platform) -> String {
    raw.replace("%SHORTCUT%", platform.shortcut_label())
        .replace("%MOD%", platform.modifier_label())
        .replace("%PACKAGE%", env!("CARGO_PKG_NAME"))
        .replace("%VERSION%", env!("CARGO_PKG_VERSION"))
}

/// Flatten the small markdown subset the help asset uses into styled lines.
fn markdown_to_text(raw: &str) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut bold = 0usize;

    for event in Parser::new_ext(raw, Options::empty()) {
        match event {
            MdEvent::Start(Tag::Strong) | MdEvent::Start(Tag::Heading { .. }) => bold += 1,
            MdEvent::End(TagEnd::Strong) => bold = bold.saturating_sub(1),
            MdEvent::End(TagEnd::Heading(_)) => {
                bold = bold.saturating_sub(1);
                lines.push(Line::from(std::mem::take(&mut current)));
                lines.push(Line::default());
            }
            MdEvent::Start(Tag::Item) => current.push(Span::raw("• ")),
            MdEvent::End(TagEnd::Item) => lines.push(Line::from(std::mem::take(&mut current))),
            MdEvent::End(TagEnd::List(_)) => lines.push(Line::default()),
            MdEvent::End(TagEnd::Paragraph) => {
                if !current.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current)));
                    lines.push(Line::default());
                }
            }
            MdEvent::Text(text) | MdEvent::Code(text) => {
                let style = if bold > 0 {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                current.push(Span::styled(text.into_string(), style));
            }
            MdEvent::SoftBreak => current.push(Span::raw(" ")),
            MdEvent::HardBreak => lines.push(Line::from(std::mem::take(&mut current))),
            MdEvent::Rule => lines.push(Line::styled("─".repeat(8), theme::muted())),
            _ => {}
        }
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    while lines.last().is_some_and(|line| line.spans.is_empty()) {
        lines.pop();
    }
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &Text<'_>) -> String {
        text.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn placeholders_follow_platform() {
        let mac = plain(HelpOverlay::new(Platform::Mac).text());
        assert!(mac.contains("⌘⇧. open or close the menu"));
        assert!(mac.contains("⌘ + Left / Right"));
        let other = plain(HelpOverlay::new(Platform::Other).text());
        assert!(other.contains("Ctrl+Shift+. open or close the menu"));
        assert!(other.contains(env!("CARGO_PKG_VERSION")));
        assert!(!other.contains('%'));
    }

    #[test]
    fn markdown_lists_become_bullets() {
        let text = markdown_to_text("# Title\n\n- **A** one\n- B\n");
        assert_eq!(plain(&text), "Title\n\n• A one\n• B");
        assert!(text.lines[2].spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn hit_test_uses_last_drawn_rect() {
        let mut help = HelpOverlay::new(Platform::Other);
        assert!(!help.contains(Position::new(1, 1)));
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = ratatui::buffer::Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        help.render(&mut frame, area, &ComponentContext::default());
        assert!(help.contains(Position::new(40, 12)));
        assert!(!help.contains(Position::new(0, 0)));
    }
}
