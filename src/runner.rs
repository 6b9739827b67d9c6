//! The host surface: toolbar strip, body, status line and the quick menu
//! drawn over them, plus the loop that drives it all.

use std::io;
use std::time::Duration;

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use tracing::{debug, info, warn};

use crate::components::{
    Component, ComponentContext, HostToolbar, QuickMenuComponent, StatusBar,
};
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::keybindings::Action;
use crate::menu::QuickMenu;
use crate::nav::Activation;
use crate::navigator::Navigator;
use crate::state::AppState;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

const WHEEL_STEP: i32 = 3;

/// Everything on screen. Independent of the terminal so it can be driven
/// from tests with a plain `Buffer`.
#[derive(Debug)]
pub struct HelmApp {
    menu: QuickMenuComponent,
    toolbar: HostToolbar,
    status: StatusBar,
    state: AppState,
    pointer: Option<Position>,
    area: Rect,
}

impl HelmApp {
    pub fn new(menu: QuickMenu) -> Self {
        let toolbar = HostToolbar::new(menu.platform(), menu.toolbar_entries());
        let mut status = StatusBar::new();
        status.set_left(menu.config().site().base().as_str());
        status.set_right(format!(
            "F1 help  Ctrl+Q quit  {} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ));
        status.set_style(Style::default().bg(theme::toolbar_bg()).fg(theme::toolbar_fg()));
        Self {
            menu: QuickMenuComponent::new(menu),
            toolbar,
            status,
            state: AppState::new(),
            pointer: None,
            area: Rect::default(),
        }
    }

    pub fn menu(&self) -> &QuickMenuComponent {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut QuickMenuComponent {
        &mut self.menu
    }

    pub fn state(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn status(&self) -> &StatusBar {
        &self.status
    }

    /// Toolbar height at the width of the last frame.
    fn toolbar_height(&self) -> Option<u16> {
        self.toolbar.measure_height(self.area.width)
    }

    /// Run deferred work and draw one frame.
    pub fn draw(&mut self, frame: &mut UiFrame<'_>) {
        self.area = frame.area();
        let measured = self.toolbar_height();
        self.menu.menu_mut().run_pending(measured);

        let area = self.area;
        let toolbar_rows = measured.unwrap_or(0).min(area.height);
        let ctx = ComponentContext::default().with_pointer(self.pointer);

        let toolbar_area = Rect::new(area.x, area.y, area.width, toolbar_rows);
        self.toolbar.render(frame, toolbar_area, &ctx);

        let status_y = area.bottom().saturating_sub(1);
        let body = Rect::new(
            area.x,
            area.y + toolbar_rows,
            area.width,
            status_y.saturating_sub(area.y + toolbar_rows),
        );
        self.render_body(frame, body);
        if area.height > toolbar_rows {
            self.status
                .render(frame, Rect::new(area.x, status_y, area.width, 1), &ctx);
        }

        self.menu
            .render(frame, area, &ctx.with_overlay(true).with_focus(true));
    }

    fn render_body(&mut self, frame: &mut UiFrame<'_>, body: Rect) {
        if body.height == 0 {
            return;
        }
        let menu = self.menu.menu();
        let lines = [
            format!(
                "Press {} or click ≡ Menu to open the quick menu.",
                menu.platform().shortcut_label()
            ),
            String::new(),
            format!("Site: {}", menu.config().site().base()),
            format!(
                "{} sections, {} entries",
                menu.tree().sections().len(),
                menu.tree().all_cards().count()
            ),
        ];
        let scroll = self.state.body_scroll() as usize;
        let buffer = frame.buffer_mut();
        for (row, line) in lines.iter().skip(scroll).enumerate() {
            let y = body.y.saturating_add(1 + row as u16);
            if y >= body.bottom() {
                break;
            }
            safe_set_string(buffer, body, body.x + 2, y, line, theme::muted());
        }
    }

    /// Feed one input event. Returns the activation it produced, if any.
    pub fn handle_event(&mut self, event: &Event) -> Option<Activation> {
        let ctx = ComponentContext::new(true).with_pointer(self.pointer);
        match event {
            Event::Key(key) => {
                let bindings = self.menu.menu().bindings();
                if bindings.matches(Action::Quit, key) {
                    info!("quit requested");
                    self.state.request_quit();
                    return None;
                }
                if bindings.matches(Action::ToggleMouseCapture, key) {
                    let enabled = !self.state.mouse_capture_enabled();
                    self.state.set_mouse_capture_enabled(enabled);
                    debug!(enabled, "mouse capture toggled");
                    return None;
                }
                let measured = self.toolbar_height();
                self.menu.menu_mut().note_toolbar_height(measured);
                self.menu.handle_event(event, &ctx);
            }
            Event::Mouse(mouse) => {
                let pos = Position::new(mouse.column, mouse.row);
                self.pointer = Some(pos);
                if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                    && self.toolbar.hits_trigger(pos)
                {
                    let measured = self.toolbar_height();
                    self.menu.menu_mut().toggle(measured);
                    return None;
                }
                if !self.menu.handle_event(event, &ctx) && !self.menu.menu().visible() {
                    match mouse.kind {
                        MouseEventKind::ScrollUp => self.state.scroll_body(-WHEEL_STEP),
                        MouseEventKind::ScrollDown => self.state.scroll_body(WHEEL_STEP),
                        _ => {}
                    }
                }
            }
            Event::Resize(width, height) => {
                self.area = Rect::new(0, 0, *width, *height);
                let measured = self.toolbar_height();
                self.menu.menu_mut().remeasure_toolbar(measured);
            }
            _ => {
                self.menu.handle_event(event, &ctx);
            }
        }
        let activation = self.menu.take_activation()?;
        let url = activation.resolve(self.menu.menu().config().site());
        self.status.set_left(url);
        Some(activation)
    }

    pub fn quit_requested(&self) -> bool {
        self.state.quit_requested()
    }
}

/// Drive `app` until quit, handing activations to `navigator`.
pub fn run_app<D, O, N>(
    input: D,
    output: &mut O,
    app: &mut HelmApp,
    navigator: &mut N,
    poll_interval: Duration,
) -> io::Result<()>
where
    D: InputDriver,
    O: OutputDriver,
    N: Navigator + ?Sized,
{
    let mut event_loop = EventLoop::new(input, poll_interval);
    event_loop
        .driver()
        .set_mouse_capture(app.state.mouse_capture_enabled())?;

    event_loop.run(|driver, event| {
        let flow = match event {
            None => {
                if app.quit_requested() {
                    return Ok(ControlFlow::Quit);
                }
                output.draw(|mut frame| app.draw(&mut frame))?;
                ControlFlow::Continue
            }
            Some(event) => match app.handle_event(&event) {
                Some(activation) => {
                    let url = activation.resolve(app.menu.menu().config().site());
                    navigator.navigate(&url, &activation)?
                }
                None if app.quit_requested() => ControlFlow::Quit,
                None => ControlFlow::Continue,
            },
        };
        sync_mouse_capture(driver, &mut app.state);
        Ok(flow)
    })
}

/// Push a pending capture change to the terminal. A failed change is
/// logged and the state reverted so it keeps matching the terminal.
fn sync_mouse_capture<D: InputDriver>(driver: &mut D, state: &mut AppState) {
    let Some(enabled) = state.take_mouse_capture_change() else {
        return;
    };
    if let Err(err) = driver.set_mouse_capture(enabled) {
        warn!(%err, enabled, "mouse capture change failed");
        state.restore_mouse_capture(!enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    use crate::config::HelmConfig;
    use crate::keybindings::{KeyBindings, Platform};
    use crate::model::{Icon, NavigationItem, Section, SectionKind};
    use crate::view_state::ViewStore;

    fn app() -> HelmApp {
        let items = vec![
            NavigationItem::new("menu-pages", "Pages", "edit.php?post_type=page", Icon::Generic, vec![])
                .unwrap(),
        ];
        let toolbar = vec![
            NavigationItem::new("wp-admin-bar-site-name", "My Site", "/", Icon::Generic, vec![])
                .unwrap(),
        ];
        let menu = QuickMenu::from_sections(
            HelmConfig::default().freeze(),
            &[Section {
                kind: SectionKind::System,
                items,
            }],
            toolbar,
            Vec::new(),
            ViewStore::ephemeral(),
            KeyBindings::for_platform(Platform::Other),
        );
        HelmApp::new(menu)
    }

    fn draw(app: &mut HelmApp, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        app.draw(&mut UiFrame::from_parts(area, &mut buf));
        buf
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn trigger_click_opens_and_enter_resolves_against_site() {
        let mut app = app();
        draw(&mut app, Rect::new(0, 0, 100, 30));
        assert!(app.handle_event(&click(2, 0)).is_none());
        assert!(app.menu().menu().visible());

        let right = Event::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL));
        app.handle_event(&right);
        let enter = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        let activation = app.handle_event(&enter).unwrap();
        assert_eq!(activation.href, "edit.php?post_type=page");
        assert_eq!(
            app.status().left(),
            "http://localhost/edit.php?post_type=page"
        );
        assert!(!app.menu().menu().visible());
    }

    #[test]
    fn ctrl_q_requests_quit() {
        let mut app = app();
        app.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.quit_requested());
    }

    #[test]
    fn resize_repins_open_overlay_below_wrapped_toolbar() {
        let mut app = app();
        draw(&mut app, Rect::new(0, 0, 100, 30));
        app.handle_event(&click(2, 0));
        draw(&mut app, Rect::new(0, 0, 100, 30));
        assert_eq!(app.menu().menu().pinned_toolbar_height(), 1);

        app.handle_event(&Event::Resize(20, 30));
        assert_eq!(app.menu().menu().pinned_toolbar_height(), 2);
    }

    #[test]
    fn shortcut_opens_below_the_toolbar_as_laid_out() {
        let mut app = app();
        draw(&mut app, Rect::new(0, 0, 20, 30));
        app.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('>'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        )));
        assert!(app.menu().menu().visible());
        assert_eq!(app.menu().menu().pinned_toolbar_height(), 2);
    }

    struct NoMouse;

    impl InputDriver for NoMouse {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(false)
        }

        fn read(&mut self) -> io::Result<Event> {
            Err(io::Error::other("no input"))
        }

        fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
            Err(io::Error::other("capture unsupported"))
        }
    }

    #[test]
    fn failed_capture_change_reverts_state() {
        let mut app = app();
        app.handle_event(&Event::Key(KeyEvent::new(KeyCode::F(12), KeyModifiers::NONE)));
        sync_mouse_capture(&mut NoMouse, app.state());
        assert!(app.state().mouse_capture_enabled());
        assert_eq!(app.state().take_mouse_capture_change(), None);
    }

    #[test]
    fn f12_flips_mouse_capture_once() {
        let mut app = app();
        app.handle_event(&Event::Key(KeyEvent::new(KeyCode::F(12), KeyModifiers::NONE)));
        assert_eq!(app.state().take_mouse_capture_change(), Some(false));
        assert_eq!(app.state().take_mouse_capture_change(), None);
    }
}
