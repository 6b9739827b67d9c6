use ratatui::style::{Color, Modifier, Style};

// Centralized palette. xterm-256 indices approximating the admin colour
// scheme: toolbar #1d2327, accent #2271b1, highlight #f0c33c.

pub fn accent() -> Color {
    Color::Indexed(25)
}

pub fn highlight() -> Color {
    Color::Indexed(221)
}

pub fn text() -> Color {
    Color::White
}

// Host toolbar
pub fn toolbar_bg() -> Color {
    Color::Indexed(235)
}
pub fn toolbar_fg() -> Color {
    Color::Gray
}
pub fn toolbar_trigger() -> Style {
    Style::default()
        .fg(text())
        .bg(accent())
        .add_modifier(Modifier::BOLD)
}

// Overlay panel
pub fn panel_bg() -> Color {
    Color::Indexed(236)
}
pub fn panel_border() -> Color {
    Color::DarkGray
}
pub fn section_title() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD)
}
pub fn input_bg() -> Color {
    Color::Indexed(238)
}
pub fn button() -> Style {
    Style::default().fg(text()).bg(Color::Indexed(239))
}
pub fn button_active() -> Style {
    Style::default().fg(text()).bg(accent())
}

// Cards
pub fn card_bg() -> Color {
    Color::Indexed(237)
}
pub fn card_active_bg() -> Color {
    accent()
}
pub fn card_border() -> Color {
    Color::Indexed(240)
}
pub fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}
pub fn dimmed() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM)
}
pub fn match_highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(highlight())
        .add_modifier(Modifier::BOLD)
}
pub fn sub_active() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Gray)
        .add_modifier(Modifier::BOLD)
}
pub fn external_marker() -> Style {
    Style::default().fg(Color::Indexed(75))
}
pub fn cursor() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

// Dialog
pub fn dialog_bg() -> Color {
    Color::Black
}
pub fn dialog_fg() -> Color {
    Color::White
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_card_uses_accent() {
        assert_eq!(card_active_bg(), accent());
        assert_ne!(card_bg(), card_active_bg());
    }
}
