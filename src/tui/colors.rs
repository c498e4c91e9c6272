use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(124, 58, 237);
pub const HEADER_BG: Color = Color::Rgb(40, 40, 50);
pub const CARD_SELECTED_BG: Color = Color::Rgb(45, 38, 70);
pub const ENDPOINT_BG: Color = Color::Rgb(30, 30, 40);

/// Matched part of an app name
pub fn match_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn name_style(selected: bool) -> Style {
    let style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    if selected {
        style.bg(CARD_SELECTED_BG)
    } else {
        style
    }
}

pub fn card_border(selected: bool) -> Style {
    if selected {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn endpoint_style() -> Style {
    Style::default().fg(Color::Cyan).bg(ENDPOINT_BG)
}

pub fn copy_button(copied: bool) -> Style {
    if copied {
        Style::default()
            .fg(Color::White)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).bg(ACCENT)
    }
}

pub fn open_button() -> Style {
    Style::default().fg(Color::White).bg(Color::Blue)
}

pub fn muted() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}
