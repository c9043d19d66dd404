use ratatui::style::{Color, Modifier, Style};

const FOREGROUND: Color = Color::Rgb(0xf8, 0xf8, 0xf2);
const CYAN: Color = Color::Rgb(0x8b, 0xe9, 0xfd);
const GREEN: Color = Color::Rgb(0x50, 0xfa, 0x7b);
const RED: Color = Color::Rgb(0xff, 0x55, 0x55);
const YELLOW: Color = Color::Rgb(0xf1, 0xfa, 0x8c);
pub const BACKGROUND: Color = Color::Rgb(0x12, 0x12, 0x12);

/// `user@host`
pub fn user() -> Style {
    Style::default().fg(CYAN)
}

pub fn path() -> Style {
    Style::default().fg(GREEN)
}

/// `:` and `$` around the path.
pub fn punct() -> Style {
    Style::default().fg(FOREGROUND)
}

pub fn command() -> Style {
    Style::default().fg(FOREGROUND).add_modifier(Modifier::BOLD)
}

pub fn output() -> Style {
    Style::default().fg(FOREGROUND)
}

pub fn welcome() -> Style {
    Style::default().fg(GREEN)
}

pub fn error() -> Style {
    Style::default().fg(RED)
}

pub fn title() -> Style {
    Style::default().fg(FOREGROUND).add_modifier(Modifier::BOLD)
}

pub fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// The three window buttons in the title bar.
pub fn buttons() -> [Style; 3] {
    [
        Style::default().fg(RED),
        Style::default().fg(YELLOW),
        Style::default().fg(GREEN),
    ]
}
