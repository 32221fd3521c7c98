use crate::models::{Cell, TtxColor};
use ratatui::style::{Color, Modifier, Style};

/// Map a teletext palette entry to a terminal color.
pub fn terminal_color(color: TtxColor) -> Color {
    match color {
        TtxColor::Black => Color::Black,
        TtxColor::Red => Color::Red,
        TtxColor::Green => Color::Green,
        TtxColor::Yellow => Color::Yellow,
        TtxColor::Blue => Color::Blue,
        TtxColor::Magenta => Color::Magenta,
        TtxColor::Cyan => Color::Cyan,
        TtxColor::White => Color::White,
    }
}

pub fn cell_style(cell: &Cell) -> Style {
    Style::default()
        .fg(terminal_color(cell.fg))
        .bg(terminal_color(cell.bg))
}

pub fn status() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn pending_input() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn link() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}
