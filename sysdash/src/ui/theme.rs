//! Shared UI theme constants.

use ratatui::style::{Color, Modifier, Style};

use crate::status::StatusKind;
use crate::view::{Band, Highlight};

pub const BAND_LOW: Color = Color::Green;
pub const BAND_MEDIUM: Color = Color::Yellow;
pub const BAND_HIGH: Color = Color::Red;

pub const CPU_LINE: Color = Color::Cyan;
pub const MEM_LINE: Color = Color::Magenta;
pub const TABLE_HEADER: Color = Color::Cyan;
pub const DIM: Color = Color::DarkGray;

pub fn band_color(band: Band) -> Color {
    match band {
        Band::Low => BAND_LOW,
        Band::Medium => BAND_MEDIUM,
        Band::High => BAND_HIGH,
    }
}

pub fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Connected => Color::Green,
        StatusKind::Connecting => Color::Yellow,
        StatusKind::Disconnected => Color::Red,
    }
}

pub fn highlight_style(h: Highlight) -> Style {
    match h {
        Highlight::High => Style::default().fg(BAND_HIGH).add_modifier(Modifier::BOLD),
        Highlight::Medium => Style::default().fg(BAND_MEDIUM),
        Highlight::None => Style::default(),
    }
}
