//! Help overlay.

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::util::centered;

const HELP: [&str; 11] = [
    "q / Esc      quit",
    "r            reconnect",
    "d            disconnect",
    "c            sort processes by CPU",
    "m            sort processes by memory",
    "i            show/hide idle cores",
    "Up / Down    move process selection",
    "PgUp / PgDn  move a page",
    "Home / End   first / last process",
    "h            show/hide this help",
    "",
];

pub fn draw_help(f: &mut ratatui::Frame<'_>, area: Rect) {
    let width = HELP.iter().map(|l| l.len()).max().unwrap_or(0) as u16 + 4;
    let height = HELP.len() as u16 + 2;
    let rect = centered(area, width, height);
    let lines: Vec<Line> = HELP.iter().map(|l| Line::from(*l)).collect();
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help")),
        rect,
    );
}
