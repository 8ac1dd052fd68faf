//! Top header with the connection status indicator.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use crate::ui::theme::{status_color, DIM};
use crate::ui::util::truncate_middle;
use crate::ui::Dashboard;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, d: &Dashboard) {
    let mut spans = vec![Span::raw("sysdash — ")];
    match &d.status {
        Some(st) => spans.push(Span::styled(
            format!("● {}", st.text),
            Style::default()
                .fg(status_color(st.kind))
                .add_modifier(Modifier::BOLD),
        )),
        None => spans.push(Span::raw("starting...")),
    }
    let endpoint = truncate_middle(&d.endpoint, (area.width as usize / 3).max(8));
    spans.push(Span::raw(format!(" | {endpoint}")));
    if let Some(ts) = &d.last_seen {
        spans.push(Span::raw(format!(" | last update {ts}")));
    }
    spans.push(Span::styled(
        "  (press 'q' to quit, 'h' for help)",
        Style::default().fg(DIM),
    ));
    f.render_widget(
        Block::default()
            .title(Line::from(spans))
            .borders(Borders::BOTTOM),
        area,
    );
}
