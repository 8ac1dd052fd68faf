//! Memory gauge and memory history sparkline.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge, Sparkline},
};

use crate::ui::theme::{band_color, MEM_LINE};
use crate::ui::Dashboard;

pub fn draw_mem(f: &mut ratatui::Frame<'_>, area: Rect, d: &Dashboard) {
    let block = Block::default().borders(Borders::ALL).title("Memory");
    let Some(g) = &d.gauge else {
        f.render_widget(block, area);
        return;
    };
    let pct = g.used_percent.clamp(0.0, 100.0).round() as u16;
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(band_color(g.band)))
        .percent(pct)
        .label(format!(
            "{:.1}% used — {} / {} ({} available, {:.1}% free)",
            g.used_percent, g.used, g.total, g.available, g.free_percent
        ));
    f.render_widget(gauge, area);
}

pub fn draw_mem_history(f: &mut ratatui::Frame<'_>, area: Rect, d: &Dashboard) {
    let max_points = area.width.saturating_sub(2) as usize;
    let start = d.mem.len().saturating_sub(max_points);
    let data: Vec<u64> = d.mem.iter().skip(start).map(|v| v.round() as u64).collect();
    let title = match (d.mem_labels.first(), d.mem_labels.last()) {
        (Some(from), Some(to)) => format!("Memory % ({from} – {to})"),
        _ => "Memory %".into(),
    };
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&data)
        .max(100)
        .style(Style::default().fg(MEM_LINE));
    f.render_widget(spark, area);
}
