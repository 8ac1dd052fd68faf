//! CPU average sparkline + per-core meters.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
};

use crate::ui::theme::{band_color, CPU_LINE};
use crate::ui::util::inner;
use crate::ui::Dashboard;

pub fn draw_cpu_avg_graph(f: &mut ratatui::Frame<'_>, area: Rect, d: &Dashboard) {
    let title = match d.cpu.last() {
        Some(now) => format!("CPU avg (now: {now:>5.1}%)"),
        None => "CPU avg".into(),
    };
    let max_points = area.width.saturating_sub(2) as usize;
    let start = d.cpu.len().saturating_sub(max_points);
    let data: Vec<u64> = d.cpu.iter().skip(start).map(|v| v.round() as u64).collect();
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&data)
        .max(100)
        .style(Style::default().fg(CPU_LINE));
    f.render_widget(spark, area);
}

pub fn draw_per_core_bars(f: &mut ratatui::Frame<'_>, area: Rect, d: &Dashboard) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Per-core"), area);
    let inner = inner(area);
    if inner.height == 0 || d.cores.is_empty() {
        return;
    }

    let show_n = (inner.height as usize).min(d.cores.len());
    let constraints: Vec<Constraint> = (0..show_n).map(|_| Constraint::Length(1)).collect();
    let vchunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (bar, rect) in d.cores.iter().zip(vchunks.iter()) {
        let fg = band_color(bar.band);
        // "cpuNN [" + meter + "] NNN.N%"
        let meter_w = (rect.width as usize).saturating_sub(16).max(1);
        let filled = ((bar.percent / 100.0) * meter_w as f64).round() as usize;
        let filled = filled.min(meter_w);
        let line = Line::from(vec![
            Span::raw(format!("cpu{:<2} [", bar.index)),
            Span::styled("|".repeat(filled), Style::default().fg(fg)),
            Span::raw(" ".repeat(meter_w - filled)),
            Span::raw("] "),
            Span::styled(
                format!("{:>5.1}%", bar.percent),
                Style::default().fg(fg).add_modifier(Modifier::BOLD),
            ),
        ]);
        f.render_widget(Paragraph::new(line), *rect);
    }
}
