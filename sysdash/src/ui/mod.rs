//! Terminal dashboard: a [`RenderSink`] that draws every panel with ratatui.

pub mod cpu;
pub mod header;
pub mod help;
pub mod input;
pub mod mem;
pub mod processes;
pub mod theme;
pub mod util;

use std::io::{self, Stdout};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    widgets::TableState,
    Terminal,
};

use crate::sink::{RenderSink, SeriesKind, ViewCommand};
use crate::status::StatusIndicator;
use crate::view::{CoreBar, MemoryGauge, ProcessRowView, ProcessSort};

use self::cpu::{draw_cpu_avg_graph, draw_per_core_bars};
use self::header::draw_header;
use self::help::draw_help;
use self::mem::{draw_mem, draw_mem_history};
use self::processes::{draw_processes, move_selection};

/// Everything the panels draw from; filled by the sink's update calls.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub endpoint: String,
    pub status: Option<StatusIndicator>,
    pub last_seen: Option<String>,
    pub cpu: Vec<f64>,
    pub mem: Vec<f64>,
    pub mem_labels: Vec<String>,
    pub cores: Vec<CoreBar>,
    pub gauge: Option<MemoryGauge>,
    pub rows: Vec<ProcessRowView>,
    pub sort: ProcessSort,
    /// Selected process row and the table's scroll offset.
    pub table: TableState,
    pub show_help: bool,
}

pub struct TuiSink<B: Backend> {
    terminal: Terminal<B>,
    dash: Dashboard,
}

impl<B: Backend> TuiSink<B> {
    pub fn new(terminal: Terminal<B>, endpoint: &str) -> Self {
        Self {
            terminal,
            dash: Dashboard {
                endpoint: endpoint.to_string(),
                ..Dashboard::default()
            },
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dash
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn into_terminal(self) -> Terminal<B> {
        self.terminal
    }
}

impl<B: Backend> RenderSink for TuiSink<B> {
    fn update_series(&mut self, kind: SeriesKind, labels: &[String], values: &[f64], _max_len: usize) {
        match kind {
            SeriesKind::Cpu => self.dash.cpu = values.to_vec(),
            SeriesKind::Memory => {
                self.dash.mem = values.to_vec();
                self.dash.mem_labels = labels.to_vec();
            }
        }
    }

    fn update_cores(&mut self, bars: &[CoreBar]) {
        self.dash.cores = bars.to_vec();
    }

    fn update_gauge(&mut self, gauge: &MemoryGauge) {
        self.dash.gauge = Some(gauge.clone());
    }

    fn update_table(&mut self, rows: &[ProcessRowView], sort: ProcessSort) {
        self.dash.rows = rows.to_vec();
        self.dash.sort = sort;
    }

    fn update_status(&mut self, status: &StatusIndicator) {
        self.dash.status = Some(status.clone());
    }

    fn update_last_seen(&mut self, label: Option<&str>) {
        self.dash.last_seen = label.map(str::to_string);
    }

    fn view_command(&mut self, cmd: ViewCommand) {
        match cmd {
            ViewCommand::ToggleHelp => self.dash.show_help = !self.dash.show_help,
            other => move_selection(&mut self.dash.table, other, self.dash.rows.len()),
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        let dash = &mut self.dash;
        self.terminal.draw(|f| draw(f, dash))?;
        Ok(())
    }
}

pub fn draw(f: &mut ratatui::Frame<'_>, d: &mut Dashboard) {
    let area = f.area();

    // Root rows: header, top (cpu avg + per-core), memory gauge, memory history, processes
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),   // header
            Constraint::Ratio(1, 3), // top row
            Constraint::Length(3),   // memory gauge
            Constraint::Length(5),   // memory history
            Constraint::Min(6),      // processes
        ])
        .split(area);

    draw_header(f, rows[0], d);

    let top_lr = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
        .split(rows[1]);
    draw_cpu_avg_graph(f, top_lr[0], d);
    draw_per_core_bars(f, top_lr[1], d);

    draw_mem(f, rows[2], d);
    draw_mem_history(f, rows[3], d);
    draw_processes(f, rows[4], d);

    if d.show_help {
        draw_help(f, area);
    }
}

pub type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode + alternate screen.
pub fn enter_terminal() -> io::Result<CrosstermTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

pub fn leave_terminal(terminal: &mut CrosstermTerminal) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}
