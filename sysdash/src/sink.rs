//! Render sink boundary. Chart, gauge and table consumers implement [`RenderSink`];
//! the coordinator calls it with a complete [`ViewModel`] after every ingest, never
//! concurrently.

use std::io;

use tracing::info;

use crate::status::StatusIndicator;
use crate::view::{CoreBar, MemoryGauge, ProcessRowView, ProcessSort, ViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Cpu,
    Memory,
}

/// Presentation-only commands; they never touch the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    ToggleHelp,
    SelectBy(isize),
    SelectFirst,
    SelectLast,
}

pub trait RenderSink {
    /// Replace a line chart. `labels` and `values` have equal length, at most `max_len`.
    fn update_series(&mut self, kind: SeriesKind, labels: &[String], values: &[f64], max_len: usize);

    fn update_cores(&mut self, bars: &[CoreBar]);

    fn update_gauge(&mut self, gauge: &MemoryGauge);

    /// Replace all rows. Rows arrive already ordered by `sort`.
    fn update_table(&mut self, rows: &[ProcessRowView], sort: ProcessSort);

    fn update_status(&mut self, status: &StatusIndicator);

    fn update_last_seen(&mut self, _label: Option<&str>) {}

    fn view_command(&mut self, _cmd: ViewCommand) {}

    fn redraw(&mut self) -> io::Result<()>;

    fn render(&mut self, view: &ViewModel) -> io::Result<()> {
        let cpu = &view.cpu_series;
        self.update_series(SeriesKind::Cpu, &cpu.labels(), &cpu.values(), cpu.max_len);
        let mem = &view.memory_series;
        self.update_series(SeriesKind::Memory, &mem.labels(), &mem.values(), mem.max_len);
        self.update_cores(&view.core_bars);
        self.update_gauge(&view.memory_gauge);
        self.update_table(&view.process_rows, view.sort);
        self.update_last_seen(view.last_update.as_deref());
        self.redraw()
    }
}

/// Headless sink: writes a one-line summary per update through `tracing`.
#[derive(Debug, Default)]
pub struct LogSink {
    cpu_now: Option<f64>,
    mem_now: Option<f64>,
    cores: usize,
    processes: usize,
    top: Option<(u32, String, String)>,
    dirty: bool,
}

impl RenderSink for LogSink {
    fn update_series(&mut self, kind: SeriesKind, _labels: &[String], values: &[f64], _max_len: usize) {
        let last = values.last().copied();
        match kind {
            SeriesKind::Cpu => self.cpu_now = last,
            SeriesKind::Memory => self.mem_now = last,
        }
        self.dirty = true;
    }

    fn update_cores(&mut self, bars: &[CoreBar]) {
        self.cores = bars.len();
    }

    fn update_gauge(&mut self, _gauge: &MemoryGauge) {}

    fn update_table(&mut self, rows: &[ProcessRowView], _sort: ProcessSort) {
        self.processes = rows.len();
        self.top = rows.first().map(|r| (r.pid, r.name.clone(), r.cpu.clone()));
    }

    fn update_status(&mut self, status: &StatusIndicator) {
        info!(status = status.kind.label(), "{}", status.text);
    }

    fn redraw(&mut self) -> io::Result<()> {
        if !std::mem::take(&mut self.dirty) {
            return Ok(());
        }
        let (top_pid, top_name, top_cpu) = self.top.clone().unwrap_or_default();
        info!(
            cpu_avg = self.cpu_now.unwrap_or(0.0),
            mem_used = self.mem_now.unwrap_or(0.0),
            cores = self.cores,
            processes = self.processes,
            top_pid,
            top_name = %top_name,
            top_cpu = %top_cpu,
            "snapshot"
        );
        Ok(())
    }
}
