//! View projection: a pure function from store state to render-ready data.
//!
//! Nothing here reads the clock or keeps state between calls; the same
//! [`StoreState`] and [`ProjectionPolicy`] always produce the same [`ViewModel`].

use std::cmp::Ordering;

use chrono::{DateTime, Local};

use crate::history::TimeSeries;
use crate::store::StoreState;
use crate::types::{MemoryBreakdown, ProcessRow};

/// Severity band shared by core bars and the memory gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Medium,
    High,
}

impl Band {
    /// `< 50` low, `50..=80` medium, `> 80` high.
    pub fn from_percent(pct: f64) -> Self {
        if pct > 80.0 {
            Band::High
        } else if pct >= 50.0 {
            Band::Medium
        } else {
            Band::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Medium,
    High,
}

impl Highlight {
    pub fn for_cpu(cpu_percent: f64) -> Self {
        if cpu_percent > 50.0 {
            Highlight::High
        } else if cpu_percent > 20.0 {
            Highlight::Medium
        } else {
            Highlight::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessSort {
    #[default]
    CpuDesc,
    MemDesc,
}

impl ProcessSort {
    pub fn column(self) -> &'static str {
        match self {
            ProcessSort::CpuDesc => "cpu",
            ProcessSort::MemDesc => "mem",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectionPolicy {
    /// Drop cores reporting exactly 0% from the bar list.
    pub hide_idle_cores: bool,
    pub sort: ProcessSort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoreBar {
    pub index: usize,
    pub percent: f64,
    pub band: Band,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryGauge {
    pub used_percent: f64,
    pub free_percent: f64,
    pub band: Band,
    pub total: String,
    pub used: String,
    pub available: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRowView {
    pub pid: u32,
    pub name: String,
    pub cpu: String,
    pub memory: String,
    pub state: String,
    pub priority: i64,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Chart data: oldest point first, never longer than `max_len`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineSeries {
    pub points: Vec<SeriesPoint>,
    pub max_len: usize,
}

impl LineSeries {
    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn last(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub core_bars: Vec<CoreBar>,
    pub memory_gauge: MemoryGauge,
    pub process_rows: Vec<ProcessRowView>,
    pub sort: ProcessSort,
    pub cpu_series: LineSeries,
    pub memory_series: LineSeries,
    pub last_update: Option<String>,
}

pub fn project(state: &StoreState, policy: &ProjectionPolicy) -> ViewModel {
    ViewModel {
        core_bars: core_bars(state.latest_cpu_per_core(), policy.hide_idle_cores),
        memory_gauge: memory_gauge(state.latest_memory()),
        process_rows: process_rows(state.latest_processes(), policy.sort),
        sort: policy.sort,
        cpu_series: series(state.cpu_history()),
        memory_series: series(state.memory_history()),
        last_update: state.last_update().map(|t| time_label(&t)),
    }
}

fn core_bars(per_core: &[f64], hide_idle: bool) -> Vec<CoreBar> {
    per_core
        .iter()
        .enumerate()
        .filter(|(_, pct)| !(hide_idle && **pct == 0.0))
        .map(|(index, &percent)| CoreBar {
            index,
            percent,
            band: Band::from_percent(percent),
        })
        .collect()
}

fn memory_gauge(m: &MemoryBreakdown) -> MemoryGauge {
    let used_percent = m.used_percent();
    MemoryGauge {
        used_percent,
        free_percent: 100.0 - used_percent,
        band: Band::from_percent(used_percent),
        total: format_gb(m.total_bytes),
        used: format_gb(m.used_bytes),
        available: format_gb(m.available_bytes),
    }
}

fn process_rows(procs: &[ProcessRow], sort: ProcessSort) -> Vec<ProcessRowView> {
    // sort_by is stable: equal keys keep arrival order
    let mut idxs: Vec<usize> = (0..procs.len()).collect();
    match sort {
        ProcessSort::CpuDesc => idxs.sort_by(|&a, &b| {
            procs[b]
                .cpu_percent
                .partial_cmp(&procs[a].cpu_percent)
                .unwrap_or(Ordering::Equal)
        }),
        ProcessSort::MemDesc => idxs.sort_by(|&a, &b| {
            procs[b]
                .memory_percent
                .partial_cmp(&procs[a].memory_percent)
                .unwrap_or(Ordering::Equal)
        }),
    }

    idxs.into_iter()
        .map(|ix| {
            let p = &procs[ix];
            ProcessRowView {
                pid: p.pid,
                name: p.name.clone(),
                cpu: format!("{:.1}%", p.cpu_percent),
                memory: format!("{:.1}%", p.memory_percent),
                state: p.state.label().to_string(),
                priority: p.priority,
                highlight: Highlight::for_cpu(p.cpu_percent),
            }
        })
        .collect()
}

fn series(ts: &TimeSeries<f64>) -> LineSeries {
    LineSeries {
        points: ts
            .iter()
            .map(|(at, v)| SeriesPoint {
                label: time_label(at),
                value: *v,
            })
            .collect(),
        max_len: ts.capacity(),
    }
}

pub fn time_label(at: &DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// Binary gigabytes, two decimals: `1073741824` -> `"1.00 GB"`.
pub fn format_gb(bytes: u64) -> String {
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
    format!("{:.2} GB", bytes as f64 / GIB)
}
