//! Metrics store: bounded CPU/memory history plus the latest point-in-time values.
//!
//! Pure state, no I/O. The only mutation is [`MetricsStore::ingest`]; readers get a
//! shared borrow of [`StoreState`], so the buffers cannot be changed from outside.

use chrono::{DateTime, Local};

use crate::history::{TimeSeries, DEFAULT_HISTORY_LEN};
use crate::types::{MemoryBreakdown, MetricsSnapshot, ProcessRow};

#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    cpu_history: TimeSeries<f64>,
    memory_history: TimeSeries<f64>,
    latest_cpu_per_core: Vec<f64>,
    latest_memory: MemoryBreakdown,
    latest_processes: Vec<ProcessRow>,
    last_update: Option<DateTime<Local>>,
    ingested: u64,
}

impl StoreState {
    pub fn cpu_history(&self) -> &TimeSeries<f64> {
        &self.cpu_history
    }

    pub fn memory_history(&self) -> &TimeSeries<f64> {
        &self.memory_history
    }

    pub fn latest_cpu_per_core(&self) -> &[f64] {
        &self.latest_cpu_per_core
    }

    pub fn latest_memory(&self) -> &MemoryBreakdown {
        &self.latest_memory
    }

    pub fn latest_processes(&self) -> &[ProcessRow] {
        &self.latest_processes
    }

    /// Receipt time of the most recent snapshot.
    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    pub fn ingested(&self) -> u64 {
        self.ingested
    }
}

#[derive(Debug)]
pub struct MetricsStore {
    state: StoreState,
}

impl MetricsStore {
    pub fn new(history_len: usize) -> Self {
        Self {
            state: StoreState {
                cpu_history: TimeSeries::new(history_len),
                memory_history: TimeSeries::new(history_len),
                latest_cpu_per_core: Vec::new(),
                latest_memory: MemoryBreakdown::default(),
                latest_processes: Vec::new(),
                last_update: None,
                ingested: 0,
            },
        }
    }

    /// Apply one snapshot atomically. Latest values are replaced wholesale, never merged.
    pub fn ingest(&mut self, snapshot: MetricsSnapshot) {
        let s = &mut self.state;
        let at = snapshot.timestamp;
        s.cpu_history.push(at, snapshot.cpu_average);
        s.memory_history.push(at, snapshot.memory.used_percent());
        s.latest_cpu_per_core = snapshot.cpu_per_core;
        s.latest_memory = snapshot.memory;
        s.latest_processes = snapshot.processes;
        s.last_update = Some(at);
        s.ingested += 1;
    }

    pub fn snapshot(&self) -> &StoreState {
        &self.state
    }
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}
