//! Types that mirror the collector's JSON schema, and the typed snapshot they decode into.

use chrono::{DateTime, Local};
use serde::Deserialize;

// ---------- Wire mirror (untyped edges, only seen by the codec) ----------

#[derive(Debug, Deserialize, Clone)]
pub struct WireMemory {
    pub total: f64,
    pub used: f64,
    #[serde(default)]
    pub free: Option<f64>,
    #[serde(default)]
    pub available: Option<f64>,
    #[serde(default)]
    pub cached: Option<f64>,
    // pre-rendered strings from the collector; we format bytes ourselves
    #[serde(default)]
    pub total_formatted: Option<String>,
    #[serde(default)]
    pub used_formatted: Option<String>,
    #[serde(default)]
    pub free_formatted: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireProcess {
    pub pid: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub memory_usage: f64,
    // string ("running", "R") or the kernel's integer task state
    #[serde(default)]
    pub state: serde_json::Value,
    #[serde(default)]
    pub priority: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireMessage {
    #[serde(default)]
    pub cpu_usage: Vec<f64>,
    #[serde(default)]
    pub cpu_average: Option<f64>,
    pub memory: WireMemory,
    pub processes: Vec<WireProcess>,
}

// ---------- Typed snapshot ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryBreakdown {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub available_bytes: u64,
    pub cached_bytes: u64,
}

impl MemoryBreakdown {
    /// Used share of total in percent; 0 when total is unknown.
    pub fn used_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        // multiply first: whole percentages stay exact
        self.used_bytes as f64 * 100.0 / self.total_bytes as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProcessState {
    Running,
    Sleeping,
    DiskSleep,
    Stopped,
    Traced,
    Zombie,
    Dead,
    Idle,
    #[default]
    Unknown,
    Other(String),
}

impl ProcessState {
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "running" => Self::Running,
            "s" | "sleeping" => Self::Sleeping,
            "d" | "disk-sleep" | "disk sleep" | "uninterruptible" => Self::DiskSleep,
            "t" | "stopped" => Self::Stopped,
            "t (tracing stop)" | "traced" | "tracing-stop" => Self::Traced,
            "z" | "zombie" => Self::Zombie,
            "x" | "dead" => Self::Dead,
            "i" | "idle" => Self::Idle,
            "" => Self::Unknown,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    /// Linux task state bits as the kernel module reports them.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Running,
            1 => Self::Sleeping,
            2 => Self::DiskSleep,
            4 => Self::Stopped,
            8 => Self::Traced,
            16 => Self::Dead,
            32 => Self::Zombie,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Running => "running",
            Self::Sleeping => "sleeping",
            Self::DiskSleep => "disk-sleep",
            Self::Stopped => "stopped",
            Self::Traced => "traced",
            Self::Zombie => "zombie",
            Self::Dead => "dead",
            Self::Idle => "idle",
            Self::Unknown => "unknown",
            Self::Other(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub state: ProcessState,
    pub priority: i64,
}

/// One complete reading, immutable once decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub cpu_per_core: Vec<f64>,
    pub cpu_average: f64,
    pub memory: MemoryBreakdown,
    pub processes: Vec<ProcessRow>,
    // stamped on receipt, never taken from the wire
    pub timestamp: DateTime<Local>,
}
