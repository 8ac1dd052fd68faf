//! Snapshot codec: validates one inbound text message into a typed [`MetricsSnapshot`].
//!
//! Structural problems (not JSON, missing `memory.total`/`memory.used`/`processes`,
//! non-numeric fields, negative byte counts) are rejected. Numeric values that are
//! merely out of range are clamped instead: CPU percentages into `0..=100`, `used`
//! and `free` down to `total`, per-process percentages up to zero.

use std::collections::HashSet;

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::error::DecodeError;
use crate::types::{
    MemoryBreakdown, MetricsSnapshot, ProcessRow, ProcessState, WireMemory, WireMessage,
    WireProcess,
};

/// Decode a message, stamping it with the current local time.
pub fn decode(raw: &str) -> Result<MetricsSnapshot, DecodeError> {
    decode_at(raw, Local::now())
}

/// Decode a message received at `received_at`. Pure.
pub fn decode_at(raw: &str, received_at: DateTime<Local>) -> Result<MetricsSnapshot, DecodeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let wire: WireMessage =
        serde_json::from_value(value).map_err(|e| DecodeError::SchemaViolation(e.to_string()))?;

    let cpu_per_core: Vec<f64> = wire.cpu_usage.iter().map(|v| clamp_pct(*v)).collect();
    let cpu_average = match wire.cpu_average {
        Some(avg) => clamp_pct(avg),
        None if cpu_per_core.is_empty() => {
            return Err(DecodeError::SchemaViolation(
                "cpu_usage is empty and no cpu_average was supplied".into(),
            ))
        }
        None => cpu_per_core.iter().sum::<f64>() / cpu_per_core.len() as f64,
    };

    Ok(MetricsSnapshot {
        cpu_per_core,
        cpu_average,
        memory: decode_memory(&wire.memory)?,
        processes: decode_processes(wire.processes),
        timestamp: received_at,
    })
}

fn decode_memory(m: &WireMemory) -> Result<MemoryBreakdown, DecodeError> {
    let total = bytes("memory.total", m.total)?;
    let used = bytes("memory.used", m.used)?.min(total);
    let free = match m.free {
        Some(v) => bytes("memory.free", v)?.min(total),
        None => total - used,
    };
    let available = match m.available {
        Some(v) => bytes("memory.available", v)?.min(total),
        None => free,
    };
    let cached = match m.cached {
        Some(v) => bytes("memory.cached", v)?,
        None => 0,
    };
    Ok(MemoryBreakdown {
        total_bytes: total,
        used_bytes: used,
        free_bytes: free,
        available_bytes: available,
        cached_bytes: cached,
    })
}

fn decode_processes(procs: Vec<WireProcess>) -> Vec<ProcessRow> {
    let mut seen = HashSet::with_capacity(procs.len());
    procs
        .into_iter()
        .filter(|p| seen.insert(p.pid))
        .map(|p| ProcessRow {
            pid: p.pid,
            name: p.name,
            cpu_percent: p.cpu_usage.max(0.0),
            memory_percent: p.memory_usage.max(0.0),
            state: decode_state(&p.state),
            priority: p.priority,
        })
        .collect()
}

fn decode_state(v: &Value) -> ProcessState {
    match v {
        Value::String(s) => ProcessState::from_name(s),
        Value::Number(n) => n
            .as_i64()
            .map(ProcessState::from_code)
            .unwrap_or_else(|| ProcessState::Other(n.to_string())),
        _ => ProcessState::Unknown,
    }
}

fn bytes(field: &str, v: f64) -> Result<u64, DecodeError> {
    if v < 0.0 {
        return Err(DecodeError::SchemaViolation(format!(
            "{field} is negative ({v})"
        )));
    }
    Ok(v.round() as u64)
}

fn clamp_pct(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}
