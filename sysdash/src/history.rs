//! Bounded history buffers for charts.

use std::collections::{vec_deque, VecDeque};

use chrono::{DateTime, Local};

pub const DEFAULT_HISTORY_LEN: usize = 50;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if dq.len() == cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

/// Fixed-capacity FIFO of timestamped samples. Pushing onto a full series evicts
/// the oldest point; points are never reordered or merged.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    points: VecDeque<(DateTime<Local>, T)>,
    cap: usize,
}

impl<T> TimeSeries<T> {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            points: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, at: DateTime<Local>, value: T) {
        push_capped(&mut self.points, (at, value), self.cap);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Oldest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, (DateTime<Local>, T)> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&(DateTime<Local>, T)> {
        self.points.back()
    }
}

impl<T: Copy> TimeSeries<T> {
    pub fn values(&self) -> Vec<T> {
        self.points.iter().map(|(_, v)| *v).collect()
    }
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}
