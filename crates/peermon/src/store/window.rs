//! Bounded per-(peer, kind) metric history.

use std::collections::VecDeque;

use crate::protocol::Metric;

/// FIFO history of at most `capacity` metrics, most recent last.
#[derive(Debug, Clone)]
pub struct Window {
    capacity: usize,
    metrics: VecDeque<Metric>,
}

impl Window {
    /// A zero capacity is bumped to one so the latest report is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, metrics: VecDeque::with_capacity(capacity) }
    }

    /// Append `metric`, evicting the oldest entry when full.
    pub fn add(&mut self, metric: Metric) {
        if self.metrics.len() == self.capacity {
            self.metrics.pop_front();
        }
        self.metrics.push_back(metric);
    }

    pub fn latest(&self) -> Option<&Metric> {
        self.metrics.back()
    }

    /// Copies of every retained metric, oldest first.
    pub fn all(&self) -> Vec<Metric> {
        self.metrics.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
