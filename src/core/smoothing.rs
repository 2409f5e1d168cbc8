//! Fixed-length moving average over raw per-frame readings
//!
//! Raw detector output jitters frame to frame; both extractor variants smooth
//! it before the monitor sees a measurement. Calibration freezes the mean of
//! this window, so the window is also the calibration buffer.

use std::collections::VecDeque;

/// Moving-average window with fixed capacity
#[derive(Debug, Clone)]
pub struct SmoothingWindow {
    readings: VecDeque<f32>,
    capacity: usize,
}

impl SmoothingWindow {
    /// Create an empty window
    ///
    /// Capacity must be at least 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            readings: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Push a raw reading, evicting the oldest when full
    pub fn push(&mut self, raw: f32) {
        if self.readings.len() == self.capacity {
            self.readings.pop_front();
        }
        self.readings.push_back(raw);
    }

    /// Mean of the buffered readings, None when empty
    pub fn mean(&self) -> Option<f32> {
        if self.readings.is_empty() {
            return None;
        }
        Some(self.readings.iter().sum::<f32>() / self.readings.len() as f32)
    }

    /// Number of buffered readings
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Is the window empty?
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Drop all buffered readings
    pub fn clear(&mut self) {
        self.readings.clear();
    }
}
