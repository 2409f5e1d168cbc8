//! Posture Monitor: calibration/threshold/debounce state machine
//!
//! Verdict per tick:
//! - no baseline or no measurement → UNKNOWN (counter untouched)
//! - deviation ≤ threshold → counter reset to 0 → GOOD
//! - deviation > threshold → counter += 1 → TRANSITIONING while
//!   0 < counter ≤ alert_after, SLOUCHING above it

use thiserror::Error;

use crate::types::{Evaluation, MonitorConfig, Reason, Verdict};

/// Calibration attempted while no subject is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no subject detected - cannot calibrate")]
pub struct NoSignalError;

/// Posture state machine
#[derive(Debug)]
pub struct PostureMonitor {
    /// Threshold and debounce parameters
    config: MonitorConfig,
    /// Measurement frozen at calibration, None until the first success
    baseline: Option<f32>,
    /// Consecutive out-of-tolerance frames
    bad_frames: u32,
    /// Number of evaluations
    update_count: u64,
}

impl PostureMonitor {
    /// Create new monitor
    ///
    /// `notify_every` is clamped to at least 1, it divides the bad-frame
    /// counter.
    pub fn new(mut config: MonitorConfig) -> Self {
        config.notify_every = config.notify_every.max(1);
        Self {
            config,
            baseline: None,
            bad_frames: 0,
            update_count: 0,
        }
    }

    /// Freeze `current` as the good-posture baseline
    ///
    /// Resets the bad-frame counter. Fails without touching state when no
    /// measurement is available.
    pub fn calibrate(&mut self, current: Option<f32>) -> Result<f32, NoSignalError> {
        let measurement = current.ok_or(NoSignalError)?;
        self.baseline = Some(measurement);
        self.bad_frames = 0;
        Ok(measurement)
    }

    /// Evaluate one tick's measurement, return the verdict record
    pub fn evaluate(&mut self, current: Option<f32>) -> Evaluation {
        self.update_count += 1;

        let baseline = match self.baseline {
            Some(b) => b,
            None => return Evaluation::unknown(current, self.bad_frames, Reason::P001_UNCALIBRATED),
        };
        let current = match current {
            Some(m) => m,
            None => return Evaluation::unknown(None, self.bad_frames, Reason::P002_NO_SIGNAL),
        };

        let deviation = self.config.mode.deviation(current, baseline);
        let had_streak = self.bad_frames > 0;

        if deviation > self.config.threshold {
            self.bad_frames += 1;
        } else {
            self.bad_frames = 0;
        }

        // Verdict order matters: alert wins over reset, reset wins over debounce
        if self.bad_frames > self.config.alert_after {
            let should_notify = self.bad_frames % self.config.notify_every == 0;
            let reason = if should_notify {
                Reason::P023_ALERT_RENEWED
            } else {
                Reason::P022_ALERT
            };
            Evaluation::new(
                Some(current),
                Some(deviation),
                self.bad_frames,
                Verdict::Slouching,
                should_notify,
                reason,
            )
        } else if self.bad_frames == 0 {
            let reason = if had_streak {
                Reason::P012_RECOVERED
            } else {
                Reason::P011_WITHIN_TOLERANCE
            };
            Evaluation::new(
                Some(current),
                Some(deviation),
                0,
                Verdict::Good,
                false,
                reason,
            )
        } else {
            Evaluation::new(
                Some(current),
                Some(deviation),
                self.bad_frames,
                Verdict::Transitioning,
                false,
                Reason::P021_DEBOUNCING,
            )
        }
    }

    /// Has a baseline been set?
    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    /// Get current baseline
    pub fn baseline(&self) -> Option<f32> {
        self.baseline
    }

    /// Get consecutive bad-frame count
    pub fn bad_frames(&self) -> u32 {
        self.bad_frames
    }

    /// Get evaluation count
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Get the monitor parameters
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Drop the baseline and counter, back to uncalibrated
    pub fn reset(&mut self) {
        self.baseline = None;
        self.bad_frames = 0;
    }
}

// =============================================================================
// TESTS
// =============================================================================
