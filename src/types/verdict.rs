//! Per-tick posture verdict and its output record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Reason;

/// The four possible verdicts for a single evaluation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// No baseline yet, or no subject detected this frame
    Unknown,
    /// Within tolerance, bad-frame counter is zero
    Good,
    /// Out of tolerance but still inside the debounce window
    Transitioning,
    /// Out of tolerance for longer than the alert threshold
    Slouching,
}

impl Verdict {
    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            Verdict::Unknown => "\x1b[90m",       // Gray
            Verdict::Good => "\x1b[32m",          // Green
            Verdict::Transitioning => "\x1b[33m", // Orange/Yellow
            Verdict::Slouching => "\x1b[31m",     // Red
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Get emoji for verdict
    pub fn emoji(&self) -> &'static str {
        match self {
            Verdict::Unknown => "❓",
            Verdict::Good => "✅",
            Verdict::Transitioning => "🔶",
            Verdict::Slouching => "⚠️",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Verdict::Unknown => "UNKNOWN",
            Verdict::Good => "GOOD",
            Verdict::Transitioning => "TRANSITIONING",
            Verdict::Slouching => "SLOUCHING",
        };
        write!(f, "{}", name)
    }
}

/// Output record for each evaluation tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Smoothed measurement for this tick, None when no subject detected
    pub measurement: Option<f32>,
    /// Deviation from baseline, None when the verdict is UNKNOWN
    pub deviation: Option<f32>,
    /// Consecutive bad frames after this tick
    pub bad_frames: u32,
    /// Verdict for this tick
    pub verdict: Verdict,
    /// Fire a notification on this tick?
    pub should_notify: bool,
    /// Reason for the verdict
    pub reason: Reason,
}

impl Evaluation {
    /// Create new evaluation record
    pub fn new(
        measurement: Option<f32>,
        deviation: Option<f32>,
        bad_frames: u32,
        verdict: Verdict,
        should_notify: bool,
        reason: Reason,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            measurement,
            deviation,
            bad_frames,
            verdict,
            should_notify,
            reason,
        }
    }

    /// Create an UNKNOWN evaluation (no baseline or no signal)
    pub fn unknown(measurement: Option<f32>, bad_frames: u32, reason: Reason) -> Self {
        Self::new(measurement, None, bad_frames, Verdict::Unknown, false, reason)
    }

    /// Format deviation for display
    pub fn display_deviation(&self) -> String {
        match self.deviation {
            Some(d) => format!("{:+.1}", d),
            None => "-".to_string(),
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = self.verdict.color_code();
        let reset = Verdict::color_reset();
        let emoji = self.verdict.emoji();

        format!(
            "{}{} dev={} | verdict={} | bad={} | {}{}",
            color,
            emoji,
            self.display_deviation(),
            self.verdict,
            self.bad_frames,
            self.reason.code(),
            reset
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "dev={} | verdict={} | bad={} | reason={}",
            self.display_deviation(),
            self.verdict,
            self.bad_frames,
            self.reason.code()
        )
    }
}
