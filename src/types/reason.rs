//! Reason codes for every verdict the monitor produces

use serde::{Deserialize, Serialize};

/// Reason codes for evaluation verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum Reason {
    // =========================================================================
    // P00x: UNKNOWN verdicts
    // =========================================================================
    /// No baseline yet, evaluate before a successful calibration
    P001_UNCALIBRATED,
    /// No subject detected this frame
    P002_NO_SIGNAL,

    // =========================================================================
    // P01x: GOOD verdicts
    // =========================================================================
    /// Deviation within tolerance, counter stayed at zero
    P011_WITHIN_TOLERANCE,
    /// Back within tolerance after a bad streak, counter reset
    P012_RECOVERED,

    // =========================================================================
    // P02x: bad-frame streak
    // =========================================================================
    /// Out of tolerance but still inside the debounce window
    P021_DEBOUNCING,
    /// Bad streak exceeded the alert threshold
    P022_ALERT,
    /// Alert renewed on the notification cadence
    P023_ALERT_RENEWED,
}

impl Reason {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::P001_UNCALIBRATED => "P001_UNCALIBRATED",
            Self::P002_NO_SIGNAL => "P002_NO_SIGNAL",
            Self::P011_WITHIN_TOLERANCE => "P011_WITHIN_TOLERANCE",
            Self::P012_RECOVERED => "P012_RECOVERED",
            Self::P021_DEBOUNCING => "P021_DEBOUNCING",
            Self::P022_ALERT => "P022_ALERT",
            Self::P023_ALERT_RENEWED => "P023_ALERT_RENEWED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::P001_UNCALIBRATED => "Not calibrated yet",
            Self::P002_NO_SIGNAL => "No subject detected",
            Self::P011_WITHIN_TOLERANCE => "Posture within tolerance",
            Self::P012_RECOVERED => "Recovered from bad streak",
            Self::P021_DEBOUNCING => "Bad posture, debouncing",
            Self::P022_ALERT => "Slouching past alert threshold",
            Self::P023_ALERT_RENEWED => "Slouching, notification renewed",
        }
    }

    /// Is this an UNKNOWN reason?
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::P001_UNCALIBRATED | Self::P002_NO_SIGNAL)
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
