//! PostureGuard: webcam posture monitor
//!
//! Pipeline: FrameSource → SignalExtractor → PostureMonitor → display/notify

pub mod core;
pub mod types;

// =============================================================================
// DEFAULT THRESHOLDS
// =============================================================================

/// Face-drop variant: pixels the face may drop below baseline before a frame
/// counts as bad
pub const DEFAULT_PIXEL_THRESHOLD: f32 = 40.0;

/// Neck-angle variant: degrees of deviation from the baseline angle before a
/// frame counts as bad
pub const DEFAULT_ANGLE_THRESHOLD: f32 = 15.0;

/// Consecutive bad frames before the verdict flips to SLOUCHING
/// About 2-3 seconds at the default tick rate
pub const DEFAULT_ALERT_AFTER: u32 = 50;

/// Renew the desktop notification every Nth bad frame while slouching
/// Modulo debounce, not time-based
pub const NOTIFY_EVERY: u32 = 100;

// =============================================================================
// SIGNAL SMOOTHING
// =============================================================================

/// Moving-average window over raw per-frame readings
pub const SMOOTHING_WINDOW: usize = 10;

// =============================================================================
// TICK LOOP
// =============================================================================

/// Nominal interval between ticks (milliseconds)
pub const TICK_INTERVAL_MS: u64 = 15;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
