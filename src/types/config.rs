//! Configuration for the monitor and the application
//!
//! Thresholds are configuration, not constants baked into call sites: the two
//! tracker variants need different deviation thresholds.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::DeviationMode;
use crate::{
    DEFAULT_ALERT_AFTER, DEFAULT_ANGLE_THRESHOLD, DEFAULT_PIXEL_THRESHOLD, NOTIFY_EVERY,
    SMOOTHING_WINDOW, TICK_INTERVAL_MS,
};

/// Errors from loading or saving a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Which signal extractor variant to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerKind {
    /// Face vertical position, signed deviation
    Face,
    /// Ear-shoulder angle, unsigned deviation
    Angle,
}

impl TrackerKind {
    /// Deviation semantics for this tracker
    pub fn mode(&self) -> DeviationMode {
        match self {
            TrackerKind::Face => DeviationMode::Signed,
            TrackerKind::Angle => DeviationMode::Unsigned,
        }
    }
}

impl std::fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TrackerKind::Face => "face",
            TrackerKind::Angle => "angle",
        };
        write!(f, "{}", name)
    }
}

/// Parameters of the posture state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Deviation semantics
    pub mode: DeviationMode,
    /// Deviation beyond this counts the frame as bad
    pub threshold: f32,
    /// Consecutive bad frames before SLOUCHING
    pub alert_after: u32,
    /// Renew the notification every Nth bad frame
    pub notify_every: u32,
}

impl MonitorConfig {
    /// Signed face-drop defaults
    pub fn face() -> Self {
        Self {
            mode: DeviationMode::Signed,
            threshold: DEFAULT_PIXEL_THRESHOLD,
            alert_after: DEFAULT_ALERT_AFTER,
            notify_every: NOTIFY_EVERY,
        }
    }

    /// Unsigned neck-angle defaults
    pub fn angle() -> Self {
        Self {
            mode: DeviationMode::Unsigned,
            threshold: DEFAULT_ANGLE_THRESHOLD,
            alert_after: DEFAULT_ALERT_AFTER,
            notify_every: NOTIFY_EVERY,
        }
    }
}

/// Application configuration, loadable from a TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Camera device index
    pub camera_index: u32,
    /// Which tracker variant to run
    pub tracker: TrackerKind,
    /// Face-drop threshold in pixels
    pub pixel_threshold: f32,
    /// Neck-angle threshold in degrees
    pub angle_threshold: f32,
    /// Consecutive bad frames before SLOUCHING
    pub alert_after: u32,
    /// Renew the notification every Nth bad frame
    pub notify_every: u32,
    /// Moving-average window over raw readings
    pub smoothing_window: usize,
    /// Tick interval in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            tracker: TrackerKind::Face,
            pixel_threshold: DEFAULT_PIXEL_THRESHOLD,
            angle_threshold: DEFAULT_ANGLE_THRESHOLD,
            alert_after: DEFAULT_ALERT_AFTER,
            notify_every: NOTIFY_EVERY,
            smoothing_window: SMOOTHING_WINDOW,
            tick_interval_ms: TICK_INTERVAL_MS,
        }
    }
}

impl AppConfig {
    /// Load config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save config to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Build the monitor parameters for the configured tracker
    ///
    /// `notify_every` is clamped to at least 1, it divides the bad-frame
    /// counter.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            mode: self.tracker.mode(),
            threshold: match self.tracker {
                TrackerKind::Face => self.pixel_threshold,
                TrackerKind::Angle => self.angle_threshold,
            },
            alert_after: self.alert_after,
            notify_every: self.notify_every.max(1),
        }
    }
}
