//! Core types for PostureGuard

mod config;
mod frame;
mod mode;
mod reason;
mod verdict;

pub use config::{AppConfig, ConfigError, MonitorConfig, TrackerKind};
pub use frame::{FaceBox, Frame, Point, PoseSample};
pub use mode::DeviationMode;
pub use reason::Reason;
pub use verdict::{Evaluation, Verdict};
