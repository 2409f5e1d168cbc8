//! Core modules for PostureGuard

pub mod extractor;
pub mod monitor;
pub mod session;
pub mod smoothing;

pub use extractor::{
    FaceDropExtractor, FaceLocator, NeckAngleExtractor, PoseLocator, ScriptedFaceLocator,
    ScriptedPoseLocator, SignalExtractor,
};
pub use monitor::{NoSignalError, PostureMonitor};
pub use session::{
    BlankSource, Command, DisplaySink, FrameSource, Notifier, Session, SessionSummary, Status,
    Urgency,
};
pub use smoothing::SmoothingWindow;
