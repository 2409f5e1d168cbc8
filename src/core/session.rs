//! Tick-driven session: frame → extract → evaluate → display/notify
//!
//! Single-threaded and cooperative. One tick runs to completion before the
//! driver schedules the next; there is nothing in flight to cancel. The only
//! managed resource is the frame source, released by its Drop.

use log::{info, warn};

use crate::core::monitor::{NoSignalError, PostureMonitor};
use crate::core::SignalExtractor;
use crate::types::{Evaluation, Frame, Reason, Verdict};

/// Pollable source of frames
///
/// `None` means no frame this tick (camera hiccup, script exhausted). The
/// camera handle, if any, is released when the source drops.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Frame>;
}

/// Fire-and-forget desktop notification channel
///
/// Must never block or fail the caller.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str);
}

/// Presentation sink: a renderable frame plus a short status with urgency
pub trait DisplaySink {
    fn present(&mut self, frame: &Frame, status: &Status);
}

/// Urgency color of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Muted,
    Good,
    Warning,
    Alert,
}

impl Urgency {
    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            Urgency::Muted => "\x1b[90m",   // Gray
            Urgency::Good => "\x1b[32m",    // Green
            Urgency::Warning => "\x1b[33m", // Orange/Yellow
            Urgency::Alert => "\x1b[31m",   // Red
        }
    }
}

/// Status line shown next to the video feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub urgency: Urgency,
}

impl Status {
    pub fn new(text: impl Into<String>, urgency: Urgency) -> Self {
        Self {
            text: text.into(),
            urgency,
        }
    }
}

/// User-facing commands, independent of any UI toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Calibrate,
    Quit,
}

/// Counters reported when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Ticks processed (including skipped frames)
    pub ticks: u64,
    /// Ticks skipped because no frame arrived
    pub skipped: u64,
    /// Ticks with a SLOUCHING verdict
    pub alerts: u64,
    /// Notifications fired
    pub notifications: u64,
}

/// One monitoring session wiring the boundaries together
pub struct Session<S, E, N, D> {
    source: S,
    extractor: E,
    monitor: PostureMonitor,
    notifier: N,
    display: D,
    status: Status,
    summary: SessionSummary,
}

impl<S, E, N, D> Session<S, E, N, D>
where
    S: FrameSource,
    E: SignalExtractor,
    N: Notifier,
    D: DisplaySink,
{
    /// Create new session
    pub fn new(source: S, extractor: E, monitor: PostureMonitor, notifier: N, display: D) -> Self {
        Self {
            source,
            extractor,
            monitor,
            notifier,
            display,
            status: Status::new("Not calibrated", Urgency::Muted),
            summary: SessionSummary::default(),
        }
    }

    /// Freeze the current smoothed measurement as the baseline
    pub fn calibrate(&mut self) -> Result<f32, NoSignalError> {
        let result = self.monitor.calibrate(self.extractor.calibrate());
        match result {
            Ok(baseline) => {
                info!("calibrated, baseline {:.1}", baseline);
                self.status = Status::new(
                    format!("Calibrated! Baseline: {:.0}", baseline),
                    Urgency::Good,
                );
            }
            Err(NoSignalError) => {
                warn!("calibration failed: no subject detected");
                self.status = Status::new("Calibration failed: no subject detected", Urgency::Warning);
            }
        }
        result
    }

    /// Run one tick: pull a frame, extract, evaluate, present
    ///
    /// Returns None when no frame arrived; the tick is skipped, the loop
    /// continues.
    pub fn tick(&mut self) -> Option<Evaluation> {
        self.summary.ticks += 1;

        let frame = match self.source.next_frame() {
            Some(frame) => frame,
            None => {
                self.summary.skipped += 1;
                warn!("no frame this tick, skipping");
                return None;
            }
        };

        let (frame, measurement) = self.extractor.extract(frame);
        let eval = self.monitor.evaluate(measurement);
        self.apply(&eval);
        self.display.present(&frame, &self.status);
        Some(eval)
    }

    /// Handle a user command, returns false when the session should end
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Calibrate => {
                let _ = self.calibrate();
                true
            }
            Command::Quit => false,
        }
    }

    /// Fold a verdict into the status line and notification channel
    ///
    /// TRANSITIONING leaves the previous status on screen.
    fn apply(&mut self, eval: &Evaluation) {
        match eval.verdict {
            Verdict::Good => {
                self.status = Status::new(
                    format!("Posture good. Deviation: {}", eval.display_deviation()),
                    Urgency::Good,
                );
            }
            Verdict::Slouching => {
                self.summary.alerts += 1;
                self.status = Status::new("SLOUCHING! Sit up!", Urgency::Alert);
                if eval.should_notify {
                    self.summary.notifications += 1;
                    self.notifier
                        .notify("PostureGuard", "You are slouching! Sit up straight.");
                }
            }
            Verdict::Unknown => {
                let text = match eval.reason {
                    Reason::P002_NO_SIGNAL => "No subject detected",
                    _ => "Not calibrated",
                };
                self.status = Status::new(text, Urgency::Muted);
            }
            Verdict::Transitioning => {}
        }
    }

    /// Current status line
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Session counters so far
    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// The monitor behind this session
    pub fn monitor(&self) -> &PostureMonitor {
        &self.monitor
    }
}

/// Frame source that always yields a blank frame
///
/// Backs the scripted locators: the reading comes from the script, the frame
/// is just a carrier for the display path.
#[derive(Debug, Clone, Copy)]
pub struct BlankSource {
    width: u32,
    height: u32,
}

impl BlankSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FrameSource for BlankSource {
    fn next_frame(&mut self) -> Option<Frame> {
        Some(Frame::blank(self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FaceDropExtractor, ScriptedFaceLocator};
    use crate::types::MonitorConfig;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingNotifier {
        messages: Rc<RefCell<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, _title: &str, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    struct RecordingDisplay {
        statuses: Rc<RefCell<Vec<Status>>>,
    }

    impl DisplaySink for RecordingDisplay {
        fn present(&mut self, _frame: &Frame, status: &Status) {
            self.statuses.borrow_mut().push(status.clone());
        }
    }

    struct EmptySource;

    impl FrameSource for EmptySource {
        fn next_frame(&mut self) -> Option<Frame> {
            None
        }
    }

    fn face_session(
        locator: ScriptedFaceLocator,
        alert_after: u32,
    ) -> (
        Session<BlankSource, FaceDropExtractor<ScriptedFaceLocator>, RecordingNotifier, RecordingDisplay>,
        Rc<RefCell<Vec<String>>>,
        Rc<RefCell<Vec<Status>>>,
    ) {
        let messages = Rc::new(RefCell::new(Vec::new()));
        let statuses = Rc::new(RefCell::new(Vec::new()));
        let session = Session::new(
            BlankSource::new(640, 480),
            FaceDropExtractor::new(locator, 1),
            PostureMonitor::new(MonitorConfig {
                mode: crate::types::DeviationMode::Signed,
                threshold: 40.0,
                alert_after,
                notify_every: 100,
            }),
            RecordingNotifier {
                messages: Rc::clone(&messages),
            },
            RecordingDisplay {
                statuses: Rc::clone(&statuses),
            },
        );
        (session, messages, statuses)
    }

    #[test]
    fn test_skipped_tick_on_missing_frame() {
        let mut session = Session::new(
            EmptySource,
            FaceDropExtractor::new(ScriptedFaceLocator::new(), 1),
            PostureMonitor::new(MonitorConfig::face()),
            RecordingNotifier {
                messages: Rc::new(RefCell::new(Vec::new())),
            },
            RecordingDisplay {
                statuses: Rc::new(RefCell::new(Vec::new())),
            },
        );

        assert!(session.tick().is_none());
        let summary = session.summary();
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_calibration_failure_updates_status_only() {
        let (mut session, _, _) = face_session(ScriptedFaceLocator::new(), 50);

        assert_eq!(session.calibrate(), Err(NoSignalError));
        assert_eq!(session.status().urgency, Urgency::Warning);
        assert!(!session.monitor().is_calibrated());
    }

    #[test]
    fn test_transitioning_keeps_previous_status() {
        let locator = ScriptedFaceLocator::new();
        let feeder = locator.clone();
        let (mut session, _, _) = face_session(locator, 50);

        feeder.feed(Some(300.0));
        session.tick();
        session.calibrate().unwrap();

        feeder.feed(Some(310.0));
        session.tick();
        let good_status = session.status().clone();
        assert_eq!(good_status.urgency, Urgency::Good);

        // Out of tolerance, inside the debounce window: status untouched
        feeder.feed(Some(400.0));
        session.tick();
        assert_eq!(*session.status(), good_status);
    }

    #[test]
    fn test_notification_fires_on_cadence_only() {
        let locator = ScriptedFaceLocator::new();
        let feeder = locator.clone();
        let (mut session, messages, _) = face_session(locator, 50);

        feeder.feed(Some(300.0));
        session.tick();
        session.calibrate().unwrap();

        for _ in 0..120 {
            feeder.feed(Some(400.0));
            session.tick();
        }

        // Exactly one notification: at bad_frames == 100
        assert_eq!(messages.borrow().len(), 1);
        assert_eq!(session.summary().notifications, 1);
        assert!(session.summary().alerts > 0);
    }

    #[test]
    fn test_quit_command_ends_session() {
        let (mut session, _, _) = face_session(ScriptedFaceLocator::new(), 50);
        assert!(session.handle(Command::Calibrate));
        assert!(!session.handle(Command::Quit));
    }
}
