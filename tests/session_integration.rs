//! Integration tests for the session loop
//!
//! Drives a full session (source → extractor → monitor → sinks) with scripted
//! readings and recording sinks.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use postureguard::core::{
    BlankSource, Command, DisplaySink, FaceDropExtractor, FrameSource, NeckAngleExtractor,
    Notifier, PostureMonitor, ScriptedFaceLocator, ScriptedPoseLocator, Session, Status, Urgency,
};
use postureguard::types::{DeviationMode, Frame, MonitorConfig, Verdict};

#[derive(Clone, Default)]
struct RecordingNotifier {
    messages: Rc<RefCell<Vec<(String, String)>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.messages
            .borrow_mut()
            .push((title.to_string(), message.to_string()));
    }
}

#[derive(Clone, Default)]
struct RecordingDisplay {
    statuses: Rc<RefCell<Vec<Status>>>,
}

impl DisplaySink for RecordingDisplay {
    fn present(&mut self, _frame: &Frame, status: &Status) {
        self.statuses.borrow_mut().push(status.clone());
    }
}

/// Frame source that fails after a fixed number of frames
struct FlakySource {
    remaining: u32,
}

impl FrameSource for FlakySource {
    fn next_frame(&mut self) -> Option<Frame> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(Frame::blank(640, 480))
    }
}

/// Test a full face-tracker session: calibrate, slouch long enough, notify
#[test]
fn test_session_alerts_and_notifies_on_cadence() {
    let locator = ScriptedFaceLocator::new();
    let feeder = locator.clone();
    let notifier = RecordingNotifier::default();
    let messages = Rc::clone(&notifier.messages);

    let mut session = Session::new(
        BlankSource::new(640, 480),
        FaceDropExtractor::new(locator, 1),
        PostureMonitor::new(MonitorConfig {
            mode: DeviationMode::Signed,
            threshold: 40.0,
            alert_after: 50,
            notify_every: 100,
        }),
        notifier,
        RecordingDisplay::default(),
    );

    feeder.feed(Some(300.0));
    session.tick();
    session.handle(Command::Calibrate);
    assert!(session.monitor().is_calibrated());

    // 250 bad ticks: notifications at bad_frames 100 and 200
    for _ in 0..250 {
        feeder.feed(Some(400.0));
        session.tick();
    }

    let messages = messages.borrow();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].0, "PostureGuard");
    assert_eq!(session.summary().notifications, 2);
    // SLOUCHING from tick 51 of the bad run onward
    assert_eq!(session.summary().alerts, 200);
}

/// Test the angle-tracker session status transitions
#[test]
fn test_session_status_follows_verdicts() {
    let locator = ScriptedPoseLocator::new();
    let feeder = locator.clone();
    let display = RecordingDisplay::default();
    let statuses = Rc::clone(&display.statuses);

    let mut session = Session::new(
        BlankSource::new(640, 480),
        NeckAngleExtractor::new(locator, 1),
        PostureMonitor::new(MonitorConfig {
            mode: DeviationMode::Unsigned,
            threshold: 15.0,
            alert_after: 3,
            notify_every: 100,
        }),
        RecordingNotifier::default(),
        display,
    );

    // Before calibration: UNKNOWN keeps the muted status
    feeder.feed(Some(90.0));
    let eval = session.tick().unwrap();
    assert_eq!(eval.verdict, Verdict::Unknown);
    assert_eq!(statuses.borrow().last().unwrap().urgency, Urgency::Muted);

    session.handle(Command::Calibrate);

    feeder.feed(Some(92.0));
    session.tick();
    assert_eq!(statuses.borrow().last().unwrap().urgency, Urgency::Good);

    // Debounce window: status stays on the last GOOD line
    feeder.feed(Some(120.0));
    session.tick();
    assert_eq!(statuses.borrow().last().unwrap().urgency, Urgency::Good);

    // Past the alert threshold: red
    for _ in 0..3 {
        feeder.feed(Some(120.0));
        session.tick();
    }
    let last = statuses.borrow().last().unwrap().clone();
    assert_eq!(last.urgency, Urgency::Alert);
    assert_eq!(last.text, "SLOUCHING! Sit up!");
}

/// Test that frame-source failures skip ticks without corrupting state
#[test]
fn test_session_survives_source_failure() {
    let locator = ScriptedFaceLocator::new();
    let feeder = locator.clone();

    let mut session = Session::new(
        FlakySource { remaining: 2 },
        FaceDropExtractor::new(locator, 1),
        PostureMonitor::new(MonitorConfig::face()),
        RecordingNotifier::default(),
        RecordingDisplay::default(),
    );

    feeder.feed(Some(300.0));
    session.tick();
    session.handle(Command::Calibrate);

    feeder.feed(Some(310.0));
    assert!(session.tick().is_some());

    // Source is exhausted now: ticks are skipped, nothing breaks
    assert!(session.tick().is_none());
    assert!(session.tick().is_none());

    let summary = session.summary();
    assert_eq!(summary.ticks, 4);
    assert_eq!(summary.skipped, 2);
    assert!(session.monitor().is_calibrated());
}

/// Test that a failed calibration leaves an earlier baseline in place
#[test]
fn test_recalibration_failure_keeps_old_baseline() {
    let locator = ScriptedFaceLocator::new();
    let feeder = locator.clone();

    let mut session = Session::new(
        BlankSource::new(640, 480),
        // Window of 1: a dropout empties nothing, but calibrate still reads
        // the last buffered value
        FaceDropExtractor::new(locator, 1),
        PostureMonitor::new(MonitorConfig::face()),
        RecordingNotifier::default(),
        RecordingDisplay::default(),
    );

    feeder.feed(Some(300.0));
    session.tick();
    session.handle(Command::Calibrate);
    assert_eq!(session.monitor().baseline(), Some(300.0));

    // Second calibration succeeds off the buffered window even after dropouts
    feeder.feed(None);
    session.tick();
    session.handle(Command::Calibrate);
    assert_eq!(session.monitor().baseline(), Some(300.0));
}
