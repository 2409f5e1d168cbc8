//! Signal extraction: one smoothed scalar per frame
//!
//! The actual detection (classical face detector, pose-landmark model) lives
//! behind the locator traits. The extractors own only the geometry and the
//! smoothing window, and expose the calibration read of that window.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::core::SmoothingWindow;
use crate::types::{DeviationMode, FaceBox, Frame, Point, PoseSample};

/// Finds the subject's face in a frame
///
/// Implementations may annotate the frame in place for display.
pub trait FaceLocator {
    fn locate(&mut self, frame: &mut Frame) -> Option<FaceBox>;
}

/// Finds the subject's left ear and shoulder in a frame
pub trait PoseLocator {
    fn locate(&mut self, frame: &mut Frame) -> Option<PoseSample>;
}

/// Turns frames into smoothed posture measurements
pub trait SignalExtractor {
    /// Process one frame, return it (possibly annotated) with the smoothed
    /// measurement, or None when no subject was detected
    fn extract(&mut self, frame: Frame) -> (Frame, Option<f32>);

    /// Read the current smoothed value from the internal window
    ///
    /// None until at least one reading has been buffered.
    fn calibrate(&mut self) -> Option<f32>;

    /// Deviation semantics of this extractor's measurement
    fn mode(&self) -> DeviationMode;
}

/// Angle of the ear-shoulder line against the horizontal, in degrees
///
/// Matches the landmark convention: sitting upright reads near 90, leaning
/// forward pulls the angle down.
pub fn neck_angle_degrees(shoulder: Point, ear: Point) -> f32 {
    let theta = (ear.y - shoulder.y).atan2(ear.x - shoulder.x);
    theta.to_degrees().abs()
}

/// Face-drop extractor: smoothed vertical center of the face box
///
/// Signed deviation, y grows downward in image coordinates so slouching moves
/// the measurement up in value.
pub struct FaceDropExtractor<L> {
    locator: L,
    window: SmoothingWindow,
}

impl<L: FaceLocator> FaceDropExtractor<L> {
    /// Create new extractor with the given smoothing window length
    pub fn new(locator: L, smoothing_window: usize) -> Self {
        Self {
            locator,
            window: SmoothingWindow::new(smoothing_window),
        }
    }
}

impl<L: FaceLocator> SignalExtractor for FaceDropExtractor<L> {
    fn extract(&mut self, mut frame: Frame) -> (Frame, Option<f32>) {
        let measurement = match self.locator.locate(&mut frame) {
            Some(face) => {
                self.window.push(face.center_y());
                self.window.mean()
            }
            None => None,
        };
        (frame, measurement)
    }

    fn calibrate(&mut self) -> Option<f32> {
        self.window.mean()
    }

    fn mode(&self) -> DeviationMode {
        DeviationMode::Signed
    }
}

/// Neck-angle extractor: smoothed ear-shoulder angle in degrees
pub struct NeckAngleExtractor<L> {
    locator: L,
    window: SmoothingWindow,
}

impl<L: PoseLocator> NeckAngleExtractor<L> {
    /// Create new extractor with the given smoothing window length
    pub fn new(locator: L, smoothing_window: usize) -> Self {
        Self {
            locator,
            window: SmoothingWindow::new(smoothing_window),
        }
    }
}

impl<L: PoseLocator> SignalExtractor for NeckAngleExtractor<L> {
    fn extract(&mut self, mut frame: Frame) -> (Frame, Option<f32>) {
        let measurement = match self.locator.locate(&mut frame) {
            Some(pose) => {
                self.window.push(neck_angle_degrees(pose.shoulder, pose.ear));
                self.window.mean()
            }
            None => None,
        };
        (frame, measurement)
    }

    fn calibrate(&mut self) -> Option<f32> {
        self.window.mean()
    }

    fn mode(&self) -> DeviationMode {
        DeviationMode::Unsigned
    }
}

// =============================================================================
// SCRIPTED LOCATORS (replay mode, integration tests)
// =============================================================================

/// Face locator fed from a queue of raw center-y readings
///
/// Clones share the queue, so the driver can keep feeding after the locator
/// moved into an extractor. `None` entries simulate frames where detection
/// failed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFaceLocator {
    feed: Rc<RefCell<VecDeque<Option<f32>>>>,
}

impl ScriptedFaceLocator {
    /// Create an empty locator
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the raw reading for the next frame
    pub fn feed(&self, reading: Option<f32>) {
        self.feed.borrow_mut().push_back(reading);
    }
}

impl FaceLocator for ScriptedFaceLocator {
    fn locate(&mut self, _frame: &mut Frame) -> Option<FaceBox> {
        let center_y = self.feed.borrow_mut().pop_front().flatten()?;
        // 80x80 box whose center sits at the scripted reading
        Some(FaceBox::new(280.0, center_y - 40.0, 80.0, 80.0))
    }
}

/// Pose locator fed from a queue of raw angle readings in degrees
#[derive(Debug, Clone, Default)]
pub struct ScriptedPoseLocator {
    feed: Rc<RefCell<VecDeque<Option<f32>>>>,
}

impl ScriptedPoseLocator {
    /// Create an empty locator
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the raw reading for the next frame
    pub fn feed(&self, reading: Option<f32>) {
        self.feed.borrow_mut().push_back(reading);
    }
}

impl PoseLocator for ScriptedPoseLocator {
    fn locate(&mut self, _frame: &mut Frame) -> Option<PoseSample> {
        let angle = self.feed.borrow_mut().pop_front().flatten()?;
        // Synthesize landmarks whose ear-shoulder line sits at the scripted angle
        let shoulder = Point::new(100.0, 100.0);
        let rad = angle.to_radians();
        let ear = Point::new(shoulder.x + 50.0 * rad.cos(), shoulder.y + 50.0 * rad.sin());
        Some(PoseSample::new(shoulder, ear))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neck_angle_horizontal_is_zero() {
        let angle = neck_angle_degrees(Point::new(100.0, 100.0), Point::new(150.0, 100.0));
        assert!(angle.abs() < 1e-4);
    }

    #[test]
    fn test_neck_angle_vertical_is_ninety() {
        let angle = neck_angle_degrees(Point::new(100.0, 100.0), Point::new(100.0, 40.0));
        assert!((angle - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_neck_angle_is_unsigned() {
        let above = neck_angle_degrees(Point::new(0.0, 0.0), Point::new(50.0, -50.0));
        let below = neck_angle_degrees(Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        assert!((above - below).abs() < 1e-4);
        assert!((above - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_face_drop_smooths_readings() {
        let locator = ScriptedFaceLocator::new();
        locator.feed(Some(300.0));
        locator.feed(Some(320.0));
        let mut extractor = FaceDropExtractor::new(locator, 10);

        let (_, first) = extractor.extract(Frame::blank(640, 480));
        assert_eq!(first, Some(300.0));
        let (_, second) = extractor.extract(Frame::blank(640, 480));
        assert_eq!(second, Some(310.0));
    }

    #[test]
    fn test_dropout_keeps_window_for_calibration() {
        let locator = ScriptedFaceLocator::new();
        locator.feed(Some(300.0));
        locator.feed(None);
        let mut extractor = FaceDropExtractor::new(locator, 10);

        extractor.extract(Frame::blank(640, 480));
        let (_, lost) = extractor.extract(Frame::blank(640, 480));
        assert_eq!(lost, None);
        // The window still holds the last good readings
        assert_eq!(extractor.calibrate(), Some(300.0));
    }

    #[test]
    fn test_calibrate_before_any_detection_is_none() {
        let mut extractor = NeckAngleExtractor::new(ScriptedPoseLocator::new(), 10);
        assert_eq!(extractor.calibrate(), None);
    }

    #[test]
    fn test_scripted_pose_round_trips_angle() {
        let locator = ScriptedPoseLocator::new();
        locator.feed(Some(72.5));
        let mut extractor = NeckAngleExtractor::new(locator, 10);

        let (_, measurement) = extractor.extract(Frame::blank(640, 480));
        assert!((measurement.unwrap() - 72.5).abs() < 1e-3);
    }
}
