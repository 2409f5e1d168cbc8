//! Frame and landmark geometry passed across the extractor boundary
//!
//! The frame is an opaque renderable image. Decoding, detection and drawing
//! all happen on the other side of the locator traits.

use serde::{Deserialize, Serialize};

/// One captured video frame, RGB8
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// Create a frame from raw RGB8 bytes
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Create an all-black frame (synthetic sources, tests)
    pub fn blank(width: u32, height: u32) -> Self {
        // Widen before multiplying, the byte count can exceed u32
        let len = width as usize * height as usize * 3;
        Self {
            width,
            height,
            data: vec![0u8; len],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_frame_byte_length() {
        let frame = Frame::blank(3840, 2160);
        assert_eq!(frame.data.len(), 3840 * 2160 * 3);
        assert!(frame.data.iter().all(|&b| b == 0));
    }
}

/// A point in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Face bounding box in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FaceBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Vertical center of the box, the raw face-drop reading
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// The two pose landmarks the neck-angle tracker needs
///
/// Left side by convention, the user sits with their left side to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    pub shoulder: Point,
    pub ear: Point,
}

impl PoseSample {
    pub fn new(shoulder: Point, ear: Point) -> Self {
        Self { shoulder, ear }
    }
}
