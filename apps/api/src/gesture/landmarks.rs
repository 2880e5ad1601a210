//! Hand landmark geometry.
//!
//! Landmarks follow the 21-point handpose layout: wrist at 0, then four
//! joints per finger (thumb 1–4, index 5–8, middle 9–12, ring 13–16,
//! pinky 17–20). Coordinates are image-space pixels, y growing downward.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// One landmark: `[x, y, z]` in pixels (z is model depth, unused here).
pub type Landmark = [f32; 3];

/// Axis-aligned box around a detected hand, in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left: [f32; 2],
    pub bottom_right: [f32; 2],
}

/// One hand returned by the pose model for a single frame.
#[derive(Debug, Clone)]
pub struct HandDetection {
    pub bounding_box: BoundingBox,
    pub landmarks: Vec<Landmark>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

pub const FINGERS: [Finger; 5] = [
    Finger::Thumb,
    Finger::Index,
    Finger::Middle,
    Finger::Ring,
    Finger::Pinky,
];

/// Fingertip landmark indices for index/middle/ring/pinky, used by the
/// one-finger heuristic.
pub const FINGERTIPS: [usize; 4] = [8, 12, 16, 20];
/// Matching knuckle (MCP) landmark indices.
pub const KNUCKLES: [usize; 4] = [5, 9, 13, 17];

impl Finger {
    /// (knuckle, middle joint, tip) landmark indices.
    pub fn joints(&self) -> (usize, usize, usize) {
        match self {
            Finger::Thumb => (1, 2, 4),
            Finger::Index => (5, 6, 8),
            Finger::Middle => (9, 10, 12),
            Finger::Ring => (13, 14, 16),
            Finger::Pinky => (17, 18, 20),
        }
    }
}

/// How far a finger is bent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerCurl {
    NoCurl,
    HalfCurl,
    FullCurl,
}

/// Which way a finger points, eight-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerDirection {
    VerticalUp,
    VerticalDown,
    HorizontalLeft,
    HorizontalRight,
    DiagonalUpLeft,
    DiagonalUpRight,
    DiagonalDownLeft,
    DiagonalDownRight,
}

/// Classifies a finger's curl from the angle at its middle joint.
/// A straight finger reads near 180°; a fist folds the tip back toward
/// the knuckle and the angle collapses toward 0°.
pub fn curl_of(landmarks: &[Landmark], finger: Finger) -> FingerCurl {
    let (mcp, pip, tip) = finger.joints();
    let angle = joint_angle(landmarks[mcp], landmarks[pip], landmarks[tip]);
    if angle >= 130.0 {
        FingerCurl::NoCurl
    } else if angle >= 60.0 {
        FingerCurl::HalfCurl
    } else {
        FingerCurl::FullCurl
    }
}

/// Classifies the knuckle→tip vector into one of eight directions.
pub fn direction_of(landmarks: &[Landmark], finger: Finger) -> FingerDirection {
    let (mcp, _, tip) = finger.joints();
    let dx = landmarks[tip][0] - landmarks[mcp][0];
    // Image y grows downward; flip so "up" is positive.
    let dy = landmarks[mcp][1] - landmarks[tip][1];
    let angle = dy.atan2(dx).to_degrees();

    match angle {
        a if (67.5..=112.5).contains(&a) => FingerDirection::VerticalUp,
        a if (112.5..157.5).contains(&a) => FingerDirection::DiagonalUpLeft,
        a if (22.5..67.5).contains(&a) => FingerDirection::DiagonalUpRight,
        a if (-22.5..22.5).contains(&a) => FingerDirection::HorizontalRight,
        a if (-67.5..-22.5).contains(&a) => FingerDirection::DiagonalDownRight,
        a if (-112.5..-67.5).contains(&a) => FingerDirection::VerticalDown,
        a if (-157.5..-112.5).contains(&a) => FingerDirection::DiagonalDownLeft,
        _ => FingerDirection::HorizontalLeft,
    }
}

/// Angle in degrees at `pivot` between the segments to `a` and `b`.
fn joint_angle(a: Landmark, pivot: Landmark, b: Landmark) -> f32 {
    let va = [a[0] - pivot[0], a[1] - pivot[1]];
    let vb = [b[0] - pivot[0], b[1] - pivot[1]];
    let dot = va[0] * vb[0] + va[1] * vb[1];
    let mag = (va[0].powi(2) + va[1].powi(2)).sqrt() * (vb[0].powi(2) + vb[1].powi(2)).sqrt();
    if mag == 0.0 {
        return 0.0;
    }
    (dot / mag).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Shape of a single synthetic finger in a test hand.
    #[derive(Debug, Clone, Copy)]
    pub enum FingerShape {
        /// Straight, pointing toward the top of the image.
        Up,
        /// Folded back, tip level with the knuckle.
        Curled,
    }

    /// Builds a 21-landmark synthetic hand. Fingers are laid out left to
    /// right (thumb..pinky), knuckles on a common baseline at y = 300.
    pub fn hand(shapes: [FingerShape; 5]) -> Vec<Landmark> {
        let mut landmarks = vec![[0.0, 0.0, 0.0]; 21];
        landmarks[0] = [160.0, 400.0, 0.0]; // wrist

        let base_x = [60.0, 120.0, 160.0, 200.0, 240.0];
        for (i, finger) in FINGERS.iter().enumerate() {
            let x = base_x[i];
            let (mcp, pip, tip) = finger.joints();
            let dip = pip + 1;
            match shapes[i] {
                FingerShape::Up => {
                    landmarks[mcp] = [x, 300.0, 0.0];
                    landmarks[pip] = [x, 250.0, 0.0];
                    landmarks[dip] = [x, 215.0, 0.0];
                    landmarks[tip] = [x, 180.0, 0.0];
                }
                FingerShape::Curled => {
                    landmarks[mcp] = [x, 300.0, 0.0];
                    landmarks[pip] = [x, 260.0, 0.0];
                    landmarks[dip] = [x, 280.0, 0.0];
                    landmarks[tip] = [x + 2.0, 300.0, 0.0];
                }
            }
        }
        landmarks
    }

    pub fn detection(shapes: [FingerShape; 5]) -> HandDetection {
        HandDetection {
            bounding_box: BoundingBox {
                top_left: [40.0, 160.0],
                bottom_right: [260.0, 420.0],
            },
            landmarks: hand(shapes),
        }
    }
}
