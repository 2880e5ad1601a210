//! Pose descriptions: weighted per-finger curl/direction constraints.
#![allow(dead_code)]

use crate::gesture::landmarks::{Finger, FingerCurl, FingerDirection};

/// The named target handshapes, in capture-sequence order
/// (highest difficulty first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseId {
    ThreeFingers,
    Victory,
    OneFinger,
}

impl PoseId {
    pub fn name(&self) -> &'static str {
        match self {
            PoseId::ThreeFingers => "three_fingers",
            PoseId::Victory => "victory",
            PoseId::OneFinger => "one_finger",
        }
    }

    /// How many fingers the pose raises; drives the overlay label.
    pub fn finger_count(&self) -> u8 {
        match self {
            PoseId::ThreeFingers => 3,
            PoseId::Victory => 2,
            PoseId::OneFinger => 1,
        }
    }
}

/// The capture sequence: poses must be confirmed in exactly this order.
pub const POSE_SEQUENCE: [PoseId; 3] = [PoseId::ThreeFingers, PoseId::Victory, PoseId::OneFinger];

/// A weighted per-finger description of a target handshape.
#[derive(Debug, Clone)]
pub struct PoseDescription {
    pub id: PoseId,
    pub curls: Vec<(Finger, FingerCurl, f32)>,
    pub directions: Vec<(Finger, FingerDirection, f32)>,
}

impl PoseDescription {
    pub fn new(id: PoseId) -> Self {
        Self {
            id,
            curls: Vec::new(),
            directions: Vec::new(),
        }
    }

    pub fn curl(mut self, finger: Finger, curl: FingerCurl, weight: f32) -> Self {
        self.curls.push((finger, curl, weight));
        self
    }

    pub fn direction(mut self, finger: Finger, direction: FingerDirection, weight: f32) -> Self {
        self.directions.push((finger, direction, weight));
        self
    }
}

/// Builds the full pose library.
pub fn pose_library() -> Vec<PoseDescription> {
    vec![three_fingers(), victory(), one_finger()]
}

/// Index, middle and ring raised; thumb and pinky folded.
fn three_fingers() -> PoseDescription {
    let mut pose = PoseDescription::new(PoseId::ThreeFingers);
    for finger in [Finger::Index, Finger::Middle, Finger::Ring] {
        pose = pose
            .curl(finger, FingerCurl::NoCurl, 1.0)
            .direction(finger, FingerDirection::VerticalUp, 1.0)
            .direction(finger, FingerDirection::DiagonalUpLeft, 0.9)
            .direction(finger, FingerDirection::DiagonalUpRight, 0.9);
    }
    for finger in [Finger::Thumb, Finger::Pinky] {
        pose = pose
            .curl(finger, FingerCurl::FullCurl, 1.0)
            .curl(finger, FingerCurl::HalfCurl, 0.9);
    }
    pose
}

/// Classic two-finger victory sign.
fn victory() -> PoseDescription {
    let mut pose = PoseDescription::new(PoseId::Victory);
    for finger in [Finger::Index, Finger::Middle] {
        pose = pose
            .curl(finger, FingerCurl::NoCurl, 1.0)
            .direction(finger, FingerDirection::VerticalUp, 0.7)
            .direction(finger, FingerDirection::DiagonalUpLeft, 1.0)
            .direction(finger, FingerDirection::DiagonalUpRight, 1.0);
    }
    for finger in [Finger::Ring, Finger::Pinky] {
        pose = pose
            .curl(finger, FingerCurl::FullCurl, 1.0)
            .curl(finger, FingerCurl::HalfCurl, 0.9);
    }
    pose.curl(Finger::Thumb, FingerCurl::HalfCurl, 0.5)
        .curl(Finger::Thumb, FingerCurl::NoCurl, 0.5)
        .direction(Finger::Thumb, FingerDirection::VerticalUp, 1.0)
        .direction(Finger::Thumb, FingerDirection::DiagonalUpLeft, 1.0)
        .direction(Finger::Thumb, FingerDirection::DiagonalUpRight, 1.0)
}

/// Index finger only. The general matcher is unreliable for this pose;
/// the estimator's fingertip heuristic takes precedence over it.
fn one_finger() -> PoseDescription {
    let mut pose = PoseDescription::new(PoseId::OneFinger)
        .curl(Finger::Index, FingerCurl::NoCurl, 1.0)
        .curl(Finger::Index, FingerCurl::HalfCurl, 0.8)
        .direction(Finger::Index, FingerDirection::VerticalUp, 1.0)
        .direction(Finger::Index, FingerDirection::DiagonalUpLeft, 0.9)
        .direction(Finger::Index, FingerDirection::DiagonalUpRight, 0.9);
    for finger in [Finger::Thumb, Finger::Middle, Finger::Ring, Finger::Pinky] {
        pose = pose
            .curl(finger, FingerCurl::FullCurl, 1.0)
            .curl(finger, FingerCurl::HalfCurl, 0.8);
    }
    pose
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_runs_high_to_low_difficulty() {
        assert_eq!(
            POSE_SEQUENCE,
            [PoseId::ThreeFingers, PoseId::Victory, PoseId::OneFinger]
        );
        assert_eq!(POSE_SEQUENCE.map(|p| p.finger_count()), [3, 2, 1]);
    }

    #[test]
    fn test_library_covers_the_sequence() {
        let library = pose_library();
        for pose in POSE_SEQUENCE {
            assert!(library.iter().any(|d| d.id == pose));
        }
    }

    #[test]
    fn test_three_fingers_constrains_all_five_fingers() {
        let pose = three_fingers();
        for finger in crate::gesture::landmarks::FINGERS {
            assert!(pose.curls.iter().any(|(f, _, _)| *f == finger));
        }
    }
}
