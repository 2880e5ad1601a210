//! Bounding-box overlay drawn on the live preview.
#![allow(dead_code)]

use serde::Serialize;

use crate::gesture::landmarks::BoundingBox;
use crate::gesture::pose::PoseId;
use crate::gesture::session::{CaptureSession, Stage};

pub const COLOR_MATCH: &str = "#059669";
pub const COLOR_MISMATCH: &str = "#DC2626";
pub const LABEL_UNDETECTED: &str = "Undetected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayColor {
    Match,
    Mismatch,
}

impl OverlayColor {
    pub fn css(&self) -> &'static str {
        match self {
            OverlayColor::Match => COLOR_MATCH,
            OverlayColor::Mismatch => COLOR_MISMATCH,
        }
    }
}

/// What the preview should draw around the detected hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub bounding_box: BoundingBox,
    pub color: OverlayColor,
    pub label: String,
}

/// Builds the overlay for the session's current state, or `None` when
/// nothing should be drawn: no hand in frame, or a stage (countdown,
/// review, failure) where the preview must stay clean.
pub fn overlay_for(session: &CaptureSession) -> Option<Overlay> {
    if !matches!(session.stage(), Stage::Detecting(_)) {
        return None;
    }
    let bounding_box = session.bounding_box()?;
    let expected = session.expected_pose()?;

    let matched = session.confirmed_pose() == Some(expected);
    let (color, label) = if matched {
        (OverlayColor::Match, pose_label(expected))
    } else {
        (OverlayColor::Mismatch, LABEL_UNDETECTED.to_string())
    };

    Some(Overlay {
        bounding_box,
        color,
        label,
    })
}

fn pose_label(pose: PoseId) -> String {
    format!("Pose {}", pose.finger_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::session::TickOutcome;

    fn bbox() -> Option<BoundingBox> {
        Some(BoundingBox {
            top_left: [0.0, 0.0],
            bottom_right: [100.0, 100.0],
        })
    }

    fn detecting_session() -> CaptureSession {
        let mut session = CaptureSession::default();
        session.model_ready();
        session.stream_started();
        session
    }

    fn confirm(session: &mut CaptureSession, pose: PoseId) {
        loop {
            if session.on_detection(Some(pose), bbox()) != TickOutcome::Pending {
                break;
            }
        }
    }

    #[test]
    fn test_no_hand_means_no_overlay() {
        let session = detecting_session();
        assert_eq!(overlay_for(&session), None);
    }

    #[test]
    fn test_unconfirmed_hand_is_red_undetected() {
        let mut session = detecting_session();
        session.on_detection(Some(PoseId::ThreeFingers), bbox());
        let overlay = overlay_for(&session).unwrap();
        assert_eq!(overlay.color, OverlayColor::Mismatch);
        assert_eq!(overlay.label, LABEL_UNDETECTED);
        assert_eq!(overlay.color.css(), COLOR_MISMATCH);
    }

    #[test]
    fn test_confirmed_expected_pose_is_green_with_finger_count() {
        let mut session = detecting_session();
        confirm(&mut session, PoseId::ThreeFingers);
        let overlay = overlay_for(&session).unwrap();
        assert_eq!(overlay.color, OverlayColor::Match);
        assert_eq!(overlay.label, "Pose 3");
        assert_eq!(overlay.color.css(), COLOR_MATCH);
    }

    #[test]
    fn test_out_of_order_confirmation_stays_red() {
        let mut session = detecting_session();
        confirm(&mut session, PoseId::OneFinger);
        let overlay = overlay_for(&session).unwrap();
        assert_eq!(overlay.color, OverlayColor::Mismatch);
        assert_eq!(overlay.label, LABEL_UNDETECTED);
    }

    #[test]
    fn test_suppressed_outside_detection_stages() {
        let mut session = detecting_session();
        for pose in [PoseId::ThreeFingers, PoseId::Victory, PoseId::OneFinger] {
            confirm(&mut session, pose);
            session.finish_settle();
        }
        assert_eq!(session.stage(), Stage::Countdown);
        assert_eq!(overlay_for(&session), None);
    }
}
