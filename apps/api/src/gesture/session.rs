//! The capture session state machine.
//!
//! Pure and tick-driven: the async driver feeds detection results in and
//! applies the timer outcomes back, so every transition rule here is
//! testable without a camera, a model, or a clock.
#![allow(dead_code)]

use bytes::Bytes;
use thiserror::Error;

use crate::gesture::landmarks::BoundingBox;
use crate::gesture::pose::{PoseId, POSE_SEQUENCE};

/// Detection polling period while in a detecting stage.
pub const DETECTION_INTERVAL_MS: u64 = 200;
/// Pause after a confirmed transition, giving the user time to react.
pub const SETTLE_DELAY_MS: u64 = 1000;
/// Countdown starting value; one decrement per second.
pub const COUNTDOWN_START: u32 = 3;
/// A best match must repeat on more than this many consecutive ticks
/// beyond its first observation before it is accepted.
pub const STABILITY_MIN_REPEATS: u32 = 2;

/// Where the session currently is. `Failed` is terminal until the capture
/// UI is remounted; `Review` is terminal unless the user retakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Ready,
    /// Index into [`POSE_SEQUENCE`].
    Detecting(usize),
    Countdown,
    Review,
    Failed,
}

/// Environment failures that end a session. Retained verbatim for display;
/// recovery is user-initiated (reopen the capture UI), never automatic.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("camera unavailable: {0}")]
    Camera(String),
    #[error("pose model failed to load: {0}")]
    ModelLoad(String),
    #[error("pose inference failed: {0}")]
    Inference(String),
    #[error("failed to encode captured frame: {0}")]
    Encode(String),
}

/// Outcome of feeding one detection tick into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not in a detecting stage, or paused for the settle delay.
    Inactive,
    /// No stable confirmation yet; keep polling.
    Pending,
    /// The expected pose was confirmed; the driver must pause detection
    /// for [`SETTLE_DELAY_MS`] and then call [`CaptureSession::finish_settle`].
    ConfirmedExpected,
    /// A pose was confirmed but it is not the one this stage expects.
    /// Ignored by design: polling continues, nothing fails or resets.
    ConfirmedOutOfOrder(PoseId),
}

/// Outcome of one countdown second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    Continue(u32),
    Capture,
}

#[derive(Debug)]
pub struct CaptureSession {
    stage: Stage,
    sequence: Vec<PoseId>,
    /// Best match seen on the previous tick, for the stability filter.
    last_best: Option<PoseId>,
    stable_count: u32,
    /// Last pose that survived the stability filter; drives the overlay.
    confirmed_pose: Option<PoseId>,
    bounding_box: Option<BoundingBox>,
    settling: bool,
    countdown: u32,
    captured: Option<Bytes>,
    error: Option<CaptureError>,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new(POSE_SEQUENCE.to_vec())
    }
}

impl CaptureSession {
    pub fn new(sequence: Vec<PoseId>) -> Self {
        Self {
            stage: Stage::Loading,
            sequence,
            last_best: None,
            stable_count: 0,
            confirmed_pose: None,
            bounding_box: None,
            settling: false,
            countdown: COUNTDOWN_START,
            captured: None,
            error: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn confirmed_pose(&self) -> Option<PoseId> {
        self.confirmed_pose
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn error(&self) -> Option<&CaptureError> {
        self.error.as_ref()
    }

    pub fn captured_image(&self) -> Option<&Bytes> {
        self.captured.as_ref()
    }

    /// The pose the current detecting stage is waiting for.
    pub fn expected_pose(&self) -> Option<PoseId> {
        match self.stage {
            Stage::Detecting(i) => self.sequence.get(i).copied(),
            _ => None,
        }
    }

    /// Pose model finished loading.
    pub fn model_ready(&mut self) {
        if self.stage == Stage::Loading {
            self.stage = Stage::Ready;
        }
    }

    /// Camera stream acquired and playing; detection may begin.
    pub fn stream_started(&mut self) {
        if self.stage == Stage::Ready {
            self.stage = Stage::Detecting(0);
        }
    }

    /// Environment failure: terminal until the capture UI is reopened.
    pub fn fail(&mut self, error: CaptureError) {
        self.stage = Stage::Failed;
        self.bounding_box = None;
        self.error = Some(error);
    }

    /// Feeds one detection tick: the best-matching pose for the current
    /// frame (None when no hand or no confident match) and the hand's
    /// bounding box.
    pub fn on_detection(
        &mut self,
        best: Option<PoseId>,
        bounding_box: Option<BoundingBox>,
    ) -> TickOutcome {
        if self.settling || !matches!(self.stage, Stage::Detecting(_)) {
            return TickOutcome::Inactive;
        }

        self.bounding_box = bounding_box;
        if bounding_box.is_none() {
            // No hand in frame: the overlay clears but the stability
            // streak is left untouched.
            return TickOutcome::Pending;
        }

        if best == self.last_best {
            self.stable_count += 1;
        } else {
            self.last_best = best;
            self.stable_count = 0;
        }

        let Some(pose) = best else {
            return TickOutcome::Pending;
        };
        if self.stable_count <= STABILITY_MIN_REPEATS {
            return TickOutcome::Pending;
        }

        self.confirmed_pose = Some(pose);
        if Some(pose) == self.expected_pose() {
            self.settling = true;
            TickOutcome::ConfirmedExpected
        } else {
            TickOutcome::ConfirmedOutOfOrder(pose)
        }
    }

    /// Ends the settle pause and advances to the next stage. The stability
    /// streak restarts for the new stage.
    pub fn finish_settle(&mut self) {
        if !self.settling {
            return;
        }
        self.settling = false;
        self.last_best = None;
        self.stable_count = 0;
        if let Stage::Detecting(i) = self.stage {
            self.stage = if i + 1 < self.sequence.len() {
                Stage::Detecting(i + 1)
            } else {
                self.bounding_box = None;
                Stage::Countdown
            };
        }
    }

    pub fn is_settling(&self) -> bool {
        self.settling
    }

    /// One countdown second. Exactly [`COUNTDOWN_START`] decrements happen
    /// before `Capture` is reported; detection is inactive throughout.
    pub fn countdown_tick(&mut self) -> CountdownStep {
        if self.stage != Stage::Countdown {
            return CountdownStep::Continue(self.countdown);
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            CountdownStep::Capture
        } else {
            CountdownStep::Continue(self.countdown)
        }
    }

    /// Stores the mirrored still and enters review. The driver releases
    /// the camera stream before calling this.
    pub fn complete_capture(&mut self, png: Bytes) {
        self.captured = Some(png);
        self.bounding_box = None;
        self.stage = Stage::Review;
    }

    /// Discards the capture and resets all pose/countdown/overlay state.
    /// The session returns to `Ready`, waiting for a fresh stream.
    pub fn retake(&mut self) {
        self.captured = None;
        self.countdown = COUNTDOWN_START;
        self.confirmed_pose = None;
        self.bounding_box = None;
        self.last_best = None;
        self.stable_count = 0;
        self.settling = false;
        self.stage = Stage::Ready;
    }

    /// Hands the captured image to the caller, ending the session.
    pub fn submit(&mut self) -> Option<Bytes> {
        self.captured.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::landmarks::BoundingBox;

    fn bbox() -> Option<BoundingBox> {
        Some(BoundingBox {
            top_left: [10.0, 10.0],
            bottom_right: [200.0, 200.0],
        })
    }

    fn started_session() -> CaptureSession {
        let mut session = CaptureSession::default();
        session.model_ready();
        session.stream_started();
        session
    }

    /// Feeds the same pose until the stability filter confirms it.
    fn confirm(session: &mut CaptureSession, pose: PoseId) -> TickOutcome {
        let mut outcome = TickOutcome::Pending;
        for _ in 0..=STABILITY_MIN_REPEATS + 1 {
            outcome = session.on_detection(Some(pose), bbox());
            if outcome != TickOutcome::Pending {
                break;
            }
        }
        outcome
    }

    #[test]
    fn test_happy_path_traverses_full_sequence() {
        let mut session = started_session();
        assert_eq!(session.stage(), Stage::Detecting(0));

        assert_eq!(confirm(&mut session, PoseId::ThreeFingers), TickOutcome::ConfirmedExpected);
        session.finish_settle();
        assert_eq!(session.stage(), Stage::Detecting(1));

        assert_eq!(confirm(&mut session, PoseId::Victory), TickOutcome::ConfirmedExpected);
        session.finish_settle();
        assert_eq!(session.stage(), Stage::Detecting(2));

        assert_eq!(confirm(&mut session, PoseId::OneFinger), TickOutcome::ConfirmedExpected);
        session.finish_settle();
        assert_eq!(session.stage(), Stage::Countdown);
    }

    #[test]
    fn test_out_of_order_pose_never_advances_and_never_errors() {
        let mut session = started_session();
        let outcome = confirm(&mut session, PoseId::OneFinger);
        assert_eq!(outcome, TickOutcome::ConfirmedOutOfOrder(PoseId::OneFinger));
        assert_eq!(session.stage(), Stage::Detecting(0));
        assert!(session.error().is_none());

        // Polling continues and the right pose still works afterwards.
        let outcome = confirm(&mut session, PoseId::ThreeFingers);
        assert_eq!(outcome, TickOutcome::ConfirmedExpected);
    }

    #[test]
    fn test_debounce_rejects_short_streaks() {
        let mut session = started_session();
        for _ in 0..=STABILITY_MIN_REPEATS {
            let outcome = session.on_detection(Some(PoseId::ThreeFingers), bbox());
            assert_eq!(outcome, TickOutcome::Pending);
        }
        // One more repeat crosses the threshold.
        assert_eq!(
            session.on_detection(Some(PoseId::ThreeFingers), bbox()),
            TickOutcome::ConfirmedExpected
        );
    }

    #[test]
    fn test_changing_pose_resets_the_streak() {
        let mut session = started_session();
        session.on_detection(Some(PoseId::ThreeFingers), bbox());
        session.on_detection(Some(PoseId::ThreeFingers), bbox());
        session.on_detection(Some(PoseId::Victory), bbox());
        // Back to three fingers: the old streak must not count.
        for _ in 0..=STABILITY_MIN_REPEATS {
            let outcome = session.on_detection(Some(PoseId::ThreeFingers), bbox());
            assert_eq!(outcome, TickOutcome::Pending);
        }
    }

    #[test]
    fn test_no_hand_clears_overlay_but_keeps_streak() {
        let mut session = started_session();
        session.on_detection(Some(PoseId::ThreeFingers), bbox());
        session.on_detection(None, None);
        assert!(session.bounding_box().is_none());
        session.on_detection(Some(PoseId::ThreeFingers), bbox());
        assert!(session.bounding_box().is_some());
    }

    #[test]
    fn test_detection_inactive_while_settling() {
        let mut session = started_session();
        confirm(&mut session, PoseId::ThreeFingers);
        assert!(session.is_settling());
        assert_eq!(
            session.on_detection(Some(PoseId::Victory), bbox()),
            TickOutcome::Inactive
        );
        session.finish_settle();
        assert_eq!(
            session.on_detection(Some(PoseId::Victory), bbox()),
            TickOutcome::Pending
        );
    }

    #[test]
    fn test_countdown_exact_decrements_then_capture() {
        let mut session = started_session();
        for pose in [PoseId::ThreeFingers, PoseId::Victory, PoseId::OneFinger] {
            confirm(&mut session, pose);
            session.finish_settle();
        }
        assert_eq!(session.stage(), Stage::Countdown);
        assert_eq!(session.countdown_tick(), CountdownStep::Continue(2));
        assert_eq!(session.countdown_tick(), CountdownStep::Continue(1));
        assert_eq!(session.countdown_tick(), CountdownStep::Capture);
    }

    #[test]
    fn test_detection_ignored_during_countdown() {
        let mut session = started_session();
        for pose in [PoseId::ThreeFingers, PoseId::Victory, PoseId::OneFinger] {
            confirm(&mut session, pose);
            session.finish_settle();
        }
        assert_eq!(
            session.on_detection(Some(PoseId::ThreeFingers), bbox()),
            TickOutcome::Inactive
        );
    }

    #[test]
    fn test_capture_enters_review_with_image() {
        let mut session = started_session();
        for pose in [PoseId::ThreeFingers, PoseId::Victory, PoseId::OneFinger] {
            confirm(&mut session, pose);
            session.finish_settle();
        }
        while session.countdown_tick() != CountdownStep::Capture {}
        session.complete_capture(Bytes::from_static(b"png"));
        assert_eq!(session.stage(), Stage::Review);
        assert!(session.captured_image().is_some());
    }

    #[test]
    fn test_retake_fully_resets_state() {
        let mut session = started_session();
        for pose in [PoseId::ThreeFingers, PoseId::Victory, PoseId::OneFinger] {
            confirm(&mut session, pose);
            session.finish_settle();
        }
        while session.countdown_tick() != CountdownStep::Capture {}
        session.complete_capture(Bytes::from_static(b"png"));

        session.retake();
        assert_eq!(session.stage(), Stage::Ready);
        assert_eq!(session.countdown(), COUNTDOWN_START);
        assert!(session.captured_image().is_none());
        assert!(session.confirmed_pose().is_none());
        assert!(session.bounding_box().is_none());

        // A fresh run restarts from the first pose with a clean streak.
        session.stream_started();
        assert_eq!(session.stage(), Stage::Detecting(0));
        assert_eq!(
            session.on_detection(Some(PoseId::ThreeFingers), bbox()),
            TickOutcome::Pending
        );
    }

    #[test]
    fn test_submit_hands_over_the_image_once() {
        let mut session = started_session();
        session.stage = Stage::Review;
        session.captured = Some(Bytes::from_static(b"png"));
        assert_eq!(session.submit(), Some(Bytes::from_static(b"png")));
        assert_eq!(session.submit(), None);
    }

    #[test]
    fn test_failure_is_terminal_and_keeps_reason() {
        let mut session = started_session();
        session.fail(CaptureError::Camera("device busy".to_string()));
        assert_eq!(session.stage(), Stage::Failed);
        assert_eq!(
            session.error(),
            Some(&CaptureError::Camera("device busy".to_string()))
        );
        assert_eq!(
            session.on_detection(Some(PoseId::ThreeFingers), bbox()),
            TickOutcome::Inactive
        );
    }
}
