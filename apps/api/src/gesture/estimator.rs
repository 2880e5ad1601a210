//! Weighted pose matching over a landmark set, plus the one-finger
//! fingertip heuristic that overrides the general matcher.
#![allow(dead_code)]

use crate::gesture::landmarks::{
    curl_of, direction_of, HandDetection, Landmark, FINGERS, FINGERTIPS, KNUCKLES,
};
use crate::gesture::pose::{pose_library, PoseDescription, PoseId};

/// Minimum confidence (0–10 scale) for the general matcher to report a pose.
pub const MIN_CONFIDENCE: f32 = 6.0;

/// Vertical pixel margin by which a fingertip must clear its knuckle to
/// count as extended in the one-finger heuristic.
const EXTENDED_MARGIN_PX: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseMatch {
    pub pose: PoseId,
    pub score: f32,
}

/// How a best match was produced, retained for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Matcher,
    Heuristic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    pub pose: PoseId,
    pub score: f32,
    pub source: MatchSource,
}

pub struct PoseEstimator {
    library: Vec<PoseDescription>,
}

impl Default for PoseEstimator {
    fn default() -> Self {
        Self::new(pose_library())
    }
}

impl PoseEstimator {
    pub fn new(library: Vec<PoseDescription>) -> Self {
        Self { library }
    }

    /// Ranks every pose scoring at or above `min_confidence`, best first.
    /// Ties break toward the higher aggregate score, so ordering is total.
    pub fn estimate(&self, landmarks: &[Landmark], min_confidence: f32) -> Vec<PoseMatch> {
        let mut matches: Vec<PoseMatch> = self
            .library
            .iter()
            .map(|desc| PoseMatch {
                pose: desc.id,
                score: score_pose(desc, landmarks),
            })
            .filter(|m| m.score >= min_confidence)
            .collect();
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches
    }

    /// The single best-matching pose for one detection.
    ///
    /// The fingertip heuristic for the one-finger pose runs first and wins
    /// outright when it fires; the weighted matcher handles everything else.
    pub fn best_match(&self, detection: &HandDetection) -> Option<BestMatch> {
        if index_finger_up(&detection.landmarks) {
            return Some(BestMatch {
                pose: PoseId::OneFinger,
                score: 10.0,
                source: MatchSource::Heuristic,
            });
        }
        self.estimate(&detection.landmarks, MIN_CONFIDENCE)
            .first()
            .map(|m| BestMatch {
                pose: m.pose,
                score: m.score,
                source: MatchSource::Matcher,
            })
    }
}

/// Index fingertip clearly above its knuckle while middle/ring/pinky are not.
pub fn index_finger_up(landmarks: &[Landmark]) -> bool {
    let extended: Vec<bool> = FINGERTIPS
        .iter()
        .zip(KNUCKLES.iter())
        .map(|(&tip, &knuckle)| landmarks[tip][1] < landmarks[knuckle][1] - EXTENDED_MARGIN_PX)
        .collect();
    extended[0] && !extended[1] && !extended[2] && !extended[3]
}

/// Scores one pose description against an observed hand, 0–10.
///
/// Per finger: an observed curl listed in the description contributes its
/// weight; an unlisted observation costs the finger's best listed weight.
/// Directions score the same way, only over fingers the description
/// constrains. The sum is normalized by the best attainable total.
fn score_pose(desc: &PoseDescription, landmarks: &[Landmark]) -> f32 {
    let mut attainable = 0.0_f32;
    let mut accumulated = 0.0_f32;

    for finger in FINGERS {
        let curls: Vec<_> = desc.curls.iter().filter(|(f, _, _)| *f == finger).collect();
        if !curls.is_empty() {
            let best = curls.iter().map(|(_, _, w)| *w).fold(0.0_f32, f32::max);
            attainable += best;
            let observed = curl_of(landmarks, finger);
            match curls.iter().find(|(_, c, _)| *c == observed) {
                Some((_, _, weight)) => accumulated += weight,
                None => accumulated -= best,
            }
        }

        let directions: Vec<_> = desc
            .directions
            .iter()
            .filter(|(f, _, _)| *f == finger)
            .collect();
        if !directions.is_empty() {
            let best = directions.iter().map(|(_, _, w)| *w).fold(0.0_f32, f32::max);
            attainable += best;
            let observed = direction_of(landmarks, finger);
            match directions.iter().find(|(_, d, _)| *d == observed) {
                Some((_, _, weight)) => accumulated += weight,
                None => accumulated -= best,
            }
        }
    }

    if attainable <= 0.0 {
        return 0.0;
    }
    (accumulated / attainable).max(0.0) * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::landmarks::fixtures::{detection, hand, FingerShape};

    const UP: FingerShape = FingerShape::Up;
    const CURLED: FingerShape = FingerShape::Curled;

    #[test]
    fn test_three_fingers_ranks_first_for_three_raised() {
        let estimator = PoseEstimator::default();
        let landmarks = hand([CURLED, UP, UP, UP, CURLED]);
        let matches = estimator.estimate(&landmarks, MIN_CONFIDENCE);
        assert_eq!(matches.first().map(|m| m.pose), Some(PoseId::ThreeFingers));
    }

    #[test]
    fn test_victory_ranks_first_for_two_raised() {
        let estimator = PoseEstimator::default();
        let landmarks = hand([UP, UP, UP, CURLED, CURLED]);
        let matches = estimator.estimate(&landmarks, MIN_CONFIDENCE);
        assert_eq!(matches.first().map(|m| m.pose), Some(PoseId::Victory));
    }

    #[test]
    fn test_perfect_three_finger_hand_scores_full_confidence() {
        let library = pose_library();
        let three = library
            .iter()
            .find(|d| d.id == PoseId::ThreeFingers)
            .unwrap();
        let landmarks = hand([CURLED, UP, UP, UP, CURLED]);
        let score = score_pose(three, &landmarks);
        assert!(score > 9.5, "expected near-perfect score, got {score}");
    }

    #[test]
    fn test_fist_matches_nothing_above_threshold() {
        let estimator = PoseEstimator::default();
        let landmarks = hand([CURLED; 5]);
        assert!(estimator.estimate(&landmarks, MIN_CONFIDENCE).is_empty());
    }

    #[test]
    fn test_heuristic_fires_for_lone_index() {
        let landmarks = hand([CURLED, UP, CURLED, CURLED, CURLED]);
        assert!(index_finger_up(&landmarks));
    }

    #[test]
    fn test_heuristic_rejects_two_raised_fingers() {
        let landmarks = hand([CURLED, UP, UP, CURLED, CURLED]);
        assert!(!index_finger_up(&landmarks));
    }

    #[test]
    fn test_heuristic_overrides_general_matcher() {
        let estimator = PoseEstimator::default();
        let best = estimator
            .best_match(&detection([CURLED, UP, CURLED, CURLED, CURLED]))
            .unwrap();
        assert_eq!(best.pose, PoseId::OneFinger);
        assert_eq!(best.source, MatchSource::Heuristic);
    }

    #[test]
    fn test_matcher_used_when_heuristic_silent() {
        let estimator = PoseEstimator::default();
        let best = estimator
            .best_match(&detection([CURLED, UP, UP, UP, CURLED]))
            .unwrap();
        assert_eq!(best.pose, PoseId::ThreeFingers);
        assert_eq!(best.source, MatchSource::Matcher);
    }

    #[test]
    fn test_no_match_for_fist() {
        let estimator = PoseEstimator::default();
        assert!(estimator.best_match(&detection([CURLED; 5])).is_none());
    }
}
