//! Gesture Capture Pipeline.
//!
//! Drives a camera feed through model loading, a sequential pose
//! confirmation sequence (three fingers → victory → one finger), a
//! countdown, and a mirrored still capture with review/retake/submit.
//!
//! The pose model and the camera are opaque capabilities injected at
//! construction (`driver`); the state machine itself (`session`) is pure
//! and tick-driven so every transition rule is testable without timers.

pub mod driver;
pub mod estimator;
pub mod landmarks;
pub mod overlay;
pub mod pose;
pub mod session;
