//! Async driver for the capture pipeline.
//!
//! Owns the timers and the camera/model collaborators, and feeds their
//! results into the [`CaptureSession`] state machine. The session lock is
//! never held across an await.
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::gesture::estimator::PoseEstimator;
use crate::gesture::landmarks::HandDetection;
use crate::gesture::overlay::{overlay_for, Overlay};
use crate::gesture::session::{
    CaptureError, CaptureSession, CountdownStep, Stage, TickOutcome, DETECTION_INTERVAL_MS,
    SETTLE_DELAY_MS,
};

/// One RGBA frame from the camera, tightly packed, 8 bits per channel.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Bytes,
}

/// Hand-pose inference backend.
#[async_trait]
pub trait HandPoseModel: Send + Sync {
    async fn load(&self) -> Result<(), CaptureError>;
    async fn estimate_hands(&self, frame: &Frame) -> Result<Vec<HandDetection>, CaptureError>;
}

/// A live video stream. `release` must stop the underlying device; after
/// it returns no hardware indicator may remain on.
#[async_trait]
pub trait VideoStream: Send {
    async fn latest_frame(&mut self) -> Result<Frame, CaptureError>;
    async fn release(&mut self);
}

/// Produces video streams on demand. Acquired again after a retake.
#[async_trait]
pub trait CameraSource: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn VideoStream>, CaptureError>;
}

/// Mirrors the frame horizontally and encodes it as PNG. The stored image
/// matches what the user saw in the (mirrored) live preview.
pub fn encode_mirrored_png(frame: &Frame) -> Result<Bytes, CaptureError> {
    let buffer = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba.to_vec())
        .ok_or_else(|| {
            CaptureError::Encode(format!(
                "frame buffer does not match {}x{} rgba dimensions",
                frame.width, frame.height
            ))
        })?;
    let mirrored = image::imageops::flip_horizontal(&buffer);
    let mut out = Cursor::new(Vec::new());
    mirrored
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;
    Ok(Bytes::from(out.into_inner()))
}

/// Drives one capture session end to end on a background task.
pub struct CaptureController {
    session: Arc<Mutex<CaptureSession>>,
    model: Arc<dyn HandPoseModel>,
    camera: Arc<dyn CameraSource>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl CaptureController {
    /// Spawns the pipeline: model load, stream acquisition, then the
    /// detection loop through to the captured still.
    pub fn start(model: Arc<dyn HandPoseModel>, camera: Arc<dyn CameraSource>) -> Self {
        let session = Arc::new(Mutex::new(CaptureSession::default()));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(drive(
            session.clone(),
            model.clone(),
            camera.clone(),
            cancel.clone(),
        ));
        Self {
            session,
            model,
            camera,
            cancel,
            handle: Some(handle),
        }
    }

    pub async fn stage(&self) -> Stage {
        self.session.lock().await.stage()
    }

    pub async fn overlay(&self) -> Option<Overlay> {
        overlay_for(&*self.session.lock().await)
    }

    pub async fn error(&self) -> Option<CaptureError> {
        self.session.lock().await.error().cloned()
    }

    /// Discards the reviewed still and restarts from the first pose with a
    /// freshly acquired stream. The model stays loaded.
    pub async fn retake(&mut self) {
        if let Some(handle) = self.handle.take() {
            // The previous run ends on its own once it reaches review.
            let _ = handle.await;
        }
        self.session.lock().await.retake();
        self.handle = Some(tokio::spawn(run_capture(
            self.session.clone(),
            self.model.clone(),
            self.camera.clone(),
            self.cancel.clone(),
        )));
    }

    /// Takes the captured image out of the session, if review reached.
    pub async fn submit(&self) -> Option<Bytes> {
        self.session.lock().await.submit()
    }

    /// Cancels the pipeline and waits for teardown. No tick runs after
    /// this returns, and the stream has been released.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

async fn drive(
    session: Arc<Mutex<CaptureSession>>,
    model: Arc<dyn HandPoseModel>,
    camera: Arc<dyn CameraSource>,
    cancel: CancellationToken,
) {
    if let Err(e) = model.load().await {
        warn!("pose model load failed: {e}");
        session.lock().await.fail(e);
        return;
    }
    session.lock().await.model_ready();
    info!("pose model ready");

    run_capture(session, model, camera, cancel).await;
}

/// One capture run: stream acquisition through review. Returns when the
/// still is captured, the session fails, or the controller cancels.
async fn run_capture(
    session: Arc<Mutex<CaptureSession>>,
    model: Arc<dyn HandPoseModel>,
    camera: Arc<dyn CameraSource>,
    cancel: CancellationToken,
) {
    let mut stream = match camera.acquire().await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("camera acquisition failed: {e}");
            session.lock().await.fail(e);
            return;
        }
    };
    session.lock().await.stream_started();
    debug!("camera stream started");

    let estimator = PoseEstimator::default();
    let mut ticker = tokio::time::interval(Duration::from_millis(DETECTION_INTERVAL_MS));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                stream.release().await;
                return;
            }
            _ = ticker.tick() => {}
        }

        let frame = match stream.latest_frame().await {
            Ok(frame) => frame,
            Err(e) => {
                stream.release().await;
                session.lock().await.fail(e);
                return;
            }
        };
        let detections = match model.estimate_hands(&frame).await {
            Ok(detections) => detections,
            Err(e) => {
                stream.release().await;
                session.lock().await.fail(e);
                return;
            }
        };

        let hand = detections.first();
        let best = hand.and_then(|h| estimator.best_match(h));
        let bbox = hand.map(|h| h.bounding_box);
        let outcome = session
            .lock()
            .await
            .on_detection(best.map(|b| b.pose), bbox);

        if let TickOutcome::ConfirmedOutOfOrder(pose) = outcome {
            debug!("ignoring out-of-order pose {}", pose.name());
        }
        if outcome != TickOutcome::ConfirmedExpected {
            continue;
        }

        // Stable confirmation: pause, then advance.
        tokio::select! {
            _ = cancel.cancelled() => {
                stream.release().await;
                return;
            }
            _ = tokio::time::sleep(Duration::from_millis(SETTLE_DELAY_MS)) => {}
        }
        let stage = {
            let mut session = session.lock().await;
            session.finish_settle();
            session.stage()
        };
        if stage != Stage::Countdown {
            ticker.reset();
            continue;
        }

        info!("pose sequence complete, starting countdown");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    stream.release().await;
                    return;
                }
                _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            }
            if session.lock().await.countdown_tick() == CountdownStep::Capture {
                break;
            }
        }

        let frame = match stream.latest_frame().await {
            Ok(frame) => frame,
            Err(e) => {
                stream.release().await;
                session.lock().await.fail(e);
                return;
            }
        };
        let png = match encode_mirrored_png(&frame) {
            Ok(png) => png,
            Err(e) => {
                stream.release().await;
                session.lock().await.fail(e);
                return;
            }
        };
        // Device released before review so no camera indicator lingers.
        stream.release().await;
        session.lock().await.complete_capture(png);
        info!("still captured, session in review");
        return;
    }
}
