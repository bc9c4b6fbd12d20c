use crate::capture::source::FrameSource;
use crate::common::Frame;
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Owns a capture thread that keeps the most recent frame from a [`FrameSource`].
pub struct CaptureClient {
    id: Uuid,
    source_name: &'static str,
    cancel_token: CancellationToken,
    capture_thread: Option<std::thread::JoinHandle<()>>,
    frame_rx: watch::Receiver<Option<Frame>>,
    frames_captured: Arc<AtomicU64>,
}

impl CaptureClient {
    /// Opens the source on the caller's thread, then starts the loop.
    pub fn start(mut source: Box<dyn FrameSource>, interval: Duration) -> Result<Self, AppError> {
        source.open()?;

        let id = Uuid::new_v4();
        let source_name = source.name();
        let cancel_token = CancellationToken::new();
        let (frame_tx, frame_rx) = watch::channel(None);
        let frames_captured = Arc::new(AtomicU64::new(0));

        let mut capture = CaptureLoop {
            id,
            source,
            frame_tx,
            frames_captured: frames_captured.clone(),
            interval,
        };
        let token = cancel_token.clone();
        let capture_thread = std::thread::Builder::new()
            .name(format!("capture-{}", id))
            .spawn(move || capture.run(token))
            .map_err(|e| AppError::Camera(format!("failed to spawn capture thread: {}", e)))?;

        Ok(Self {
            id,
            source_name,
            cancel_token,
            capture_thread: Some(capture_thread),
            frame_rx,
            frames_captured,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source_name(&self) -> &'static str {
        self.source_name
    }

    pub fn is_running(&self) -> bool {
        self.capture_thread.is_some() && !self.cancel_token.is_cancelled()
    }

    pub fn latest_frame(&self) -> Option<Frame> {
        self.frame_rx.borrow().clone()
    }

    pub fn frames_captured(&self) -> u64 {
        self.frames_captured.load(Ordering::Relaxed)
    }

    /// Cancels the loop and waits for the source to be released. Idempotent.
    pub fn stop(&mut self) {
        self.cancel_token.cancel();
        if let Some(thread) = self.capture_thread.take() {
            if thread.join().is_err() {
                tracing::error!("Capture thread {} panicked", self.id);
            }
        }
    }
}

impl Drop for CaptureClient {
    fn drop(&mut self) {
        self.stop();
    }
}

struct CaptureLoop {
    id: Uuid,
    source: Box<dyn FrameSource>,
    frame_tx: watch::Sender<Option<Frame>>,
    frames_captured: Arc<AtomicU64>,
    interval: Duration,
}

impl CaptureLoop {
    fn run(&mut self, cancel_token: CancellationToken) {
        tracing::info!(
            "Capture loop {} started on {}",
            self.id,
            self.source.name()
        );

        while !cancel_token.is_cancelled() {
            match self.source.read_frame() {
                Ok(image) => {
                    let frame = Frame::new(self.id, image, Utc::now(), Uuid::new_v4());
                    // Only the latest frame matters; older ones are overwritten.
                    self.frame_tx.send_replace(Some(frame));
                    self.frames_captured.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::warn!("Capture loop {} failed to read frame: {}", self.id, e);
                }
            }
            std::thread::sleep(self.interval);
        }

        self.source.release();
        tracing::info!("Capture loop {} stopped and released its source", self.id);
    }
}
