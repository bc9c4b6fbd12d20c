use crate::capture::capture_client::CaptureClient;
use crate::capture::source::{FrameSource, TestPatternSource};
use crate::common::Frame;
use crate::config::CameraConfig;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

pub type SourceFactory = Arc<dyn Fn(&CameraConfig) -> Box<dyn FrameSource> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraStatus {
    pub active: bool,
    pub source: Option<String>,
    pub frames_captured: u64,
    pub last_frame_at: Option<DateTime<Utc>>,
}

/// Owns at most one capture loop at a time.
pub struct CameraManager {
    config: CameraConfig,
    source_factory: SourceFactory,
    client: Mutex<Option<CaptureClient>>,
}

impl CameraManager {
    pub fn new(config: CameraConfig) -> Self {
        Self::with_source_factory(
            config,
            Arc::new(|config: &CameraConfig| {
                Box::new(TestPatternSource::new(config.width, config.height)) as Box<dyn FrameSource>
            }),
        )
    }

    pub fn with_source_factory(config: CameraConfig, source_factory: SourceFactory) -> Self {
        Self {
            config,
            source_factory,
            client: Mutex::new(None),
        }
    }

    /// Fails with [`AppError::CameraBusy`] while a loop is already running.
    pub fn start(&self) -> Result<CameraStatus, AppError> {
        let mut client = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if client.as_ref().is_some_and(CaptureClient::is_running) {
            return Err(AppError::CameraBusy);
        }

        let source = (self.source_factory)(&self.config);
        let started = CaptureClient::start(source, self.config.frame_interval())?;
        tracing::info!(
            "Camera started with {} ({}x{} every {}ms)",
            started.source_name(),
            self.config.width,
            self.config.height,
            self.config.frame_interval_ms
        );
        *client = Some(started);
        Ok(Self::describe(client.as_ref()))
    }

    /// Stops and releases the running loop. Returns whether one was running.
    /// Blocks until the capture thread exits. The lock is held until the source
    /// is released so a concurrent `start` cannot open a second one.
    pub fn stop(&self) -> bool {
        let mut client = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        match client.take() {
            Some(mut client) => {
                let was_running = client.is_running();
                client.stop();
                tracing::info!("Camera stopped after {} frames", client.frames_captured());
                was_running
            }
            None => false,
        }
    }

    pub fn status(&self) -> CameraStatus {
        let client = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        Self::describe(client.as_ref())
    }

    /// The most recent captured frame, if the camera is running and has produced one.
    pub fn latest_frame(&self) -> Option<Frame> {
        let client = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        client
            .as_ref()
            .filter(|client| client.is_running())
            .and_then(CaptureClient::latest_frame)
    }

    fn describe(client: Option<&CaptureClient>) -> CameraStatus {
        match client {
            Some(client) if client.is_running() => CameraStatus {
                active: true,
                source: Some(client.source_name().to_string()),
                frames_captured: client.frames_captured(),
                last_frame_at: client.latest_frame().map(|frame| frame.captured_at()),
            },
            _ => CameraStatus {
                active: false,
                source: None,
                frames_captured: 0,
                last_frame_at: None,
            },
        }
    }
}

impl Drop for CameraManager {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::capture_client::tests::TrackedSource;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    fn fast_config() -> CameraConfig {
        CameraConfig {
            frame_interval_ms: 2,
            width: 8,
            height: 8,
        }
    }

    fn tracked_manager() -> (CameraManager, Arc<Mutex<Vec<Arc<AtomicBool>>>>) {
        let released = Arc::new(Mutex::new(Vec::new()));
        let flags = released.clone();
        let manager = CameraManager::with_source_factory(
            fast_config(),
            Arc::new(move |_config: &CameraConfig| {
                let (source, flag) = TrackedSource::new();
                flags.lock().unwrap().push(flag);
                Box::new(source) as Box<dyn FrameSource>
            }),
        );
        (manager, released)
    }

    #[test]
    fn second_start_is_busy() {
        let manager = CameraManager::new(fast_config());
        let status = manager.start().unwrap();
        assert!(status.active);
        assert_eq!(status.source.as_deref(), Some("TestPatternSource"));
        assert!(matches!(manager.start(), Err(AppError::CameraBusy)));
        assert!(manager.stop());
    }

    #[test]
    fn stop_is_idempotent_and_releases() {
        let (manager, released) = tracked_manager();
        assert!(!manager.stop());

        manager.start().unwrap();
        assert!(manager.stop());
        assert!(!manager.stop());
        assert!(!manager.status().active);

        let flags = released.lock().unwrap();
        assert_eq!(flags.len(), 1);
        assert!(flags[0].load(Ordering::SeqCst));
    }

    /// Counts how many sources are open at the same time.
    struct CountingSource {
        inner: TestPatternSource,
        open: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
        opened: bool,
    }

    impl FrameSource for CountingSource {
        fn open(&mut self) -> Result<(), AppError> {
            self.inner.open()?;
            let now_open = self.open.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now_open, Ordering::SeqCst);
            self.opened = true;
            Ok(())
        }

        fn read_frame(&mut self) -> Result<image::DynamicImage, AppError> {
            self.inner.read_frame()
        }

        fn release(&mut self) {
            if self.opened {
                self.opened = false;
                self.inner.release();
                self.open.fetch_sub(1, Ordering::SeqCst);
            }
        }

        fn name(&self) -> &'static str {
            "CountingSource"
        }
    }

    #[test]
    fn start_during_stop_waits_for_release() {
        let open = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (factory_open, factory_peak) = (open.clone(), peak.clone());
        let manager = Arc::new(CameraManager::with_source_factory(
            CameraConfig {
                frame_interval_ms: 300,
                width: 8,
                height: 8,
            },
            Arc::new(move |_config: &CameraConfig| {
                Box::new(CountingSource {
                    inner: TestPatternSource::new(8, 8),
                    open: factory_open.clone(),
                    peak: factory_peak.clone(),
                    opened: false,
                }) as Box<dyn FrameSource>
            }),
        ));

        manager.start().unwrap();
        std::thread::sleep(Duration::from_millis(20));

        let stopper = {
            let manager = manager.clone();
            std::thread::spawn(move || manager.stop())
        };
        std::thread::sleep(Duration::from_millis(30));
        let restarted = manager.start();

        assert!(stopper.join().unwrap());
        assert!(restarted.is_ok());
        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(open.load(Ordering::SeqCst), 1);

        manager.stop();
        assert_eq!(open.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn restart_after_stop_is_allowed() {
        let (manager, released) = tracked_manager();
        manager.start().unwrap();
        manager.stop();
        manager.start().unwrap();
        manager.stop();
        assert_eq!(released.lock().unwrap().len(), 2);
    }

    #[test]
    fn latest_frame_follows_the_loop() {
        let manager = CameraManager::new(fast_config());
        assert!(manager.latest_frame().is_none());

        manager.start().unwrap();
        let mut frame = None;
        for _ in 0..200 {
            frame = manager.latest_frame();
            if frame.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(frame.map(|f| f.dimensions()), Some((8, 8)));
        assert!(manager.status().frames_captured >= 1);

        manager.stop();
        assert!(manager.latest_frame().is_none());
    }
}
