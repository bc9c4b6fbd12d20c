pub mod camera_manager;
pub mod capture_client;
pub mod source;

pub use camera_manager::{CameraManager, CameraStatus, SourceFactory};
pub use capture_client::CaptureClient;
pub use source::{FrameSource, TestPatternSource};
