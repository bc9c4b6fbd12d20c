use crate::common::Frame;
use crate::error::AppError;
use crate::pipeline::domain::{Landmark, LandmarkName, PoseEstimate};
use crate::pipeline::services::provider::LandmarkProvider;
use async_trait::async_trait;
use image::{DynamicImage, ImageBuffer, Rgb};
use std::time::Duration;

/// Always answers with the same estimate (or no pose).
pub struct StaticProvider(pub Option<PoseEstimate>);

#[async_trait]
impl LandmarkProvider for StaticProvider {
    async fn detect(&self, _frame: &Frame) -> Result<Option<PoseEstimate>, AppError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &'static str {
        "StaticProvider"
    }
}

pub struct FailingProvider;

#[async_trait]
impl LandmarkProvider for FailingProvider {
    async fn detect(&self, _frame: &Frame) -> Result<Option<PoseEstimate>, AppError> {
        Err(AppError::DetectorUnavailable("model crashed".to_string()))
    }

    fn name(&self) -> &'static str {
        "FailingProvider"
    }
}

pub struct SlowProvider(pub Duration);

#[async_trait]
impl LandmarkProvider for SlowProvider {
    async fn detect(&self, _frame: &Frame) -> Result<Option<PoseEstimate>, AppError> {
        tokio::time::sleep(self.0).await;
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "SlowProvider"
    }
}

pub fn blank_frame() -> Frame {
    Frame::from_image(DynamicImage::ImageRgb8(
        ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(16, 16, Rgb([200, 200, 200])),
    ))
}

/// Three landmarks forming `degrees` at the vertex, all with the given visibility.
pub fn joint(
    (a, b, c): (LandmarkName, LandmarkName, LandmarkName),
    degrees: f64,
    visibility: f64,
) -> Vec<Landmark> {
    let (bx, by) = (0.5, 0.5);
    let r = 0.2;
    let theta = degrees.to_radians();
    vec![
        Landmark::new(a, bx + r, by, 0.0, visibility),
        Landmark::new(b, bx, by, 0.0, visibility),
        Landmark::new(c, bx + r * theta.cos(), by + r * theta.sin(), 0.0, visibility),
    ]
}

pub fn front_knee(degrees: f64, visibility: f64) -> PoseEstimate {
    PoseEstimate::new(joint(
        (
            LandmarkName::LeftHip,
            LandmarkName::LeftKnee,
            LandmarkName::LeftAnkle,
        ),
        degrees,
        visibility,
    ))
}
