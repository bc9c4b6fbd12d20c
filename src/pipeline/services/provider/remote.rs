use crate::common::Frame;
use crate::error::AppError;
use crate::pipeline::domain::{Landmark, LandmarkName, PoseEstimate};
use crate::pipeline::services::provider::LandmarkProvider;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Delegates detection to an external landmark service over HTTP.
///
/// The service receives `{image, width, height}` with a base64 PNG and answers
/// `{landmarks: [...]}`. A missing, null or empty list means no pose was found.
pub struct RemoteLandmarkProvider {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct DetectRequest {
    image: String,
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct DetectResponse {
    #[serde(default)]
    landmarks: Option<Vec<RemoteLandmark>>,
}

#[derive(Debug, Deserialize)]
struct RemoteLandmark {
    #[serde(default)]
    name: Option<String>,
    x: f64,
    y: f64,
    #[serde(default)]
    z: f64,
    #[serde(default = "full_visibility")]
    visibility: f64,
}

fn full_visibility() -> f64 {
    1.0
}

impl RemoteLandmarkProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LandmarkProvider for RemoteLandmarkProvider {
    async fn detect(&self, frame: &Frame) -> Result<Option<PoseEstimate>, AppError> {
        let (width, height) = frame.dimensions();
        let request = DetectRequest {
            image: STANDARD.encode(frame.to_png_bytes()?),
            width,
            height,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::DetectorUnavailable(e.to_string()))?;

        let body: DetectResponse = response
            .json()
            .await
            .map_err(|e| AppError::DetectorUnavailable(format!("bad detector response: {}", e)))?;

        Ok(into_estimate(body.landmarks.unwrap_or_default()))
    }

    fn name(&self) -> &'static str {
        "RemoteLandmarkProvider"
    }
}

// Unnamed landmarks take their canonical name from their position in the body model.
fn into_estimate(raw: Vec<RemoteLandmark>) -> Option<PoseEstimate> {
    if raw.is_empty() {
        return None;
    }
    let landmarks = raw
        .into_iter()
        .enumerate()
        .map(|(idx, lm)| {
            let name = lm.name.unwrap_or_else(|| {
                LandmarkName::from_index(idx)
                    .map(|n| n.as_str().to_string())
                    .unwrap_or_else(|| format!("landmark_{}", idx))
            });
            Landmark {
                name,
                x: lm.x,
                y: lm.y,
                z: lm.z,
                visibility: lm.visibility.clamp(0.0, 1.0),
            }
        })
        .collect();
    Some(PoseEstimate::new(landmarks))
}
