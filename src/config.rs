use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "posecoach.toml";

/// Process-wide settings, loaded once at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub server: ServerConfig,
    pub evaluation: EvaluationConfig,
    pub fallback: FallbackConfig,
    pub detector: DetectorConfig,
    pub sessions: SessionConfig,
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Minimum mean landmark visibility for a frame to count as correct.
    pub correctness_floor: f64,
    /// Landmarks kept on a verdict for transport.
    pub landmark_cap: usize,
    pub provider_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub confidence_min: f64,
    pub confidence_max: f64,
    /// Probability that a fallback verdict reports the pose as correct.
    pub correct_bias: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub remote_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub anonymous_users: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub frame_interval_ms: u64,
    pub width: u32,
    pub height: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            correctness_floor: 0.7,
            landmark_cap: 15,
            provider_timeout_ms: 5000,
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            confidence_min: 0.65,
            confidence_max: 0.95,
            correct_bias: 0.75,
            seed: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            anonymous_users: vec!["anonymous".to_string(), "demo".to_string()],
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 100,
            width: 640,
            height: 480,
        }
    }
}

impl EvaluationConfig {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }
}

impl CameraConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Configuration {
    /// Loads from `POSECOACH_CONFIG` (or `posecoach.toml`) and `POSECOACH__*` env overrides.
    pub fn load() -> Result<Self, AppError> {
        let path =
            std::env::var("POSECOACH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self, AppError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("POSECOACH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let configuration: Configuration = settings.try_deserialize()?;
        configuration.validate().map_err(AppError::Config)?;
        Ok(configuration)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        let floor = self.evaluation.correctness_floor;
        if !(0.0..=1.0).contains(&floor) {
            return Err("Correctness floor must be between 0.0 and 1.0".to_string());
        }

        if self.evaluation.landmark_cap == 0 {
            return Err("Landmark cap must be greater than 0".to_string());
        }

        if self.evaluation.provider_timeout_ms == 0 {
            return Err("Provider timeout must be greater than 0".to_string());
        }

        let fallback = &self.fallback;
        let unit = 0.0..=1.0;
        if !unit.contains(&fallback.confidence_min)
            || !unit.contains(&fallback.confidence_max)
            || fallback.confidence_min > fallback.confidence_max
        {
            return Err("Fallback confidence range must be an ordered range within [0, 1]".to_string());
        }

        if !(0.0..=1.0).contains(&fallback.correct_bias) {
            return Err("Fallback correctness bias must be between 0.0 and 1.0".to_string());
        }

        if self.camera.frame_interval_ms == 0 {
            return Err("Camera frame interval must be greater than 0".to_string());
        }

        Ok(())
    }
}
