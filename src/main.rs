use posecoach::config::DetectorConfig;
use posecoach::pipeline::services::{DetectorBackend, RemoteLandmarkProvider};
use posecoach::{AppError, Configuration, CoordinatorBuilder};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn select_backend(detector: &DetectorConfig) -> DetectorBackend {
    match detector.remote_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => {
            let provider = RemoteLandmarkProvider::new(url);
            tracing::info!("Using remote landmark detector at {}", provider.endpoint());
            DetectorBackend::Real(Arc::new(provider))
        }
        _ => {
            tracing::warn!("No landmark detector configured, serving fallback verdicts");
            DetectorBackend::Fallback
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let configuration = Configuration::load()?;
    let backend = select_backend(&configuration.detector);
    let server = configuration.server.clone();

    let coordinator = CoordinatorBuilder::new(configuration)
        .backend(backend)
        .build()?;

    posecoach::api::serve(Arc::new(coordinator), &server).await
}
