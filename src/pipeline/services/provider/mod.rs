pub mod remote;
#[cfg(test)]
pub mod testing;

pub use remote::RemoteLandmarkProvider;

use crate::common::Frame;
use crate::error::AppError;
use crate::pipeline::domain::{DetectorKind, PoseEstimate};
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

/// Body-landmark detector. Returns `Ok(None)` when the frame holds no pose.
#[async_trait]
pub trait LandmarkProvider: Send + Sync {
    async fn detect(&self, frame: &Frame) -> Result<Option<PoseEstimate>, AppError>;
    fn name(&self) -> &'static str;
}

/// Detector capability chosen once at startup and injected into the evaluator.
#[derive(Clone)]
pub enum DetectorBackend {
    Real(Arc<dyn LandmarkProvider>),
    Fallback,
}

impl DetectorBackend {
    pub fn kind(&self) -> DetectorKind {
        match self {
            DetectorBackend::Real(_) => DetectorKind::Real,
            DetectorBackend::Fallback => DetectorKind::Fallback,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DetectorBackend::Real(provider) => provider.name(),
            DetectorBackend::Fallback => "FallbackProvider",
        }
    }
}

impl std::fmt::Debug for DetectorBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DetectorBackend").field(&self.name()).finish()
    }
}

/// Adapts a provider into a tower service so it can sit behind layers such as a timeout.
#[derive(Clone)]
pub struct ProviderService {
    inner: Arc<dyn LandmarkProvider>,
}

impl ProviderService {
    pub fn new(inner: Arc<dyn LandmarkProvider>) -> Self {
        Self { inner }
    }
}

impl Service<Frame> for ProviderService {
    type Response = Option<PoseEstimate>;
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Frame) -> Self::Future {
        let inner = self.inner.clone();
        Box::pin(async move { inner.detect(&req).await })
    }
}
