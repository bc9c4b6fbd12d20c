pub mod clip_analyzer;
pub mod evaluator;
pub mod fallback;
pub mod managers;
pub mod progress;
pub mod provider;
pub mod random;

pub use clip_analyzer::ClipAnalyzer;
pub use evaluator::PoseEvaluator;
pub use fallback::FallbackEvaluator;
pub use managers::{InMemorySessionStore, SessionRecorder, SessionStore};
pub use progress::ProgressAggregator;
pub use provider::{DetectorBackend, LandmarkProvider, ProviderService, RemoteLandmarkProvider};
pub use random::RandomSource;
