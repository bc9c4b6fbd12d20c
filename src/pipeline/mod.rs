pub mod analysis;
pub mod domain;
pub mod services;

pub use analysis::RuleCatalog;
pub use domain::{
    DetectorKind, Landmark, PoseEstimate, ProgressReport, SessionPage, SessionRecord,
    SessionSummary, Verdict,
};
