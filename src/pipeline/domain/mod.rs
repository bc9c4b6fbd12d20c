pub mod landmark;
pub mod session;
pub mod verdict;

pub use landmark::{Landmark, LandmarkName, PoseEstimate};
pub use session::{
    Pagination, ProgressReport, SessionOutcome, SessionPage, SessionRecord, StreakInfo,
};
pub use verdict::{DetectorKind, SessionSummary, Verdict};
