pub mod angle;
pub mod catalog;

pub use angle::{Point2, angle};
pub use catalog::{AngleCheck, PoseInfo, PoseRule, RangeOutcome, RuleCatalog};
