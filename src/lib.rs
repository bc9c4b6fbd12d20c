pub mod api;
pub mod capture;
pub mod common;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod pipeline;

pub use config::Configuration;
pub use coordinator::{Coordinator, CoordinatorBuilder};
pub use error::{AppError, GeometryError};
