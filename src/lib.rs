pub mod audit;
pub mod config;
pub mod error;
pub mod report;
pub mod server;
pub mod service;
pub mod sources;
mod utils;

pub use error::{AuditError, CompareError, ReportError, SourceError};
pub use service::ComparisonService;
