mod audit;
mod compare;
mod report;
mod source;

pub use audit::AuditError;
pub use compare::{ApiErrorBody, ApiErrorObject, CompareError};
pub use report::ReportError;
pub use source::SourceError;
