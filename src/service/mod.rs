//! Comparison orchestration.

pub mod comparison;
pub mod run;

pub use comparison::{
    ComparisonReport, ComparisonRun, ComparisonService, HealthReport, ProbeStatus,
    SchemaComparison, TaskOutcome, report_filename,
};
pub use run::{RunContext, RunPhase};
