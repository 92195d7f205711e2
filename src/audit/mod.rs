//! Audit store: append-only record of every difference found by a run.
//!
//! Layout:
//! - `models.rs`: batch handed in by the orchestrator and the persisted row
//! - `schema.rs`: Postgres DDL for `comparison_results`
//! - `actor.rs`: ractor actor owning the audit pool

pub mod actor;
pub mod models;
pub mod schema;

pub use actor::{AuditActorHandle, spawn};
pub use models::{DifferenceBatch, DifferenceRow};
pub use schema::PG_INIT;

use crate::error::AuditError;
use async_trait::async_trait;

/// Destination for one side's differences of one object kind.
#[async_trait]
pub trait DifferenceSink: Send + Sync {
    /// Writes every object of `batch` as one row and returns the number of rows written.
    /// An empty batch writes nothing and returns `0`.
    async fn persist(&self, batch: DifferenceBatch) -> Result<u64, AuditError>;
}
