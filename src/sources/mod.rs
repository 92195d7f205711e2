//! Catalog readers for the two compared databases.
//!
//! Each source maps an [`ObjectKind`] to its own dialect query, so adding a kind means one
//! more match arm per source plus a catalog entry.

mod oracle;
mod postgres;

pub use self::oracle::OracleSource;
pub use self::postgres::PostgresSource;

use crate::error::SourceError;
use async_trait::async_trait;
use dbcompare_core::{DatabaseObject, Dialect, ObjectKind};

/// Read-only access to one database's catalog.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Trivial liveness query (`SELECT 1` or the dialect's equivalent).
    async fn ping(&self) -> Result<(), SourceError>;

    /// Objects of `kind` owned by `schema`, ordered by name (by type, then name, for
    /// [`ObjectKind::AllObjects`]). An unknown schema yields an empty list.
    async fn fetch_objects(
        &self,
        schema: &str,
        kind: ObjectKind,
    ) -> Result<Vec<DatabaseObject>, SourceError>;
}
