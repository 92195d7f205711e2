use crate::service::RunContext;
use chrono::{DateTime, Utc};
use dbcompare_core::{DatabaseObject, DiffSide, ObjectKind};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row of `comparison_results`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DifferenceRow {
    pub run_id: Uuid,
    pub run_timestamp: DateTime<Utc>,
    pub object_kind: String,
    pub object_name: String,
    pub schema_name: String,
    pub status: String,
    pub source_db: String,
}

/// Objects of one kind found only on one side, tagged with the run they belong to.
#[derive(Debug, Clone)]
pub struct DifferenceBatch {
    pub run_id: Uuid,
    pub run_timestamp: DateTime<Utc>,
    pub kind: ObjectKind,
    pub side: DiffSide,
    pub objects: Vec<DatabaseObject>,
}

impl DifferenceBatch {
    pub fn new(
        context: &RunContext,
        kind: ObjectKind,
        side: DiffSide,
        objects: Vec<DatabaseObject>,
    ) -> Self {
        Self {
            run_id: context.run_id,
            run_timestamp: context.run_timestamp,
            kind,
            side,
            objects,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn rows(&self) -> Vec<DifferenceRow> {
        self.objects
            .iter()
            .map(|object| DifferenceRow {
                run_id: self.run_id,
                run_timestamp: self.run_timestamp,
                object_kind: self.kind.as_str().to_string(),
                object_name: object.name.clone(),
                schema_name: object.schema.clone(),
                status: self.side.status().to_string(),
                source_db: self.side.source_db().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_carry_run_tags_and_side_labels() {
        let context = RunContext::new("HR", "hr");
        let batch = DifferenceBatch::new(
            &context,
            ObjectKind::Table,
            DiffSide::OnlyInB,
            vec![
                DatabaseObject::postgres("pg_only", "TABLE", "hr"),
                DatabaseObject::postgres("audit_log", "TABLE", "hr"),
            ],
        );

        let rows = batch.rows();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.run_id, context.run_id);
            assert_eq!(row.run_timestamp, context.run_timestamp);
            assert_eq!(row.object_kind, "TABLE");
            assert_eq!(row.schema_name, "hr");
            assert_eq!(row.status, "Only in PostgreSQL");
            assert_eq!(row.source_db, "PostgreSQL");
        }
        assert_eq!(rows[0].object_name, "pg_only");
    }
}
