use super::MetadataSource;
use crate::config::PostgresConfig;
use crate::error::SourceError;
use async_trait::async_trait;
use dbcompare_core::{DatabaseObject, Dialect, ObjectDetails, ObjectKind};
use sqlx::FromRow;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::debug;

/// Relations only (`pg_class`). Functions, procedures, packages, triggers and other
/// non-relation objects are never listed, so Oracle `ALL_OBJECTS` rows of those types
/// always land on the `Only in Oracle` side of the All Objects sheet. The typed
/// Procedure and Function tasks cover routines on both sides.
///
/// Postgres keeps no creation or DDL timestamps in its catalog; `created_at` and
/// `updated_at` carry the time the row was read, here and in every query below.
const ALL_OBJECTS_SQL: &str = r#"
SELECT c.relname::text AS name,
       CASE c.relkind
           WHEN 'r' THEN 'TABLE'
           WHEN 'p' THEN 'TABLE'
           WHEN 'v' THEN 'VIEW'
           WHEN 'm' THEN 'MATERIALIZED VIEW'
           WHEN 'i' THEN 'INDEX'
           WHEN 'I' THEN 'INDEX'
           WHEN 'S' THEN 'SEQUENCE'
           WHEN 'f' THEN 'FOREIGN TABLE'
           ELSE c.relkind::text
       END AS object_type,
       n.nspname::text AS schema,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
FROM pg_class c
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relkind IN ('r', 'p', 'v', 'm', 'i', 'I', 'S', 'f')
ORDER BY object_type, name
"#;

const TABLES_SQL: &str = r#"
SELECT c.relname::text AS name,
       'TABLE' AS object_type,
       n.nspname::text AS schema,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
FROM pg_class c
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relkind IN ('r', 'p')
ORDER BY c.relname
"#;

const VIEWS_SQL: &str = r#"
SELECT c.relname::text AS name,
       'VIEW' AS object_type,
       n.nspname::text AS schema,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
FROM pg_class c
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relkind = 'v'
ORDER BY c.relname
"#;

const PROCEDURES_SQL: &str = r#"
SELECT r.routine_name::text AS name,
       'PROCEDURE' AS object_type,
       r.routine_schema::text AS schema,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
FROM information_schema.routines r
WHERE r.routine_schema = $1
  AND r.routine_type = 'PROCEDURE'
ORDER BY r.routine_name
"#;

const FUNCTIONS_SQL: &str = r#"
SELECT p.proname::text AS name,
       'FUNCTION' AS object_type,
       n.nspname::text AS schema,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
FROM pg_proc p
JOIN pg_namespace n ON n.oid = p.pronamespace
WHERE n.nspname = $1
  AND p.prokind = 'f'
ORDER BY p.proname
"#;

const SEQUENCES_SQL: &str = r#"
SELECT c.relname::text AS name,
       'SEQUENCE' AS object_type,
       n.nspname::text AS schema,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
FROM pg_class c
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relkind = 'S'
ORDER BY c.relname
"#;

const CONSTRAINTS_SQL: &str = r#"
SELECT tc.constraint_name::text AS name,
       tc.constraint_type::text AS object_type,
       tc.constraint_schema::text AS schema,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
FROM information_schema.table_constraints tc
WHERE tc.constraint_schema = $1
ORDER BY tc.constraint_name
"#;

const INDEXES_SQL: &str = r#"
SELECT c.relname::text AS name,
       'INDEX' AS object_type,
       n.nspname::text AS schema,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
       to_char(CURRENT_TIMESTAMP, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
FROM pg_class c
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relkind IN ('i', 'I')
ORDER BY c.relname
"#;

pub(crate) fn catalog_query(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::AllObjects => ALL_OBJECTS_SQL,
        ObjectKind::Table => TABLES_SQL,
        ObjectKind::View => VIEWS_SQL,
        ObjectKind::Procedure => PROCEDURES_SQL,
        ObjectKind::Function => FUNCTIONS_SQL,
        ObjectKind::Sequence => SEQUENCES_SQL,
        ObjectKind::Constraint => CONSTRAINTS_SQL,
        ObjectKind::Index => INDEXES_SQL,
    }
}

#[derive(Debug, FromRow)]
struct PgObjectRow {
    name: String,
    object_type: String,
    schema: String,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl From<PgObjectRow> for DatabaseObject {
    fn from(row: PgObjectRow) -> Self {
        DatabaseObject {
            name: row.name,
            object_type: row.object_type.clone(),
            schema: row.schema.clone(),
            details: ObjectDetails::Postgres {
                schema_name: row.schema,
                object_type: row.object_type,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

/// Catalog reader for PostgreSQL backed by a lazily-connecting sqlx pool.
#[derive(Clone)]
pub struct PostgresSource {
    pool: PgPool,
}

impl PostgresSource {
    /// Builds the pool without connecting; the first query opens a connection.
    pub fn connect_lazy(cfg: &PostgresConfig) -> Result<Self, SourceError> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs.max(1)))
            .connect_lazy(&cfg.url)?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl MetadataSource for PostgresSource {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn ping(&self) -> Result<(), SourceError> {
        let _: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn fetch_objects(
        &self,
        schema: &str,
        kind: ObjectKind,
    ) -> Result<Vec<DatabaseObject>, SourceError> {
        let rows = sqlx::query_as::<_, PgObjectRow>(catalog_query(kind))
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;

        debug!(schema, kind = %kind, count = rows.len(), "Fetched PostgreSQL catalog objects");
        Ok(rows.into_iter().map(DatabaseObject::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_schema_filtered_query() {
        for kind in ObjectKind::ALL {
            let sql = catalog_query(kind);
            assert!(sql.contains("$1"), "{kind} query must bind the schema");
            assert!(sql.contains("ORDER BY"), "{kind} query must be ordered");
            assert!(sql.contains("CURRENT_TIMESTAMP"));
        }
    }

    #[test]
    fn typed_queries_label_their_kind() {
        assert!(catalog_query(ObjectKind::Table).contains("'TABLE' AS object_type"));
        assert!(catalog_query(ObjectKind::Sequence).contains("c.relkind = 'S'"));
        assert!(catalog_query(ObjectKind::Procedure).contains("routine_type = 'PROCEDURE'"));
        assert!(catalog_query(ObjectKind::Function).contains("prokind = 'f'"));
        assert!(catalog_query(ObjectKind::AllObjects).contains("ORDER BY object_type, name"));
    }

    #[test]
    fn all_objects_lists_relations_only() {
        let sql = catalog_query(ObjectKind::AllObjects);
        assert!(sql.contains("FROM pg_class c"));
        assert!(sql.contains("c.relkind IN ('r', 'p', 'v', 'm', 'i', 'I', 'S', 'f')"));
        assert!(!sql.contains("pg_proc"));
        assert!(!sql.contains("routines"));
    }

    #[test]
    fn row_maps_schema_into_details() {
        let obj = DatabaseObject::from(PgObjectRow {
            name: "orders".into(),
            object_type: "TABLE".into(),
            schema: "sales".into(),
            created_at: None,
            updated_at: None,
        });
        assert_eq!(obj.schema, "sales");
        assert_eq!(obj.dialect(), Dialect::Postgres);
        assert_eq!(obj, DatabaseObject::postgres("orders", "TABLE", "sales"));
    }
}
