use super::MetadataSource;
use crate::config::OracleConfig;
use crate::error::SourceError;
use async_trait::async_trait;
use dbcompare_core::{DatabaseObject, Dialect, ObjectDetails, ObjectKind};
use oracle::pool::{GetMode, Pool, PoolBuilder};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

const ALL_OBJECTS_SQL: &str = r#"
SELECT OBJECT_NAME, OBJECT_TYPE, OWNER, OWNER, STATUS,
       TO_CHAR(CREATED, 'YYYY-MM-DD HH24:MI:SS'),
       TO_CHAR(LAST_DDL_TIME, 'YYYY-MM-DD HH24:MI:SS')
FROM ALL_OBJECTS
WHERE OWNER = :1
ORDER BY OBJECT_TYPE, OBJECT_NAME
"#;

const TABLES_SQL: &str = r#"
SELECT OBJECT_NAME, 'TABLE', OWNER, OWNER, STATUS,
       TO_CHAR(CREATED, 'YYYY-MM-DD HH24:MI:SS'),
       TO_CHAR(LAST_DDL_TIME, 'YYYY-MM-DD HH24:MI:SS')
FROM ALL_OBJECTS
WHERE OWNER = :1 AND OBJECT_TYPE = 'TABLE'
ORDER BY OBJECT_NAME
"#;

const VIEWS_SQL: &str = r#"
SELECT OBJECT_NAME, 'VIEW', OWNER, OWNER, STATUS,
       TO_CHAR(CREATED, 'YYYY-MM-DD HH24:MI:SS'),
       TO_CHAR(LAST_DDL_TIME, 'YYYY-MM-DD HH24:MI:SS')
FROM ALL_OBJECTS
WHERE OWNER = :1 AND OBJECT_TYPE = 'VIEW'
ORDER BY OBJECT_NAME
"#;

const PROCEDURES_SQL: &str = r#"
SELECT OBJECT_NAME, 'PROCEDURE', OWNER, OWNER, STATUS,
       TO_CHAR(CREATED, 'YYYY-MM-DD HH24:MI:SS'),
       TO_CHAR(LAST_DDL_TIME, 'YYYY-MM-DD HH24:MI:SS')
FROM ALL_OBJECTS
WHERE OWNER = :1 AND OBJECT_TYPE = 'PROCEDURE'
ORDER BY OBJECT_NAME
"#;

const FUNCTIONS_SQL: &str = r#"
SELECT OBJECT_NAME, 'FUNCTION', OWNER, OWNER, STATUS,
       TO_CHAR(CREATED, 'YYYY-MM-DD HH24:MI:SS'),
       TO_CHAR(LAST_DDL_TIME, 'YYYY-MM-DD HH24:MI:SS')
FROM ALL_OBJECTS
WHERE OWNER = :1 AND OBJECT_TYPE = 'FUNCTION'
ORDER BY OBJECT_NAME
"#;

const SEQUENCES_SQL: &str = r#"
SELECT OBJECT_NAME, 'SEQUENCE', OWNER, OWNER, STATUS,
       TO_CHAR(CREATED, 'YYYY-MM-DD HH24:MI:SS'),
       TO_CHAR(LAST_DDL_TIME, 'YYYY-MM-DD HH24:MI:SS')
FROM ALL_OBJECTS
WHERE OWNER = :1 AND OBJECT_TYPE = 'SEQUENCE'
ORDER BY OBJECT_NAME
"#;

// ALL_CONSTRAINTS and ALL_INDEXES carry no CREATED / LAST_DDL_TIME columns.
const CONSTRAINTS_SQL: &str = r#"
SELECT CONSTRAINT_NAME,
       CASE CONSTRAINT_TYPE
           WHEN 'P' THEN 'PRIMARY KEY'
           WHEN 'U' THEN 'UNIQUE'
           WHEN 'C' THEN 'CHECK'
           WHEN 'R' THEN 'FOREIGN KEY'
           ELSE 'CONSTRAINT'
       END,
       OWNER, OWNER, STATUS,
       CAST(NULL AS VARCHAR2(19)),
       CAST(NULL AS VARCHAR2(19))
FROM ALL_CONSTRAINTS
WHERE OWNER = :1
ORDER BY CONSTRAINT_NAME
"#;

const INDEXES_SQL: &str = r#"
SELECT INDEX_NAME, 'INDEX', OWNER, OWNER, STATUS,
       CAST(NULL AS VARCHAR2(19)),
       CAST(NULL AS VARCHAR2(19))
FROM ALL_INDEXES
WHERE OWNER = :1
ORDER BY INDEX_NAME
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

/// Column order of every catalog query above:
/// name, type, schema, owner, status, created, last DDL time.
type OracleObjectRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn into_descriptor(row: OracleObjectRow) -> DatabaseObject {
    let (name, object_type, schema, owner, status, created, last_ddl_time) = row;
    DatabaseObject {
        name,
        object_type,
        schema,
        details: ObjectDetails::Oracle {
            owner,
            status: status.unwrap_or_default(),
            created,
            last_ddl_time,
        },
    }
}

/// A busy pool waits for a free session, up to the configured timeout.
fn session_get_mode(cfg: &OracleConfig) -> GetMode {
    GetMode::TimedWait(Duration::from_secs(cfg.acquire_timeout_secs.max(1)))
}

/// Catalog reader for Oracle.
///
/// OCI calls block, so every query runs on tokio's blocking pool. The session pool is
/// built on first use; a failed build is retried by the next call.
#[derive(Clone)]
pub struct OracleSource {
    settings: Arc<OracleConfig>,
    pool: Arc<Mutex<Option<Pool>>>,
}

impl OracleSource {
    pub fn new(cfg: OracleConfig) -> Self {
        Self {
            settings: Arc::new(cfg),
            pool: Arc::new(Mutex::new(None)),
        }
    }

    fn session_pool(&self) -> Result<Pool, SourceError> {
        let mut guard = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        let pool = PoolBuilder::new(
            self.settings.username.as_str(),
            self.settings.password.as_str(),
            self.settings.connect_string.as_str(),
        )
        .max_connections(self.settings.max_connections.max(1))
        .get_mode(session_get_mode(&self.settings))
        .build()?;

        info!(
            connect_string = %self.settings.connect_string,
            max_connections = self.settings.max_connections,
            acquire_timeout_secs = self.settings.acquire_timeout_secs,
            "Oracle session pool created"
        );
        *guard = Some(pool.clone());
        Ok(pool)
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T, SourceError>
    where
        T: Send + 'static,
        F: FnOnce(Pool) -> Result<T, SourceError> + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || job(this.session_pool()?))
            .await
            .map_err(|e| SourceError::new(Dialect::Oracle, format!("blocking task failed: {e}")))?
    }
}

#[async_trait]
impl MetadataSource for OracleSource {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    async fn ping(&self) -> Result<(), SourceError> {
        self.run_blocking(|pool| {
            let conn = pool.get()?;
            let _: i64 = conn.query_row_as("SELECT 1 FROM DUAL", &[])?;
            Ok(())
        })
        .await
    }

    async fn fetch_objects(
        &self,
        schema: &str,
        kind: ObjectKind,
    ) -> Result<Vec<DatabaseObject>, SourceError> {
        let owner = schema.to_string();
        let objects: Vec<DatabaseObject> = self
            .run_blocking(move |pool| {
                let conn = pool.get()?;
                let rows = conn.query_as::<OracleObjectRow>(catalog_query(kind), &[&owner])?;
                rows.map(|row| Ok(into_descriptor(row?))).collect()
            })
            .await?;

        debug!(schema, kind = %kind, count = objects.len(), "Fetched Oracle catalog objects");
        Ok(objects)
    }
}
