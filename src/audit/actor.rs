use super::DifferenceSink;
use crate::audit::models::{DifferenceBatch, DifferenceRow};
use crate::audit::schema::PG_INIT;
use crate::config::AuditResolvedConfig;
use crate::error::AuditError;
use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

// 7 binds per row keeps a chunk well under the 65535 bind-parameter limit.
const INSERT_CHUNK_ROWS: usize = 1000;

#[derive(Debug)]
pub enum AuditActorMessage {
    /// Insert every object of the batch; replies with the number of rows written.
    Persist(DifferenceBatch, RpcReplyPort<Result<u64, AuditError>>),

    /// All rows of one run, in insertion order.
    ListRun(Uuid, RpcReplyPort<Result<Vec<DifferenceRow>, AuditError>>),
}

#[derive(Clone)]
pub struct AuditActorHandle {
    actor: ActorRef<AuditActorMessage>,
}

impl AuditActorHandle {
    pub async fn persist(&self, batch: DifferenceBatch) -> Result<u64, AuditError> {
        if batch.is_empty() {
            return Ok(0);
        }
        ractor::call!(self.actor, AuditActorMessage::Persist, batch)
            .map_err(|e| AuditError::RactorError(format!("AuditActor Persist RPC failed: {e}")))?
    }

    pub async fn list_run(&self, run_id: Uuid) -> Result<Vec<DifferenceRow>, AuditError> {
        ractor::call!(self.actor, AuditActorMessage::ListRun, run_id)
            .map_err(|e| AuditError::RactorError(format!("AuditActor ListRun RPC failed: {e}")))?
    }
}

#[async_trait]
impl DifferenceSink for AuditActorHandle {
    async fn persist(&self, batch: DifferenceBatch) -> Result<u64, AuditError> {
        AuditActorHandle::persist(self, batch).await
    }
}

struct AuditActorState {
    pool: PgPool,
}

struct AuditActor;

#[ractor::async_trait]
impl Actor for AuditActor {
    type Msg = AuditActorMessage;
    type State = AuditActorState;
    type Arguments = AuditResolvedConfig;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        cfg: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs.max(1)))
            .connect_lazy(&cfg.database_url)
            .map_err(|e| ActorProcessingErr::from(format!("invalid audit database url: {e}")))?;

        // The audit store being down must not keep the service from starting.
        if cfg.init_schema {
            if let Err(e) = apply_schema(&pool).await {
                warn!(error = %e, "AuditActor schema init failed; inserts will fail until it exists");
            }
        }

        info!("AuditActor initialized");
        Ok(AuditActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            AuditActorMessage::Persist(batch, reply) => {
                let res = self.insert_batch(&state.pool, &batch).await;
                let _ = reply.send(res);
            }
            AuditActorMessage::ListRun(run_id, reply) => {
                let res = self.list_run(&state.pool, run_id).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl AuditActor {
    async fn insert_batch(&self, pool: &PgPool, batch: &DifferenceBatch) -> Result<u64, AuditError> {
        let rows = batch.rows();
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await?;
        let mut written = 0u64;
        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO comparison_results \
                 (run_id, run_timestamp, object_kind, object_name, schema_name, status, source_db) ",
            );
            qb.push_values(chunk, |mut b, row| {
                b.push_bind(row.run_id)
                    .push_bind(row.run_timestamp)
                    .push_bind(row.object_kind.as_str())
                    .push_bind(row.object_name.as_str())
                    .push_bind(row.schema_name.as_str())
                    .push_bind(row.status.as_str())
                    .push_bind(row.source_db.as_str());
            });
            written += qb.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        debug!(
            run_id = %batch.run_id,
            kind = %batch.kind,
            status = batch.side.status(),
            rows = written,
            "Persisted differences"
        );
        Ok(written)
    }

    async fn list_run(&self, pool: &PgPool, run_id: Uuid) -> Result<Vec<DifferenceRow>, AuditError> {
        let rows = sqlx::query_as::<_, DifferenceRow>(
            r#"
        SELECT run_id, run_timestamp, object_kind, object_name, schema_name, status, source_db
        FROM comparison_results
        WHERE run_id = $1
        ORDER BY id
        "#,
        )
        .bind(run_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

/// Spawn the audit actor and return a cloneable handle.
///
/// The pool connects lazily, so this succeeds while the audit database is unreachable.
pub async fn spawn(cfg: &AuditResolvedConfig) -> Result<AuditActorHandle, AuditError> {
    let (actor, _jh) = Actor::spawn(Some("AuditActor".to_string()), AuditActor, cfg.clone())
        .await
        .map_err(|e| AuditError::RactorError(format!("failed to spawn AuditActor: {e}")))?;

    Ok(AuditActorHandle { actor })
}

async fn apply_schema(pool: &PgPool) -> Result<(), AuditError> {
    for stmt in PG_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
