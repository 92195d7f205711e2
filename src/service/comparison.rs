use crate::audit::{DifferenceBatch, DifferenceSink};
use crate::config::CompareConfig;
use crate::error::CompareError;
use crate::report::ReportBuilder;
use crate::service::run::{RunContext, RunPhase};
use crate::sources::MetadataSource;
use crate::utils::logging::debug_pretty_json;
use dbcompare_core::{
    ComparisonResult, ComparisonTask, DatabaseObject, DiffSide, MatchStrategy, ObjectKind,
    TASK_CATALOG, compare,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const ORACLE_LISTING_SHEET: &str = "Oracle Objects";
pub const POSTGRES_LISTING_SHEET: &str = "PostgreSQL Objects";

/// One catalog entry after both sides were fetched and compared.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub task: ComparisonTask,
    pub result: ComparisonResult,
}

/// Everything a completed run produced, ready to be rendered.
#[derive(Debug, Clone)]
pub struct ComparisonRun {
    pub context: RunContext,
    pub strategy: MatchStrategy,
    /// The `ALL_OBJECTS` fetch of each side, used for the listing sheets.
    pub oracle_objects: Vec<DatabaseObject>,
    pub postgres_objects: Vec<DatabaseObject>,
    pub outcomes: Vec<TaskOutcome>,
    pub persisted_rows: u64,
    pub persistence_failures: usize,
}

impl ComparisonRun {
    pub fn outcome(&self, kind: ObjectKind) -> Option<&TaskOutcome> {
        self.outcomes.iter().find(|o| o.task.kind == kind)
    }
}

pub struct ComparisonReport {
    pub run_id: Uuid,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Read-only `ALL_OBJECTS` comparison, nothing persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaComparison {
    pub oracle_objects: Vec<DatabaseObject>,
    pub postgres_objects: Vec<DatabaseObject>,
    pub missing_in_postgres: Vec<DatabaseObject>,
    pub missing_in_oracle: Vec<DatabaseObject>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub oracle: ProbeStatus,
    pub postgres: ProbeStatus,
}

impl HealthReport {
    pub fn is_up(&self) -> bool {
        self.oracle == ProbeStatus::Up && self.postgres == ProbeStatus::Up
    }
}

/// Runs comparisons: connectivity check, per-task fetch/compare/persist, report.
pub struct ComparisonService {
    oracle: Arc<dyn MetadataSource>,
    postgres: Arc<dyn MetadataSource>,
    sink: Arc<dyn DifferenceSink>,
    options: CompareConfig,
}

impl ComparisonService {
    pub fn new(
        oracle: Arc<dyn MetadataSource>,
        postgres: Arc<dyn MetadataSource>,
        sink: Arc<dyn DifferenceSink>,
        options: CompareConfig,
    ) -> Self {
        Self {
            oracle,
            postgres,
            sink,
            options,
        }
    }

    /// Pings Oracle, then PostgreSQL. PostgreSQL is not contacted when Oracle is down.
    pub async fn check_connections(&self) -> Result<(), CompareError> {
        self.oracle.ping().await.map_err(CompareError::connectivity)?;
        self.postgres
            .ping()
            .await
            .map_err(CompareError::connectivity)?;
        Ok(())
    }

    pub async fn health(&self) -> HealthReport {
        HealthReport {
            oracle: probe(self.oracle.as_ref()).await,
            postgres: probe(self.postgres.as_ref()).await,
        }
    }

    /// Full run without rendering: every catalog task fetched, compared and persisted.
    pub async fn run(
        &self,
        oracle_schema: &str,
        postgres_schema: &str,
    ) -> Result<ComparisonRun, CompareError> {
        let res = self.run_tasks(oracle_schema, postgres_schema).await;
        if let Err(e) = &res {
            error!(phase = %RunPhase::Failed, error = %e, "Comparison run failed");
        }
        res
    }

    pub async fn generate_report(
        &self,
        oracle_schema: &str,
        postgres_schema: &str,
    ) -> Result<ComparisonReport, CompareError> {
        let run = self.run(oracle_schema, postgres_schema).await?;

        info!(run_id = %run.context.run_id, phase = %RunPhase::BuildingReport, "Comparison run phase");
        let bytes = self.build_report(&run).finish().map_err(|e| {
            error!(run_id = %run.context.run_id, phase = %RunPhase::Failed, error = %e, "Report generation failed");
            CompareError::from(e)
        })?;

        info!(
            run_id = %run.context.run_id,
            phase = %RunPhase::Done,
            bytes = bytes.len(),
            "Comparison run phase"
        );
        Ok(ComparisonReport {
            run_id: run.context.run_id,
            filename: report_filename(&run.context.oracle_schema, &run.context.postgres_schema),
            bytes,
        })
    }

    /// Sheet models for a finished run: listings (when enabled), one difference sheet per
    /// catalog task, then the summary.
    pub fn build_report(&self, run: &ComparisonRun) -> ReportBuilder {
        let mut builder = ReportBuilder::new();
        if self.options.include_listings {
            builder
                .add_listing(ORACLE_LISTING_SHEET, &run.oracle_objects)
                .add_listing(POSTGRES_LISTING_SHEET, &run.postgres_objects);
        }
        for outcome in &run.outcomes {
            builder.add_differences(outcome.task.sheet_name, &outcome.result);
        }
        builder.add_summary(
            &run.context,
            run.strategy,
            run.outcomes
                .iter()
                .map(|o| (o.task.sheet_name, &o.result)),
        );
        builder
    }

    pub async fn compare_schemas(
        &self,
        oracle_schema: &str,
        postgres_schema: &str,
    ) -> Result<SchemaComparison, CompareError> {
        let (oracle_schema, postgres_schema) = validate_schemas(oracle_schema, postgres_schema)?;
        self.check_connections().await?;

        let kind = ObjectKind::AllObjects;
        let oracle_objects = fetch(self.oracle.as_ref(), oracle_schema, kind).await?;
        let postgres_objects = fetch(self.postgres.as_ref(), postgres_schema, kind).await?;
        let result = compare(&oracle_objects, &postgres_objects, self.options.match_strategy);

        Ok(SchemaComparison {
            oracle_objects,
            postgres_objects,
            missing_in_postgres: result.only_in_a,
            missing_in_oracle: result.only_in_b,
        })
    }

    async fn run_tasks(
        &self,
        oracle_schema: &str,
        postgres_schema: &str,
    ) -> Result<ComparisonRun, CompareError> {
        let (oracle_schema, postgres_schema) = validate_schemas(oracle_schema, postgres_schema)?;

        info!(phase = %RunPhase::CheckingConnections, "Comparison run phase");
        self.check_connections().await?;

        let context = RunContext::new(oracle_schema, postgres_schema);
        let strategy = self.options.match_strategy;
        info!(
            run_id = %context.run_id,
            phase = %RunPhase::RunningTasks,
            oracle_schema,
            postgres_schema,
            strategy = strategy.as_str(),
            "Comparison run phase"
        );

        let mut run = ComparisonRun {
            context,
            strategy,
            oracle_objects: Vec::new(),
            postgres_objects: Vec::new(),
            outcomes: Vec::with_capacity(TASK_CATALOG.len()),
            persisted_rows: 0,
            persistence_failures: 0,
        };

        for task in TASK_CATALOG {
            let oracle_objects = fetch(self.oracle.as_ref(), oracle_schema, task.kind).await?;
            let postgres_objects =
                fetch(self.postgres.as_ref(), postgres_schema, task.kind).await?;
            let result = compare(&oracle_objects, &postgres_objects, strategy);

            info!(
                run_id = %run.context.run_id,
                kind = %task.kind,
                only_in_oracle = result.only_in_a.len(),
                only_in_postgres = result.only_in_b.len(),
                "Compared"
            );
            debug_pretty_json(task.sheet_name, &result);

            self.persist(&mut run, task.kind, &result).await;

            if task.kind == ObjectKind::AllObjects {
                run.oracle_objects = oracle_objects;
                run.postgres_objects = postgres_objects;
            }
            run.outcomes.push(TaskOutcome { task, result });
        }

        Ok(run)
    }

    /// Writes each non-empty side. Failures are logged and counted, never returned.
    async fn persist(&self, run: &mut ComparisonRun, kind: ObjectKind, result: &ComparisonResult) {
        for side in DiffSide::BOTH {
            let objects = result.side(side);
            if objects.is_empty() {
                continue;
            }

            let batch = DifferenceBatch::new(&run.context, kind, side, objects.to_vec());
            match self.sink.persist(batch).await {
                Ok(rows) => {
                    debug!(kind = %kind, status = side.status(), rows, "Persisted differences");
                    run.persisted_rows += rows;
                }
                Err(e) => {
                    warn!(
                        run_id = %run.context.run_id,
                        kind = %kind,
                        status = side.status(),
                        rows = objects.len(),
                        error = %e,
                        "Failed to persist differences"
                    );
                    run.persistence_failures += 1;
                }
            }
        }
    }
}

async fn fetch(
    source: &dyn MetadataSource,
    schema: &str,
    kind: ObjectKind,
) -> Result<Vec<DatabaseObject>, CompareError> {
    source
        .fetch_objects(schema, kind)
        .await
        .map_err(|source| CompareError::Query { kind, source })
}

async fn probe(source: &dyn MetadataSource) -> ProbeStatus {
    match source.ping().await {
        Ok(()) => ProbeStatus::Up,
        Err(e) => {
            warn!(database = %source.dialect(), error = %e, "Health probe failed");
            ProbeStatus::Down
        }
    }
}

fn validate_schemas<'a>(
    oracle_schema: &'a str,
    postgres_schema: &'a str,
) -> Result<(&'a str, &'a str), CompareError> {
    let oracle_schema = oracle_schema.trim();
    let postgres_schema = postgres_schema.trim();
    if oracle_schema.is_empty() {
        return Err(CompareError::InvalidRequest(
            "oracleSchema must not be empty".to_string(),
        ));
    }
    if postgres_schema.is_empty() {
        return Err(CompareError::InvalidRequest(
            "postgresSchema must not be empty".to_string(),
        ));
    }
    Ok((oracle_schema, postgres_schema))
}

/// `database_comparison_<oracle>_<postgres>.xlsx`, with characters outside
/// `[A-Za-z0-9_.$#-]` replaced so the name is safe in a `Content-Disposition` header.
pub fn report_filename(oracle_schema: &str, postgres_schema: &str) -> String {
    fn clean(s: &str) -> String {
        s.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | '#' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
    format!(
        "database_comparison_{}_{}.xlsx",
        clean(oracle_schema),
        clean(postgres_schema)
    )
}
