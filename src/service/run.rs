use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Identity of one comparison run, created once and passed to every step of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunContext {
    pub run_id: Uuid,
    pub run_timestamp: DateTime<Utc>,
    pub oracle_schema: String,
    pub postgres_schema: String,
}

impl RunContext {
    pub fn new(oracle_schema: impl Into<String>, postgres_schema: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            run_timestamp: Utc::now(),
            oracle_schema: oracle_schema.into(),
            postgres_schema: postgres_schema.into(),
        }
    }
}

/// Lifecycle of a run. `Failed` is reachable from every other phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    CheckingConnections,
    RunningTasks,
    BuildingReport,
    Done,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::CheckingConnections => "checking_connections",
            RunPhase::RunningTasks => "running_tasks",
            RunPhase::BuildingReport => "building_report",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}
