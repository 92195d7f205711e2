//! SQL DDL for the audit store (PostgreSQL).

/// `comparison_results` is append-only: one row per difference, grouped by `run_id`.
pub const PG_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS comparison_results (
    id BIGSERIAL PRIMARY KEY,
    run_id UUID NOT NULL,
    run_timestamp TIMESTAMPTZ NOT NULL,
    object_kind TEXT NOT NULL,
    object_name TEXT NOT NULL,
    schema_name TEXT NOT NULL,
    status TEXT NOT NULL,
    source_db TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comparison_results_run_id ON comparison_results(run_id);
"#;
