#![allow(dead_code)]

use async_trait::async_trait;
use dbcompare::audit::{DifferenceBatch, DifferenceSink};
use dbcompare::config::CompareConfig;
use dbcompare::sources::MetadataSource;
use dbcompare::{AuditError, ComparisonService, SourceError};
use dbcompare_core::{DatabaseObject, Dialect, ObjectKind};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory catalog for one side.
pub struct FakeSource {
    dialect: Dialect,
    schema: String,
    up: bool,
    failing_kind: Option<ObjectKind>,
    objects: HashMap<ObjectKind, Vec<DatabaseObject>>,
    pings: AtomicUsize,
    fetches: AtomicUsize,
}

impl FakeSource {
    pub fn oracle(schema: &str) -> Self {
        Self::new(Dialect::Oracle, schema)
    }

    pub fn postgres(schema: &str) -> Self {
        Self::new(Dialect::Postgres, schema)
    }

    fn new(dialect: Dialect, schema: &str) -> Self {
        Self {
            dialect,
            schema: schema.to_string(),
            up: true,
            failing_kind: None,
            objects: HashMap::new(),
            pings: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Registers `names` as objects of `kind` (type label = kind label).
    pub fn with(mut self, kind: ObjectKind, names: &[&str]) -> Self {
        let objects = names
            .iter()
            .map(|name| match self.dialect {
                Dialect::Oracle => DatabaseObject::oracle(*name, kind.as_str(), &self.schema),
                Dialect::Postgres => DatabaseObject::postgres(*name, kind.as_str(), &self.schema),
            })
            .collect();
        self.objects.insert(kind, objects);
        self
    }

    pub fn down(mut self) -> Self {
        self.up = false;
        self
    }

    pub fn failing_on(mut self, kind: ObjectKind) -> Self {
        self.failing_kind = Some(kind);
        self
    }

    pub fn pings(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn ping(&self) -> Result<(), SourceError> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.up {
            Ok(())
        } else {
            Err(SourceError::new(self.dialect, "connection refused"))
        }
    }

    async fn fetch_objects(
        &self,
        schema: &str,
        kind: ObjectKind,
    ) -> Result<Vec<DatabaseObject>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing_kind == Some(kind) {
            return Err(SourceError::new(self.dialect, "catalog view unavailable"));
        }
        if schema != self.schema {
            return Ok(Vec::new());
        }
        Ok(self.objects.get(&kind).cloned().unwrap_or_default())
    }
}

/// Sink that keeps every batch it is handed.
#[derive(Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<DifferenceBatch>>,
}

impl RecordingSink {
    pub fn batches(&self) -> Vec<DifferenceBatch> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl DifferenceSink for RecordingSink {
    async fn persist(&self, batch: DifferenceBatch) -> Result<u64, AuditError> {
        let rows = batch.len() as u64;
        self.batches.lock().unwrap().push(batch);
        Ok(rows)
    }
}

/// Sink whose store is always unavailable.
#[derive(Default)]
pub struct FailingSink {
    attempts: AtomicUsize,
}

impl FailingSink {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DifferenceSink for FailingSink {
    async fn persist(&self, _batch: DifferenceBatch) -> Result<u64, AuditError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AuditError::RactorError("audit store unavailable".to_string()))
    }
}

pub fn service(
    oracle: &Arc<FakeSource>,
    postgres: &Arc<FakeSource>,
    sink: Arc<dyn DifferenceSink>,
) -> ComparisonService {
    ComparisonService::new(
        oracle.clone(),
        postgres.clone(),
        sink,
        CompareConfig::default(),
    )
}

/// Oracle `HR` and Postgres `hr` sharing table `A`, each with one table of its own.
pub fn table_scenario() -> (Arc<FakeSource>, Arc<FakeSource>) {
    let oracle = FakeSource::oracle("HR").with(ObjectKind::Table, &["A", "ORA_ONLY"]);
    let postgres = FakeSource::postgres("hr").with(ObjectKind::Table, &["a", "PG_ONLY"]);
    (Arc::new(oracle), Arc::new(postgres))
}
