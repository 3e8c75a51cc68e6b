use std::{collections::HashMap, future::Future, pin::Pin};

use chrono::Utc;
use symptom_analyzer::SymptomReport;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::{ReportStore, errors::ReportStoreError};

/// Process-local store. Reports vanish on restart.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: RwLock<HashMap<Uuid, SymptomReport>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reports held, expired ones included.
    pub async fn len(&self) -> usize {
        self.reports.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl ReportStore for MemoryReportStore {
    fn insert<'a>(
        &'a self,
        report: SymptomReport,
    ) -> Pin<Box<dyn Future<Output = Result<(), ReportStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut reports = self.reports.write().await;
            if reports.contains_key(&report.session_id) {
                return Err(ReportStoreError::Duplicate(report.session_id));
            }
            reports.insert(report.session_id, report);
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        session_id: Uuid,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SymptomReport>, ReportStoreError>> + Send + 'a>>
    {
        Box::pin(async move {
            let now = Utc::now();
            let reports = self.reports.read().await;
            Ok(reports
                .get(&session_id)
                .filter(|r| !r.is_expired_at(now))
                .cloned())
        })
    }

    fn purge_expired<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<usize, ReportStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let now = Utc::now();
            let mut reports = self.reports.write().await;
            let before = reports.len();
            reports.retain(|_, r| !r.is_expired_at(now));
            let removed = before - reports.len();
            debug!(removed, remaining = reports.len(), "memory store purged");
            Ok(removed)
        })
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
