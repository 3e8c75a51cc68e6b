//! Expiring storage for anonymous symptom reports.
//!
//! Reports are written once and never updated. Readers never see a report
//! past its `expires_at`; the sweeper deletes them for good.

mod errors;
mod fs_store;
mod memory;
mod sweeper;

use std::{future::Future, path::PathBuf, pin::Pin, str::FromStr, sync::Arc};

pub use errors::ReportStoreError;
pub use fs_store::FsReportStore;
pub use memory::MemoryReportStore;
pub use sweeper::spawn_sweeper;

use symptom_analyzer::SymptomReport;
use uuid::Uuid;

/// Storage backend for [`SymptomReport`]s.
///
/// Object safe so the HTTP layer can hold an `Arc<dyn ReportStore>`.
pub trait ReportStore: Send + Sync {
    /// Stores a new report. Fails with [`ReportStoreError::Duplicate`] if the id is taken.
    fn insert<'a>(
        &'a self,
        report: SymptomReport,
    ) -> Pin<Box<dyn Future<Output = Result<(), ReportStoreError>> + Send + 'a>>;

    /// Looks up a report; expired reports read as `None`.
    fn get<'a>(
        &'a self,
        session_id: Uuid,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SymptomReport>, ReportStoreError>> + Send + 'a>>;

    /// Deletes every expired report and returns how many went away.
    fn purge_expired<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<usize, ReportStoreError>> + Send + 'a>>;

    /// Short backend name for logs and health output.
    fn kind(&self) -> &'static str;
}

/// Which backend to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Fs(PathBuf),
}

impl StoreBackend {
    /// Parses a backend name; `dir` is used for `fs`.
    pub fn parse(name: &str, dir: impl Into<PathBuf>) -> Result<Self, ReportStoreError> {
        match StoreKind::from_str(name)? {
            StoreKind::Memory => Ok(Self::Memory),
            StoreKind::Fs => Ok(Self::Fs(dir.into())),
        }
    }

    pub async fn open(&self) -> Result<Arc<dyn ReportStore>, ReportStoreError> {
        Ok(match self {
            Self::Memory => Arc::new(MemoryReportStore::new()),
            Self::Fs(dir) => Arc::new(FsReportStore::open(dir.clone()).await?),
        })
    }
}

enum StoreKind {
    Memory,
    Fs,
}

impl FromStr for StoreKind {
    type Err = ReportStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "fs" | "file" | "files" => Ok(Self::Fs),
            other => Err(ReportStoreError::UnknownBackend(other.to_string())),
        }
    }
}
