//! One `<session_id>.json` file per report.
//!
//! Writes go to `<session_id>.json.tmp` first and are renamed into place, so a
//! reader never sees a half-written report. Temp files left behind by an
//! interrupted write are deleted by the sweep once they are an hour old.

use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
    pin::Pin,
    time::{Duration, SystemTime},
};

use chrono::Utc;
use symptom_analyzer::SymptomReport;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{ReportStore, errors::ReportStoreError};

const EXTENSION: &str = "json";
const TMP_SUFFIX: &str = ".json.tmp";
/// Age after which a temp file can no longer belong to an in-flight write.
const STALE_TMP_AFTER: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct FsReportStore {
    dir: PathBuf,
}

impl FsReportStore {
    /// Opens (and creates if needed) the report directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, ReportStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ReportStoreError::io(&dir, e))?;
        debug!(dir = %dir.display(), "fs report store ready");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, session_id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", session_id.hyphenated()))
    }

    async fn read_report(path: &Path) -> Result<Option<SymptomReport>, ReportStoreError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ReportStoreError::io(path, e)),
        }
    }

    async fn remove(path: &Path) -> Result<bool, ReportStoreError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ReportStoreError::io(path, e)),
        }
    }
}

impl ReportStore for FsReportStore {
    fn insert<'a>(
        &'a self,
        report: SymptomReport,
    ) -> Pin<Box<dyn Future<Output = Result<(), ReportStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let path = self.path_for(report.session_id);
            let exists = fs::try_exists(&path)
                .await
                .map_err(|e| ReportStoreError::io(&path, e))?;
            if exists {
                return Err(ReportStoreError::Duplicate(report.session_id));
            }

            let bytes = serde_json::to_vec_pretty(&report)?;
            let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
            fs::write(&tmp, &bytes)
                .await
                .map_err(|e| ReportStoreError::io(&tmp, e))?;
            fs::rename(&tmp, &path)
                .await
                .map_err(|e| ReportStoreError::io(&path, e))?;
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        session_id: Uuid,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SymptomReport>, ReportStoreError>> + Send + 'a>>
    {
        Box::pin(async move {
            let report = Self::read_report(&self.path_for(session_id)).await?;
            Ok(report.filter(|r| !r.is_expired_at(Utc::now())))
        })
    }

    fn purge_expired<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<usize, ReportStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let now = Utc::now();
            let mut entries = fs::read_dir(&self.dir)
                .await
                .map_err(|e| ReportStoreError::io(&self.dir, e))?;

            let mut removed = 0usize;
            let mut removed_tmp = 0usize;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| ReportStoreError::io(&self.dir, e))?
            {
                let path = entry.path();
                if is_tmp_file(&path) {
                    if is_stale(&entry).await && Self::remove(&path).await? {
                        removed_tmp += 1;
                    }
                    continue;
                }
                if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                    continue;
                }

                // One unreadable file must not stop the sweep.
                match Self::read_report(&path).await {
                    Ok(Some(report)) if report.is_expired_at(now) => {
                        if Self::remove(&path).await? {
                            removed += 1;
                        }
                    }
                    Ok(_) => {}
                    Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable report file"),
                }
            }

            debug!(removed, removed_tmp, "fs store purged");
            Ok(removed)
        })
    }

    fn kind(&self) -> &'static str {
        "fs"
    }
}

fn is_tmp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(TMP_SUFFIX))
}

async fn is_stale(entry: &fs::DirEntry) -> bool {
    let Ok(modified) = entry.metadata().await.and_then(|m| m.modified()) else {
        return false;
    };
    SystemTime::now()
        .duration_since(modified)
        .is_ok_and(|age| age >= STALE_TMP_AFTER)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;
    use symptom_analyzer::{Analysis, PossibleCondition, ReferenceImageTag, Responses, RiskLevel};

    use super::*;

    fn report(age_days: i64) -> SymptomReport {
        let responses: Responses = match json!({"unusual_discharge": "Yes"}) {
            serde_json::Value::Object(m) => m,
            _ => unreachable!(),
        };
        let analysis = Analysis {
            risk_level: RiskLevel::Medium,
            recommendations: vec!["See a clinic.".into()],
            possible_conditions: vec![PossibleCondition::new("Scabies", "Itchy and treatable.")],
            has_symptoms: true,
            ai_message: "Take care.".into(),
            analyzed_by_ai: true,
            ai_error: None,
        };
        SymptomReport::assemble(
            Uuid::new_v4(),
            responses,
            &analysis,
            vec![ReferenceImageTag::Scabies],
            Utc::now() - Duration::days(age_days),
            Duration::days(30),
        )
    }

    #[tokio::test]
    async fn report_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let r = report(0);
        {
            let store = FsReportStore::open(dir.path()).await.unwrap();
            store.insert(r.clone()).await.unwrap();
        }

        let store = FsReportStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get(r.session_id).await.unwrap(), Some(r.clone()));

        let on_disk = std::fs::read_to_string(dir.path().join(format!("{}.json", r.session_id))).unwrap();
        assert!(on_disk.contains("\"analyzedByAI\": true"));
        assert!(!dir.path().join(format!("{}.json.tmp", r.session_id)).exists());
    }

    #[tokio::test]
    async fn missing_report_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsReportStore::open(dir.path().join("nested/reports")).await.unwrap();
        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsReportStore::open(dir.path()).await.unwrap();
        let r = report(0);
        store.insert(r.clone()).await.unwrap();
        assert!(matches!(
            store.insert(r).await.unwrap_err(),
            ReportStoreError::Duplicate(_)
        ));
    }

    #[tokio::test]
    async fn purge_removes_stale_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsReportStore::open(dir.path()).await.unwrap();

        let stale = dir.path().join(format!("{}.json.tmp", Uuid::new_v4()));
        let fresh = dir.path().join(format!("{}.json.tmp", Uuid::new_v4()));
        std::fs::write(&stale, b"{\"partial\":").unwrap();
        std::fs::write(&fresh, b"{\"partial\":").unwrap();
        std::fs::File::options()
            .write(true)
            .open(&stale)
            .unwrap()
            .set_modified(SystemTime::now() - STALE_TMP_AFTER * 2)
            .unwrap();

        assert_eq!(store.purge_expired().await.unwrap(), 0);
        assert!(!stale.exists());
        assert!(fresh.exists());
    }

    #[tokio::test]
    async fn purge_removes_only_expired_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsReportStore::open(dir.path()).await.unwrap();
        let old = report(45);
        let fresh = report(2);
        store.insert(old.clone()).await.unwrap();
        store.insert(fresh.clone()).await.unwrap();
        std::fs::write(dir.path().join("garbage.json"), b"{not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        assert_eq!(store.get(old.session_id).await.unwrap(), None);
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert!(!dir.path().join(format!("{}.json", old.session_id)).exists());
        assert!(store.get(fresh.session_id).await.unwrap().is_some());
        assert!(dir.path().join("garbage.json").exists());
    }
}
