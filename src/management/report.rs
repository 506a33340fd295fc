use std::path::{Path, PathBuf};

use crate::{config, types::RunReport};

pub struct RunReportManager {
    report: RunReport,
}

impl RunReportManager {
    pub fn new(report: RunReport) -> Self {
        Self { report }
    }

    pub async fn load() -> Result<Self, String> {
        Self::load_from(&Self::report_path()).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, String> {
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;
        let report: RunReport = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { report })
    }

    pub async fn persist(&self) -> Result<(), String> {
        self.persist_to(&Self::report_path()).await
    }

    pub async fn persist_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.report).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    fn report_path() -> PathBuf {
        config::data_dir().join("cache/last-run.json")
    }
}
