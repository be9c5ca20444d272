use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use curtain_core::GateReport;
use std::path::{Path, PathBuf};

/// Destination for files the page hands to the visitor (QR codes).
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

#[async_trait]
pub trait ReportStorage: Send + Sync {
    async fn save_report(&self, run_id: &str, report: &GateReport) -> Result<PathBuf>;
}

/// Writes downloads and JSON reports into one folder.
#[derive(Debug, Clone)]
pub struct FolderStorage {
    pub folder: PathBuf,
}

impl FolderStorage {
    pub fn new(folder: impl Into<PathBuf>) -> Result<Self> {
        let folder = folder.into();
        std::fs::create_dir_all(&folder)
            .with_context(|| format!("failed to create {}", folder.display()))?;
        Ok(Self { folder })
    }

    fn target(&self, file_name: &str) -> Result<PathBuf> {
        let name = Path::new(file_name);
        match name.file_name() {
            Some(stem) if stem == name.as_os_str() => Ok(self.folder.join(name)),
            _ => bail!("refusing to write outside {}: {}", self.folder.display(), file_name),
        }
    }
}

#[async_trait]
impl DownloadSink for FolderStorage {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.target(file_name)?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "download saved");
        Ok(path)
    }
}

#[async_trait]
impl ReportStorage for FolderStorage {
    async fn save_report(&self, run_id: &str, report: &GateReport) -> Result<PathBuf> {
        let path = self.target(&format!("{}.json", run_id))?;
        let data = serde_json::to_string_pretty(report)?;
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }
}
