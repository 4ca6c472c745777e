// src/file/mod.rs
use anyhow::{Result, Context, anyhow};
use std::path::{Path, PathBuf};
use std::fs;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use crate::config::ReportSettings;
use crate::error::ReportError;
use crate::report::ReportDocument;

pub mod report;
pub mod samples;

/// Report ids are simple-format uuids, 32 lowercase hex characters, so they
/// can never name a path outside the reports directory.
fn checked_id(uuid: &str) -> Result<&str, ReportError> {
    match Uuid::try_parse(uuid) {
        Ok(parsed) if parsed.simple().to_string() == uuid => Ok(uuid),
        _ => Err(ReportError::InvalidReportId { id: uuid.to_string() }),
    }
}

// Core trait for file operations
pub trait FileHandler<T> {
    fn load(&self, path: &Path) -> Result<T>;
    fn save(&self, data: &T, path: &Path) -> Result<()>;
}

/// Reports directory on disk. Reports are named `report.<uuid>.json`.
#[derive(Debug)]
pub struct ReportStore {
    reports_dir: PathBuf,
    report_handler: report::ReportFileHandler,
    samples_handler: samples::SamplesFileHandler,
}

impl ReportStore {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
            report_handler: report::ReportFileHandler::new(),
            samples_handler: samples::SamplesFileHandler::new(),
        }
    }

    pub fn from_settings(settings: &ReportSettings) -> Self {
        Self::new(settings.reports_dir.clone())
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    pub fn report_path(&self, uuid: &str) -> Result<PathBuf> {
        let uuid = checked_id(uuid)?;
        Ok(self.reports_dir.join(format!("report.{}.json", uuid)))
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if dir.exists() && !dir.is_dir() {
            return Err(anyhow!("Reports path is not a directory: {}", dir.display()));
        }
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create reports directory {}", dir.display()))
    }

    /// Writes the document and returns its path. Rewriting the same report
    /// replaces the earlier file.
    pub fn write(&self, document: &ReportDocument) -> Result<PathBuf> {
        let path = self.report_path(&document.metadata.uuid)?;
        self.ensure_dir(&self.reports_dir)?;
        self.report_handler.save(document, &path)?;
        info!(path = %path.display(), "wrote LCA report");
        Ok(path)
    }

    pub fn load(&self, uuid: &str) -> Result<ReportDocument> {
        let path = self.report_path(uuid)?;
        if !path.exists() {
            return Err(ReportError::ReportNotFound { path }.into());
        }
        self.report_handler.load(&path)
    }

    /// Raw Monte Carlo scores as CSV under `samples/`, one file per export.
    pub fn write_samples(&self, uuid: &str, samples: &[f64]) -> Result<PathBuf> {
        let uuid = checked_id(uuid)?;
        let samples_dir = self.reports_dir.join("samples");
        self.ensure_dir(&samples_dir)?;

        let timestamp_str = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let path = samples_dir.join(format!("monte_carlo.{}.{}.csv", uuid, timestamp_str));
        self.samples_handler.save(&samples.to_vec(), &path)?;
        info!(path = %path.display(), samples = samples.len(), "exported Monte Carlo samples");
        Ok(path)
    }

    pub fn load_samples(&self, path: &Path) -> Result<Vec<f64>> {
        self.samples_handler.load(path)
    }
}
