// src/file/report.rs
use super::FileHandler;
use crate::report::ReportDocument;
use std::path::Path;
use std::fs;
use anyhow::{Result, Context};

#[derive(Debug)]
pub struct ReportFileHandler;

impl ReportFileHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler<ReportDocument> for ReportFileHandler {
    fn load(&self, path: &Path) -> Result<ReportDocument> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse report file: {}", path.display()))
    }

    fn save(&self, data: &ReportDocument, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(data)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write report file: {}", path.display()))?;
        Ok(())
    }
}
