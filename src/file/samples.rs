// src/file/samples.rs
use super::FileHandler;
use std::path::Path;
use anyhow::{Result, Context};
use csv::{Reader, Writer};

const SCORE_COLUMN: &str = "score";

/// Single-column CSV of Monte Carlo scores.
#[derive(Debug)]
pub struct SamplesFileHandler;

impl SamplesFileHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler<Vec<f64>> for SamplesFileHandler {
    fn load(&self, path: &Path) -> Result<Vec<f64>> {
        let mut reader = Reader::from_path(path)
            .with_context(|| format!("Failed to open samples file: {}", path.display()))?;

        let mut samples = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let value = record.get(0)
                .with_context(|| format!("Empty row {} in {}", row + 1, path.display()))?;
            samples.push(value.trim().parse::<f64>()
                .with_context(|| format!("Invalid score on row {} in {}", row + 1, path.display()))?);
        }
        Ok(samples)
    }

    fn save(&self, data: &Vec<f64>, path: &Path) -> Result<()> {
        let mut writer = Writer::from_path(path)
            .with_context(|| format!("Failed to create samples file: {}", path.display()))?;

        writer.write_record([SCORE_COLUMN])?;
        for sample in data {
            writer.write_record([sample.to_string()])?;
        }

        writer.flush()?;
        Ok(())
    }
}
