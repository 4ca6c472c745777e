// src/config/settings.rs
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use crate::analysis::MonteCarloSettings;

/// Environment variables override file values, e.g.
/// `LCA_REPORT_UPLOAD_REPORTS=true` or `LCA_REPORT_MONTE_CARLO__ITERATIONS=500`.
pub const ENV_PREFIX: &str = "LCA_REPORT";

/// Storage and upload configuration handed to [`crate::ReportStore`] and
/// [`crate::ReportUploader`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSettings {
    #[serde(default)]
    pub upload_reports: bool,
    #[serde(default)]
    pub report_server_url: Option<String>,
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
    #[serde(default)]
    pub monte_carlo: MonteCarloSettings,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            upload_reports: false,
            report_server_url: None,
            reports_dir: default_reports_dir(),
            monte_carlo: MonteCarloSettings::default(),
        }
    }
}

pub fn default_reports_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lca-report")
        .join("reports")
}

impl ReportSettings {
    /// Layers an optional settings file (format taken from its extension)
    /// under `LCA_REPORT_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("upload_reports", false)?
            .set_default(
                "reports_dir",
                default_reports_dir().to_string_lossy().into_owned(),
            )?;

        if let Some(path) = path {
            if !path.exists() {
                return Err(anyhow::anyhow!("Settings file not found: {}", path.display()));
            }
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read report settings")?;

        settings
            .try_deserialize()
            .context("Failed to parse report settings")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::new()
                .new_line("\n".to_string())
                .depth_limit(4)
        )?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;
        Ok(())
    }

    /// Server base URL, only when uploads are switched on and a URL is set.
    pub fn upload_target(&self) -> Option<&str> {
        if !self.upload_reports {
            return None;
        }
        self.report_server_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
