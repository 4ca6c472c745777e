// src/report.rs
use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use anyhow::Result;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::{
    ActivityCatalog,
    ContributionAnalyzer,
    ContributionSummary,
    ForceDirectedGraph,
    GraphTraversal,
    ImpactCalculator,
    MonteCarloRun,
    MonteCarloSettings,
    UncertaintySampler,
    UncertaintySummary,
};
use crate::analysis::force_directed;
use crate::analysis::monte_carlo::run_monte_carlo;
use crate::config::{Demand, MethodRef};
use crate::error::ReportError;
use crate::file::ReportStore;
use crate::upload::ReportUploader;
use crate::utils::format_general;

pub const REPORT_VERSION: u32 = 1;
pub const REPORT_TYPE: &str = "Brightway2 serialized LCA report";

/// `[name, amount, unit]` of one demanded activity; the amount is formatted
/// to two significant digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityLine(pub String, pub String, pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodSummary {
    pub name: String,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub uuid: String,
    /// Set once the report has been uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<String>,
}

/// The serialized report. Field names are the JSON contract read by the
/// report viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportDocument {
    pub activity: Vec<ActivityLine>,
    pub method: MethodSummary,
    pub score: f64,
    pub contribution: ContributionSummary,
    pub force_directed: ForceDirectedGraph,
    #[serde(rename = "monte carlo")]
    pub monte_carlo: Option<UncertaintySummary>,
    pub metadata: ReportMetadata,
}

/// The external engines a report is calculated with.
#[derive(Clone, Copy)]
pub struct Engines<'a> {
    pub catalog: &'a dyn ActivityCatalog,
    pub calculator: &'a dyn ImpactCalculator,
    pub contribution: &'a dyn ContributionAnalyzer,
    pub traversal: &'a dyn GraphTraversal,
    pub sampler: &'a dyn UncertaintySampler,
}

/// A complete LCA report: score, contribution analysis, supply chain graph
/// and Monte Carlo uncertainty, calculated once and then written or
/// uploaded under a uuid fixed at creation.
#[derive(Debug, Clone)]
pub struct SerializedLcaReport {
    demand: Demand,
    method: MethodRef,
    settings: MonteCarloSettings,
    uuid: String,
    report: Option<ReportDocument>,
    samples: Option<Vec<f64>>,
}

impl SerializedLcaReport {
    pub fn new(demand: Demand, method: MethodRef, settings: MonteCarloSettings) -> Self {
        Self {
            demand,
            method,
            settings,
            uuid: Uuid::new_v4().simple().to_string(),
            report: None,
            samples: None,
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn demand(&self) -> &Demand {
        &self.demand
    }

    pub fn method(&self) -> &MethodRef {
        &self.method
    }

    pub fn settings(&self) -> &MonteCarloSettings {
        &self.settings
    }

    pub fn document(&self) -> Option<&ReportDocument> {
        self.report.as_ref()
    }

    /// Sorted Monte Carlo scores from the last calculation.
    pub fn samples(&self) -> Option<&[f64]> {
        self.samples.as_deref()
    }

    /// Runs every analysis and assembles the document. A failure in any of
    /// them aborts the whole calculation and leaves the previous state
    /// untouched.
    pub fn calculate(&mut self, engines: &Engines<'_>) -> Result<&ReportDocument> {
        info!(uuid = %self.uuid, method = %self.method.display_name(), "calculating LCA report");
        self.settings.validate()?;

        let lca = engines.calculator.calculate(&self.demand, &self.method)?;
        debug!(score = lca.score, flows = lca.characterized_inventory.len(), "LCA score calculated");

        let contribution = engines.contribution.summarize(&lca)?;

        let mut activity = Vec::with_capacity(self.demand.len());
        for (key, amount) in &self.demand {
            let info = engines.catalog.describe(key)?;
            activity.push(ActivityLine(info.name, format_general(*amount, 2), info.unit));
        }

        let force_directed = self.force_directed(engines.traversal, engines.catalog)?;
        let monte_carlo = self.monte_carlo(engines.sampler)?;

        let (summary, samples) = match monte_carlo {
            Some(run) => (run.summary, Some(run.samples)),
            None => (None, None),
        };

        let document = ReportDocument {
            activity,
            method: MethodSummary {
                name: self.method.display_name(),
                unit: self.method.unit.clone(),
            },
            score: lca.score,
            contribution,
            force_directed,
            monte_carlo: summary,
            metadata: ReportMetadata {
                kind: REPORT_TYPE.to_string(),
                version: REPORT_VERSION,
                uuid: self.uuid.clone(),
                online: None,
            },
        };

        self.samples = samples;
        info!(uuid = %self.uuid, score = document.score, "LCA report calculated");
        Ok(&*self.report.insert(document))
    }

    /// Monte Carlo uncertainty, sampled independently of the deterministic
    /// score.
    pub fn monte_carlo(&self, sampler: &dyn UncertaintySampler) -> Result<Option<MonteCarloRun>> {
        run_monte_carlo(sampler, &self.demand, &self.method, &self.settings)
    }

    /// Supply chain graph: traverse, simplify, then annotate and reshape.
    pub fn force_directed(
        &self,
        traversal: &dyn GraphTraversal,
        catalog: &dyn ActivityCatalog,
    ) -> Result<ForceDirectedGraph> {
        let calculated = traversal.calculate(&self.demand, &self.method)?;
        let simplified = traversal.simplify(calculated)?;
        debug!(
            nodes = simplified.graph.node_count(),
            edges = simplified.graph.edge_count(),
            "supply chain graph simplified"
        );
        force_directed::reformat(&simplified, catalog)
    }

    pub fn write(&self, store: &ReportStore) -> Result<PathBuf> {
        let document = self.report.as_ref().ok_or(ReportError::NotCalculated)?;
        store.write(document)
    }

    /// Writes the raw samples next to the reports. `None` when the report
    /// was calculated without Monte Carlo.
    pub fn export_samples(&self, store: &ReportStore) -> Result<Option<PathBuf>> {
        if self.report.is_none() {
            return Err(ReportError::NotCalculated.into());
        }
        match &self.samples {
            Some(samples) => store.write_samples(&self.uuid, samples).map(Some),
            None => Ok(None),
        }
    }

    /// Uploads the report. On success the online address is returned and
    /// recorded in the document metadata; a server refusal gives `None`.
    pub async fn upload(&mut self, uploader: &ReportUploader) -> Result<Option<String>> {
        let document = self.report.as_mut().ok_or(ReportError::NotCalculated)?;
        let url = uploader.upload(document).await?;
        if let Some(url) = &url {
            document.metadata.online = Some(url.clone());
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActivityKey;

    fn report() -> SerializedLcaReport {
        let mut demand = Demand::new();
        demand.insert(ActivityKey::new("db", "a"), 1.0);
        SerializedLcaReport::new(demand, MethodRef::new(["m"], "kg"), MonteCarloSettings::default())
    }

    #[test]
    fn test_uuid_is_32_hex_chars() {
        let report = report();
        assert_eq!(report.uuid().len(), 32);
        assert!(report.uuid().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_uuid_differs_per_report() {
        assert_ne!(report().uuid(), report().uuid());
    }

    #[test]
    fn test_write_before_calculate() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        let err = report().write(&store).unwrap_err();
        assert!(matches!(err.downcast_ref::<ReportError>(), Some(ReportError::NotCalculated)));
        let err = report().export_samples(&store).unwrap_err();
        assert!(matches!(err.downcast_ref::<ReportError>(), Some(ReportError::NotCalculated)));
    }

    #[test]
    fn test_metadata_online_omitted_when_unset() {
        let metadata = ReportMetadata {
            kind: REPORT_TYPE.to_string(),
            version: REPORT_VERSION,
            uuid: "abc".to_string(),
            online: None,
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["type"], REPORT_TYPE);
        assert_eq!(json["version"], 1);
        assert!(json.get("online").is_none());
    }

    #[test]
    fn test_activity_line_is_an_array() {
        let line = ActivityLine("steel".to_string(), "1.5".to_string(), "kilogram".to_string());
        assert_eq!(serde_json::to_string(&line).unwrap(), r#"["steel","1.5","kilogram"]"#);
    }
}
