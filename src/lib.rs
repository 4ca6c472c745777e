// src/lib.rs
//! Serialized LCA reports.
//!
//! A report bundles the impact score of a functional unit, its contribution
//! (hotspot) analysis, the supply chain graph and a Monte Carlo uncertainty
//! summary into one JSON document. The numeric engines are reached through
//! the traits in [`analysis`]; the Monte Carlo post-processing is done here.

pub mod analysis;
pub mod config;
pub mod error;
pub mod file;
pub mod report;
pub mod upload;
pub mod utils;

// Re-export commonly used types
pub use crate::analysis::{
    ActivityCatalog,
    ActivityInfo,
    BinPolicy,
    ContributionAnalyzer,
    GraphTraversal,
    ImpactCalculator,
    LcaResult,
    MonteCarloSettings,
    UncertaintySampler,
    UncertaintySummary,
};
pub use crate::config::{ActivityKey, Demand, MethodRef, ReportSettings};
pub use crate::error::ReportError;
pub use crate::file::ReportStore;
pub use crate::report::{Engines, ReportDocument, SerializedLcaReport, REPORT_TYPE, REPORT_VERSION};
pub use crate::upload::ReportUploader;
