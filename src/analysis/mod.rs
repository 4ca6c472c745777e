// src/analysis/mod.rs
pub mod contribution;
pub mod density;
pub mod force_directed;
pub mod histogram;
pub mod impact;
pub mod monte_carlo;
pub mod sampling;

// Re-export commonly used types
pub use contribution::{
    ContributionAnalyzer,
    ContributionSummary,
    HintonMatrix,
    TreemapNode,
};
pub use force_directed::{
    ForceDirectedGraph,
    GraphTraversal,
    SupplyEdge,
    SupplyNode,
    Traversal,
};
pub use impact::{
    ActivityCatalog,
    ActivityInfo,
    CharacterizedFlow,
    ImpactCalculator,
    LcaResult,
};
pub use monte_carlo::{
    BinPolicy,
    MonteCarloRun,
    MonteCarloSettings,
    SummaryStatistics,
    UncertaintySummary,
};
pub use sampling::{
    ParametricSampler,
    UncertainTerm,
    UncertaintyDistribution,
    UncertaintySampler,
};
