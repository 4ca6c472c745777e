// src/analysis/contribution.rs
use serde::{Serialize, Deserialize};
use anyhow::Result;
use super::impact::LcaResult;

/// Number of largest contributors summed by the concentration ratio.
pub const CONCENTRATION_TOP_N: usize = 4;

/// Top flows × top activities matrix of characterized results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HintonMatrix {
    /// `(row, column, value)` triples
    pub results: Vec<(usize, usize, f64)>,
    pub total: f64,
    pub xlabels: Vec<String>,
    pub ylabels: Vec<String>,
}

/// d3 treemap node: leaves carry `size`, branches carry `children`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreemapNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreemapNode>,
}

impl TreemapNode {
    pub fn leaf(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size: Some(size),
            children: Vec::new(),
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<TreemapNode>) -> Self {
        Self {
            name: name.into(),
            size: None,
            children,
        }
    }
}

/// The `contribution` block of a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContributionSummary {
    pub hinton: HintonMatrix,
    pub treemap: TreemapNode,
    pub herfindahl: f64,
    pub concentration: f64,
}

/// Hotspot analysis of a characterized inventory.
///
/// The visual encodings are left to the implementor. The two concentration
/// statistics have default implementations over the inventory values.
pub trait ContributionAnalyzer {
    fn hinton_matrix(&self, lca: &LcaResult) -> Result<HintonMatrix>;

    fn treemap(&self, lca: &LcaResult) -> Result<TreemapNode>;

    fn herfindahl_index(&self, lca: &LcaResult) -> f64 {
        let values: Vec<f64> = lca.inventory_values().collect();
        herfindahl_index(&values, lca.score)
    }

    fn concentration_ratio(&self, lca: &LcaResult) -> f64 {
        let values: Vec<f64> = lca.inventory_values().collect();
        concentration_ratio(&values, lca.score)
    }

    fn summarize(&self, lca: &LcaResult) -> Result<ContributionSummary> {
        Ok(ContributionSummary {
            hinton: self.hinton_matrix(lca)?,
            treemap: self.treemap(lca)?,
            herfindahl: self.herfindahl_index(lca),
            concentration: self.concentration_ratio(lca),
        })
    }
}

fn reference_score(values: &[f64], score: f64) -> f64 {
    if score == 0.0 {
        values.iter().map(|v| v.abs()).sum()
    } else {
        score
    }
}

/// Sum of squared shares of the total. 1.0 means a single contributor.
pub fn herfindahl_index(values: &[f64], score: f64) -> f64 {
    let score = reference_score(values, score);
    if score == 0.0 {
        return 0.0;
    }
    values.iter().map(|v| v.powi(2) / score.powi(2)).sum()
}

/// Share of the total held by the largest contributors by magnitude.
pub fn concentration_ratio(values: &[f64], score: f64) -> f64 {
    let score = reference_score(values, score);
    if score == 0.0 {
        return 0.0;
    }
    let mut magnitudes: Vec<f64> = values.iter().map(|v| v.abs()).collect();
    magnitudes.sort_by(|a, b| b.total_cmp(a));
    magnitudes.iter().take(CONCENTRATION_TOP_N).sum::<f64>() / score.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_herfindahl_single_contributor() {
        assert!((herfindahl_index(&[4.0], 4.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_herfindahl_even_split() {
        let values = [1.0, 1.0, 1.0, 1.0];
        assert!((herfindahl_index(&values, 4.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_herfindahl_zero_score_uses_absolute_sum() {
        let values = [2.0, -2.0];
        // Reference total becomes 4.0
        assert!((herfindahl_index(&values, 0.0) - 0.5).abs() < 1e-12);
        assert_eq!(herfindahl_index(&[], 0.0), 0.0);
    }

    #[test]
    fn test_concentration_ratio_top_four() {
        let values = [5.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        assert!((concentration_ratio(&values, 10.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_concentration_ratio_uses_magnitudes() {
        let values = [-3.0, 1.0];
        assert!((concentration_ratio(&values, -2.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_treemap_serialization_skips_empty_fields() {
        let tree = TreemapNode::branch("LCA result", vec![TreemapNode::leaf("steel", 2.5)]);
        let json = serde_json::to_value(&tree).unwrap();
        assert!(json.get("size").is_none());
        assert_eq!(json["children"][0]["size"], 2.5);
        assert!(json["children"][0].get("children").is_none());
    }
}
