//! Stand-in LCA engines for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use lca_report::analysis::{
    CharacterizedFlow, HintonMatrix, ParametricSampler, SupplyEdge,
    SupplyNode, Traversal, TreemapNode, UncertaintyDistribution,
};
use lca_report::{
    ActivityCatalog, ActivityInfo, ActivityKey, ContributionAnalyzer, Demand, Engines,
    GraphTraversal, ImpactCalculator, LcaResult, MethodRef,
};
use petgraph::graph::DiGraph;

pub fn steel() -> ActivityKey {
    ActivityKey::new("ecoinvent", "steel")
}

pub fn power() -> ActivityKey {
    ActivityKey::new("ecoinvent", "power")
}

pub fn co2() -> ActivityKey {
    ActivityKey::new("biosphere", "co2")
}

pub fn ch4() -> ActivityKey {
    ActivityKey::new("biosphere", "ch4")
}

pub fn demand(amount: f64) -> Demand {
    let mut demand = Demand::new();
    demand.insert(steel(), amount);
    demand
}

pub fn method() -> MethodRef {
    MethodRef::new(["IPCC 2013", "climate change", "GWP 100a"], "kg CO2-Eq")
}

pub struct MapCatalog(HashMap<ActivityKey, ActivityInfo>);

impl MapCatalog {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        for (key, name, unit, location) in [
            (steel(), "steel production", "kilogram", Some("RER")),
            (power(), "electricity, medium voltage", "kilowatt hour", Some("DE")),
            (co2(), "Carbon dioxide, fossil", "kilogram", None),
            (ch4(), "Methane, fossil", "kilogram", None),
        ] {
            entries.insert(key, ActivityInfo {
                name: name.to_string(),
                unit: unit.to_string(),
                location: location.map(str::to_string),
            });
        }
        Self(entries)
    }
}

impl ActivityCatalog for MapCatalog {
    fn describe(&self, key: &ActivityKey) -> Result<ActivityInfo> {
        self.0.get(key).cloned().ok_or_else(|| anyhow!("unknown key {}", key))
    }
}

/// Fixed characterized inventory scaled by the demanded amount of steel.
pub struct LinearCalculator;

impl ImpactCalculator for LinearCalculator {
    fn calculate(&self, demand: &Demand, _method: &MethodRef) -> Result<LcaResult> {
        let amount = demand.get(&steel()).copied().unwrap_or(0.0);
        let characterized_inventory = vec![
            CharacterizedFlow { flow: co2(), activity: steel(), amount: 3.0 * amount },
            CharacterizedFlow { flow: co2(), activity: power(), amount: 1.5 * amount },
            CharacterizedFlow { flow: ch4(), activity: power(), amount: 0.5 * amount },
        ];
        let score = characterized_inventory.iter().map(|f| f.amount).sum();
        Ok(LcaResult { score, characterized_inventory })
    }
}

pub struct FailingCalculator;

impl ImpactCalculator for FailingCalculator {
    fn calculate(&self, _demand: &Demand, _method: &MethodRef) -> Result<LcaResult> {
        Err(anyhow!("technosphere matrix is singular"))
    }
}

pub struct TableContribution;

impl ContributionAnalyzer for TableContribution {
    fn hinton_matrix(&self, lca: &LcaResult) -> Result<HintonMatrix> {
        let results = lca.characterized_inventory.iter()
            .enumerate()
            .map(|(i, flow)| (i, i, flow.amount.abs()))
            .collect();
        Ok(HintonMatrix {
            results,
            total: lca.score,
            xlabels: lca.characterized_inventory.iter().map(|f| f.activity.code.clone()).collect(),
            ylabels: lca.characterized_inventory.iter().map(|f| f.flow.code.clone()).collect(),
        })
    }

    fn treemap(&self, lca: &LcaResult) -> Result<TreemapNode> {
        let children = lca.characterized_inventory.iter()
            .map(|f| TreemapNode::leaf(format!("{} / {}", f.activity.code, f.flow.code), f.amount))
            .collect();
        Ok(TreemapNode::branch("LCA result", children))
    }
}

pub struct TwoTierTraversal;

impl GraphTraversal for TwoTierTraversal {
    fn calculate(&self, demand: &Demand, _method: &MethodRef) -> Result<Traversal> {
        let amount = demand.get(&steel()).copied().unwrap_or(0.0);
        let mut graph = DiGraph::new();
        let root = graph.add_node(SupplyNode {
            activity: None,
            amount: 1.0,
            cumulative: 5.0 * amount,
            individual: 0.0,
        });
        let steel_node = graph.add_node(SupplyNode {
            activity: Some(steel()),
            amount,
            cumulative: 5.0 * amount,
            individual: 3.0 * amount,
        });
        let power_node = graph.add_node(SupplyNode {
            activity: Some(power()),
            amount: 4.0 * amount,
            cumulative: 2.0 * amount,
            individual: 2.0 * amount,
        });
        graph.add_edge(steel_node, root, SupplyEdge { amount, impact: 5.0 * amount });
        graph.add_edge(power_node, steel_node, SupplyEdge { amount: 4.0 * amount, impact: 2.0 * amount });
        Ok(Traversal { graph, root, score: 5.0 * amount })
    }
}

pub fn normal_sampler(mean: f64, std_dev: f64, seed: u64) -> ParametricSampler {
    let mut sampler = ParametricSampler::new(Some(seed));
    sampler.add_term(steel(), UncertaintyDistribution::Normal { mean, std_dev }, 1.0);
    sampler
}

pub fn fixed_sampler(value: f64) -> ParametricSampler {
    let mut sampler = ParametricSampler::new(None);
    sampler.add_term(steel(), UncertaintyDistribution::Fixed { value }, 1.0);
    sampler
}

pub struct Fixture {
    pub catalog: MapCatalog,
    pub calculator: LinearCalculator,
    pub contribution: TableContribution,
    pub traversal: TwoTierTraversal,
    pub sampler: ParametricSampler,
}

impl Fixture {
    pub fn new(sampler: ParametricSampler) -> Self {
        Self {
            catalog: MapCatalog::new(),
            calculator: LinearCalculator,
            contribution: TableContribution,
            traversal: TwoTierTraversal,
            sampler,
        }
    }

    pub fn engines(&self) -> Engines<'_> {
        Engines {
            catalog: &self.catalog,
            calculator: &self.calculator,
            contribution: &self.contribution,
            traversal: &self.traversal,
            sampler: &self.sampler,
        }
    }
}
