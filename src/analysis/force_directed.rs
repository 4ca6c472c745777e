// src/analysis/force_directed.rs
use serde::{Serialize, Deserialize};
use anyhow::{Result, anyhow};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use crate::config::{ActivityKey, Demand, MethodRef};
use super::impact::ActivityCatalog;

pub const FUNCTIONAL_UNIT: &str = "Functional unit";

#[derive(Debug, Clone, PartialEq)]
pub struct SupplyNode {
    /// `None` for the functional unit root
    pub activity: Option<ActivityKey>,
    pub amount: f64,
    /// Impact of this node including its upstream supply chain
    pub cumulative: f64,
    /// Impact of this node's own direct emissions
    pub individual: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupplyEdge {
    pub amount: f64,
    pub impact: f64,
}

/// Supply chain graph as produced by a traversal engine. Edges point from
/// supplier to consumer.
#[derive(Debug, Clone)]
pub struct Traversal {
    pub graph: DiGraph<SupplyNode, SupplyEdge>,
    pub root: NodeIndex,
    pub score: f64,
}

pub trait GraphTraversal {
    fn calculate(&self, demand: &Demand, method: &MethodRef) -> Result<Traversal>;

    /// Prunes the graph down to what is worth drawing. Returning the
    /// traversal unchanged is a valid (if cluttered) simplification.
    fn simplify(&self, traversal: Traversal) -> Result<Traversal> {
        Ok(traversal)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForceNode {
    pub id: usize,
    pub key: Option<ActivityKey>,
    pub name: String,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub amount: f64,
    pub cum: f64,
    pub ind: f64,
    pub fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForceEdge {
    pub source: usize,
    pub target: usize,
    pub amount: f64,
    pub impact: f64,
    pub fraction: f64,
}

/// The `force_directed` block of a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForceDirectedGraph {
    pub nodes: Vec<ForceNode>,
    pub edges: Vec<ForceEdge>,
    pub total: f64,
}

fn fraction(value: f64, total: f64) -> f64 {
    if total == 0.0 { 0.0 } else { value / total }
}

/// Annotates the traversal with catalog metadata and flattens it into
/// dense, index-addressed nodes and edges. The root always gets id 0.
pub fn reformat(traversal: &Traversal, catalog: &dyn ActivityCatalog) -> Result<ForceDirectedGraph> {
    let graph = &traversal.graph;
    if graph.node_weight(traversal.root).is_none() {
        return Err(anyhow!("Traversal root {} is not in the graph", traversal.root.index()));
    }

    let order: Vec<NodeIndex> = std::iter::once(traversal.root)
        .chain(graph.node_indices().filter(|&idx| idx != traversal.root))
        .collect();

    let mut positions = vec![0usize; graph.node_count()];
    for (position, idx) in order.iter().enumerate() {
        positions[idx.index()] = position;
    }

    let mut nodes = Vec::with_capacity(order.len());
    for (id, &idx) in order.iter().enumerate() {
        let node = &graph[idx];
        let (name, unit, location) = match &node.activity {
            Some(key) => {
                let info = catalog.describe(key)?;
                (info.name, Some(info.unit), info.location)
            },
            None => (FUNCTIONAL_UNIT.to_string(), None, None),
        };

        nodes.push(ForceNode {
            id,
            key: node.activity.clone(),
            name,
            unit,
            location,
            amount: node.amount,
            cum: node.cumulative,
            ind: node.individual,
            fraction: fraction(node.cumulative, traversal.score),
        });
    }

    let edges = graph.edge_references()
        .map(|edge| ForceEdge {
            source: positions[edge.source().index()],
            target: positions[edge.target().index()],
            amount: edge.weight().amount,
            impact: edge.weight().impact,
            fraction: fraction(edge.weight().impact, traversal.score),
        })
        .collect();

    Ok(ForceDirectedGraph {
        nodes,
        edges,
        total: traversal.score,
    })
}
