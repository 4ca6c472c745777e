// src/analysis/impact.rs
use serde::{Serialize, Deserialize};
use anyhow::Result;
use crate::config::{ActivityKey, Demand, MethodRef};

/// One nonzero entry of the characterized inventory matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterizedFlow {
    /// Elementary flow (matrix row)
    pub flow: ActivityKey,
    /// Emitting activity (matrix column)
    pub activity: ActivityKey,
    pub amount: f64,
}

/// Output of a single deterministic LCA calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LcaResult {
    pub score: f64,
    pub characterized_inventory: Vec<CharacterizedFlow>,
}

impl LcaResult {
    pub fn inventory_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.characterized_inventory.iter().map(|entry| entry.amount)
    }
}

/// Display metadata for an activity or flow key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityInfo {
    pub name: String,
    pub unit: String,
    pub location: Option<String>,
}

/// Inventory + impact assessment (`lci` then `lcia`).
pub trait ImpactCalculator {
    fn calculate(&self, demand: &Demand, method: &MethodRef) -> Result<LcaResult>;
}

/// Resolves keys back to names and units.
pub trait ActivityCatalog {
    fn describe(&self, key: &ActivityKey) -> Result<ActivityInfo>;
}
