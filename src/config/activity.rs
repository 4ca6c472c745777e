// src/config/activity.rs
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies an activity or elementary flow as `(database, code)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivityKey {
    pub database: String,
    pub code: String,
}

impl ActivityKey {
    pub fn new(database: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            code: code.into(),
        }
    }
}

impl fmt::Display for ActivityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.database, self.code)
    }
}

/// Functional unit: activity → demanded amount.
pub type Demand = BTreeMap<ActivityKey, f64>;

/// Impact assessment method reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodRef {
    /// Identifier parts, usually a `(method, category, indicator)` triple
    pub name: Vec<String>,
    pub unit: String,
}

impl MethodRef {
    pub fn new<I, S>(name: I, unit: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into_iter().map(Into::into).collect(),
            unit: unit.into(),
        }
    }

    pub fn display_name(&self) -> String {
        self.name.join(": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display_name() {
        let method = MethodRef::new(["IPCC 2013", "climate change", "GWP 100a"], "kg CO2-Eq");
        assert_eq!(method.display_name(), "IPCC 2013: climate change: GWP 100a");
        assert_eq!(method.unit, "kg CO2-Eq");
    }

    #[test]
    fn test_demand_orders_by_key() {
        let mut demand = Demand::new();
        demand.insert(ActivityKey::new("db", "b"), 2.0);
        demand.insert(ActivityKey::new("db", "a"), 1.0);
        let codes: Vec<_> = demand.keys().map(|k| k.code.as_str()).collect();
        assert_eq!(codes, vec!["a", "b"]);
    }
}
