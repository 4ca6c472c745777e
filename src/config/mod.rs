// src/config/mod.rs
pub mod activity;
pub mod settings;

// Re-export commonly used types
pub use activity::{ActivityKey, Demand, MethodRef};
pub use settings::ReportSettings;
