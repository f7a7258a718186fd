//! Statistics for the registry sink

pub mod metrics;

pub use metrics::{RegistryStats, SinkCounters};
