pub mod loader;
pub mod orchestrator;
pub mod timeseries;
