// Paraphraser Core Services

pub mod config_store;
pub mod providers;
pub mod analysis;

pub use config_store::*;
pub use providers::*;
pub use analysis::{AnalysisError, Analyzer};
