pub mod analysis;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::toml_config::AppConfig;
pub use core::{engine::AnalysisEngine, pipeline::MobilityPipeline};
pub use utils::error::{MobilityError, Result};
