pub mod dataset;
pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{
    AnalysisReport, Institution, MergeStats, Selection, SourceTables,
};
pub use crate::domain::ports::{Pipeline, RunConfig, Storage};
pub use crate::utils::error::Result;
