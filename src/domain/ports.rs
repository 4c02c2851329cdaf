use crate::domain::model::{AnalysisReport, Selection, SourceTables};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait RunConfig: Send + Sync {
    fn mobility_file(&self) -> &str;
    fn cost_file(&self) -> &str;
    fn mobility_url(&self) -> Option<&str>;
    fn cost_url(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn selection(&self) -> Result<Selection>;
    fn compress_output(&self) -> bool;
    fn archive_filename(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceTables>;
    async fn transform(&self, tables: SourceTables) -> Result<AnalysisReport>;
    async fn load(&self, report: AnalysisReport) -> Result<String>;
}
