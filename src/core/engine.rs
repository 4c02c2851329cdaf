use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting mobility analysis");
        self.monitor.log_stats("Startup");

        tracing::info!("📥 Extracting datasets...");
        let tables = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Extracted {} mobility rows and {} cost rows",
            tables.mobility.len(),
            tables.cost.len()
        );
        self.monitor.log_stats("Extract complete");

        tracing::info!("🔄 Transforming data...");
        let report = self.pipeline.transform(tables).await?;
        tracing::info!(
            "🔄 Analyzed {} institutions matching the selection",
            report.institutions.len()
        );
        self.monitor.log_stats("Transform complete");

        tracing::info!("💾 Writing report...");
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("💾 Report saved to: {}", output_path);
        self.monitor.log_stats("Load complete");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
