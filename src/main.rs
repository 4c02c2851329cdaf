use clap::Parser;
use college_mobility::utils::{logger, validation::Validate};
use college_mobility::{AnalysisEngine, CliConfig, LocalStorage, MobilityPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting college-mobility CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // Storage is rooted at the working directory so the dataset paths and the
    // output path both resolve relative to where the tool runs.
    let storage = LocalStorage::new(".".to_string());
    let pipeline = MobilityPipeline::new(storage, config);

    let engine = AnalysisEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Mobility analysis completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Mobility analysis completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Mobility analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                college_mobility::utils::error::ErrorSeverity::Low => 0,
                college_mobility::utils::error::ErrorSeverity::Medium => 2,
                college_mobility::utils::error::ErrorSeverity::High => 1,
                college_mobility::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
