use clap::Parser;
use college_mobility::core::{dataset, Pipeline};
use college_mobility::dashboard::{self, DashboardState};
use college_mobility::utils::{logger, validation::Validate};
use college_mobility::{AppConfig, LocalStorage, MobilityPipeline};

#[derive(Parser)]
#[command(name = "mobility-dashboard")]
#[command(about = "Serves the college mobility dashboard over HTTP")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "mobility.toml")]
    config: String,

    /// Override the listen host from the config file
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port from the config file
    #[arg(long)]
    port: Option<u16>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines instead of human-readable output
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting mobility dashboard server");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "✅ Configuration loaded: {} v{}",
        config.pipeline.name,
        config.pipeline.version
    );

    let host = args
        .host
        .unwrap_or_else(|| config.dashboard_host().to_string());
    let port = args.port.unwrap_or_else(|| config.dashboard_port());
    let default_min_q1_share = config.min_q1_share();

    // Load and merge the datasets once at startup; every request is then
    // served from memory.
    let storage = LocalStorage::new(".".to_string());
    let pipeline = MobilityPipeline::new(storage, config);

    let tables = match pipeline.extract().await {
        Ok(tables) => tables,
        Err(e) => {
            tracing::error!("❌ Failed to load datasets: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let (institutions, merge) = match dataset::merge_datasets(tables) {
        Ok(merged) => merged,
        Err(e) => {
            tracing::error!("❌ Failed to merge datasets: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    tracing::info!(
        "📊 Serving {} institutions ({} mobility rows, {} cost rows)",
        institutions.len(),
        merge.mobility_rows,
        merge.cost_rows
    );

    let state = DashboardState {
        institutions,
        merge,
        default_min_q1_share,
    };

    let server = dashboard::start_server(state, &host, port)?;
    tracing::info!("📡 Dashboard listening on http://{}:{}", host, port);
    println!("📡 Dashboard available at http://{}:{}", host, port);

    server.await?;
    Ok(())
}
