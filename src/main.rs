use clap::Parser;
use worker_pool_stats::utils::{logger, validation::Validate};
use worker_pool_stats::{
    CliConfig, FileConfig, LocalStorage, RunSettings, StatsEngine, StatsError, StatsPipeline,
    WorkerManagerClient,
};

fn fail(e: &StatsError) -> ! {
    tracing::error!("❌ {} (exit code {})", e, e.exit_code());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}

fn load_settings(config: CliConfig) -> Result<RunSettings, StatsError> {
    let file = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            FileConfig::from_file(path)?
        }
        None => FileConfig::default(),
    };
    file.validate()?;

    let settings = config.into_settings(&file);
    settings.validate()?;
    Ok(settings)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    let settings = match load_settings(config) {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };

    let manager = match (&settings.root_url, settings.is_offline()) {
        (Some(root_url), false) => match WorkerManagerClient::new(root_url, settings.timeout) {
            Ok(client) => Some(client),
            Err(e) => fail(&e),
        },
        _ => None,
    };

    let pipeline = StatsPipeline::new(LocalStorage::default(), manager, settings);
    let engine = StatsEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => println!("{}", summary),
        Err(e) => fail(&e),
    }
}
