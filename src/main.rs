use clap::Parser;
use race_registration::utils::{logger, validation::Validate};
use race_registration::{app, CliConfig, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.log_json);

    tracing::info!("Starting race-registration server");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            let config = TomlConfig::from_file(path)?;
            validate_or_exit(&config);
            app::serve(&config).await
        }
        None => {
            validate_or_exit(&cli);
            app::serve(&cli).await
        }
    };

    if let Err(e) = &result {
        tracing::error!("❌ Server failed: {}", e);
    }
    Ok(result?)
}

fn validate_or_exit<C: Validate>(config: &C) {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
