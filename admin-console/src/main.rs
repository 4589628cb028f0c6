use admin_console::{
    config::{AppConfig, LogFormat, LoggingConfig},
    Cli, Console,
};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(logging: &LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "admin_console={level},admin_sdk={level}",
            level = logging.level
        )
        .into()
    });

    // Logs go to stderr; stdout carries command output only.
    let registry = tracing_subscriber::registry().with(env_filter);
    match logging.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config decides the log format, so it loads before tracing starts.
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    tracing::debug!("Loaded config: {:?}", config);

    let console = Console::from_config(&config)?;
    match console.run(cli.command).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    }
}
