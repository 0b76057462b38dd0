//! netk - Network K-function analysis from the command line.

use clap::Parser;
use netk_cli::commands;
use netk_cli::config::OutputFormat;
use netk_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> netk_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config, or defaults when there is no file yet
    let config_path = Config::resolve_path(cli.config.as_deref())?;
    let config = Config::load_from(&config_path)?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Analyze(args) => {
            commands::execute_analyze(args, &config.analysis, &formatter).await?;
        }
        Command::Length(args) => {
            commands::execute_length(args, &formatter)?;
        }
        Command::Distances(args) => {
            commands::execute_distances(args, &config.analysis, &formatter)?;
        }
        Command::Sample(args) => {
            // Points come out as JSON unless a format is asked for explicitly
            let format = cli.format.map(Into::into).unwrap_or(OutputFormat::Json);
            commands::execute_sample(args, &Formatter::new(format, color_enabled))?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
    }

    Ok(())
}

/// Log to stderr; `-v` flags take precedence over `RUST_LOG`
fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
