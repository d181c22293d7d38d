use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use stampede_config::{ConfigLoader, LogFormat, LoggingConfig, SuiteConfig};
use stampede_profiles::ProfileKind;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod cli;
mod report;
mod runner;

use cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first so logging can honor the configured level
    let config = ConfigLoader::new()
        .load(cli.config.as_ref())
        .context("failed to load configuration")?;

    init_tracing(cli.log_level.as_ref(), &config.logging);
    info!("Stampede CLI starting");

    match &cli.command {
        Some(Commands::Run { profile, out }) => {
            let kind: ProfileKind = profile.parse()?;
            let summary = runner::run(kind, &config, out.as_deref()).await?;
            if !summary.passed() {
                error!(profile = %kind, "one or more thresholds failed");
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::List) => handle_list(),
        Some(Commands::Config { config_cmd }) => match config_cmd {
            ConfigCommands::Validate { config_file } => handle_config_validate(config_file),
            ConfigCommands::Generate { output, force } => {
                handle_config_generate(output.as_ref(), *force)
            }
        },
        None => {
            // If no subcommand is provided, print help
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            cmd.print_help().context("failed to print help")?;
            println!();
            Ok(())
        }
    }
}

/// The CLI flag wins, then `RUST_LOG`, then the configured level.
fn init_tracing(log_level: Option<&String>, logging: &LoggingConfig) {
    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level '{level}', falling back to 'info'");
            EnvFilter::new("info")
        }),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str())),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
    debug!("tracing initialized");
}

fn handle_list() -> Result<()> {
    let mut cards = Vec::with_capacity(ProfileKind::all().len());
    for kind in ProfileKind::all() {
        cards.push(kind.card()?);
    }
    report::print_profiles(&cards);
    Ok(())
}

fn handle_config_validate(config_file: &PathBuf) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow::anyhow!(
            "Configuration file not found: {:?}",
            config_file
        ));
    }

    match ConfigLoader::new().load(Some(config_file)) {
        Ok(_config) => {
            println!("✅ Configuration file is valid");
            Ok(())
        }
        Err(e) => {
            println!("❌ Configuration validation failed: {e}");
            error!("Configuration validation failed: {e}");
            Err(e.into())
        }
    }
}

fn handle_config_generate(output: Option<&PathBuf>, force: bool) -> Result<()> {
    let sample = SuiteConfig::generate_sample();
    match output {
        Some(path) => {
            if path.exists() && !force {
                return Err(anyhow::anyhow!(
                    "Output file already exists: {:?}. Use --force to overwrite.",
                    path
                ));
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).context("failed to create output directory")?;
            }
            fs::write(path, sample)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("✅ Sample configuration written to {}", path.display());
        }
        None => print!("{sample}"),
    }
    Ok(())
}
