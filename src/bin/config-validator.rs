//! # DataGuard Configuration Validator
//!
//! Command-line tool for validating DataGuard configuration files across
//! environments. Loads the same layers the library does and reports problems
//! before the application starts.

use clap::{Parser, Subcommand};
use dataguard_core::config::{ConfigManager, DataguardConfig};
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "config-validator")]
#[command(about = "Validate DataGuard configuration files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Environment to validate (development, test, production, ...)
    #[arg(short, long, default_value = "development")]
    environment: String,

    /// Configuration directory path (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format (table, json)
    #[arg(long, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate every configuration section
    All,

    /// Validate one configuration section
    Component {
        /// Section name (cache, retry, orchestration, chat, logging)
        name: String,
    },

    /// List environments that have an override file
    Environments,

    /// Print the merged configuration
    Show,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .try_init();

    let result = match &cli.command {
        Some(Commands::All) | None => validate_all_config(&cli),
        Some(Commands::Component { name }) => validate_component(&cli, name),
        Some(Commands::Environments) => list_environments(&cli),
        Some(Commands::Show) => show_config(&cli),
    };

    match result {
        Ok(()) => {
            info!("Configuration validation completed successfully");
        }
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            eprintln!("Configuration validation failed: {e}");
            process::exit(1);
        }
    }
}

fn config_directory(cli: &Cli) -> PathBuf {
    cli.config_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("config"))
}

fn load(cli: &Cli) -> Result<std::sync::Arc<ConfigManager>, Box<dyn std::error::Error>> {
    Ok(ConfigManager::load_from_directory_with_env(
        Some(config_directory(cli)),
        &cli.environment,
    )?)
}

fn validate_all_config(cli: &Cli) -> CliResult {
    println!("Validating DataGuard configuration");
    println!("Environment: {}", cli.environment);
    println!("Config Directory: {}", config_directory(cli).display());
    println!();

    let manager = load(cli)?;
    let config = manager.config();

    for section in SECTIONS {
        print_section(config, section)?;
    }

    println!("\nAll configuration validation checks passed!");
    Ok(())
}

fn validate_component(cli: &Cli, name: &str) -> CliResult {
    let section = name.to_lowercase();
    if !SECTIONS.contains(&section.as_str()) {
        return Err(format!("Unknown component: {name}").into());
    }

    let manager = load(cli)?;
    print_section(manager.config(), &section)?;

    println!("Component '{name}' validation passed!");
    Ok(())
}

fn list_environments(cli: &Cli) -> CliResult {
    let dir = config_directory(cli);
    println!("Available environments in {}:", dir.display());

    if !dir.exists() {
        println!("  (directory not found)");
        return Ok(());
    }

    let mut environments = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if let Some(environment) = name
            .strip_prefix("dataguard-")
            .and_then(|rest| rest.strip_suffix(".toml"))
        {
            environments.push(environment.to_string());
        }
    }
    environments.sort();

    for environment in environments {
        println!("  • {environment}");
    }

    Ok(())
}

fn show_config(cli: &Cli) -> CliResult {
    let manager = load(cli)?;

    match cli.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(manager.config())?),
        "table" => {
            for section in SECTIONS {
                print_section(manager.config(), section)?;
            }
        }
        other => return Err(format!("Unsupported format: {other}").into()),
    }

    Ok(())
}

const SECTIONS: [&str; 5] = ["cache", "retry", "orchestration", "chat", "logging"];

fn print_section(config: &DataguardConfig, section: &str) -> CliResult {
    let value = match section {
        "cache" => serde_json::to_value(&config.cache)?,
        "retry" => serde_json::to_value(&config.retry)?,
        "orchestration" => serde_json::to_value(&config.orchestration)?,
        "chat" => serde_json::to_value(&config.chat)?,
        "logging" => serde_json::to_value(&config.logging)?,
        other => return Err(format!("Unknown component: {other}").into()),
    };

    println!("[{section}]");
    if let Some(fields) = value.as_object() {
        for (field, field_value) in fields {
            println!("  {field:<20} {field_value}");
        }
    }
    Ok(())
}
