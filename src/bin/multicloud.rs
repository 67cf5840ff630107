use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use multicloud::cli::build::Builder;
use multicloud::cli::config::ConfigStore;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "multicloud", version, about = "MultiCloud framework CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage MultiCloud CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Build a deployment package for a function project
    Build(BuildArgs),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Get configuration value(s)
    Get {
        /// Dot-path key, e.g. `author.name`; prints the whole
        /// configuration when omitted
        key: Option<String>,
    },

    /// Set a configuration value
    Set {
        /// Dot-path key, e.g. `defaults.runtime`
        key: String,

        /// Value to store
        value: String,
    },

    /// Initialize configuration with author and default settings
    Init(InitArgs),

    /// Show configuration file paths
    Path,

    /// Reset configuration to defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Parser)]
struct InitArgs {
    /// Author name
    #[arg(long, default_value = "")]
    name: String,

    /// Author email
    #[arg(long, default_value = "")]
    email: String,

    /// Default runtime
    #[arg(long, default_value = "rust")]
    runtime: String,

    /// Default memory limit
    #[arg(long, default_value = "128Mi")]
    memory: String,

    /// Default invocation timeout
    #[arg(long, default_value = "30s")]
    timeout: String,
}

#[derive(Parser)]
struct BuildArgs {
    /// Project directory containing multicloud.yaml
    #[arg(default_value = ".")]
    path: PathBuf,
}

fn handle_config_command(command: &ConfigCommands) -> Result<()> {
    let mut store = ConfigStore::new().context("failed to open configuration store")?;

    match command {
        ConfigCommands::Get { key: Some(key) } => match store.get(key)? {
            Some(value) => println!("{}: {}", key, render_value(&value)),
            None => println!("Configuration key '{}' not found.", key),
        },
        ConfigCommands::Get { key: None } => {
            let config = store.load()?;
            print!("{}", serde_yaml::to_string(&config)?);
        }
        ConfigCommands::Set { key, value } => {
            store.set(key, value.as_str())?;
            println!("Set '{}' to '{}' in configuration.", key, value);
        }
        ConfigCommands::Init(args) => {
            store.set("author.name", args.name.as_str())?;
            store.set("author.email", args.email.as_str())?;
            store.set("defaults.runtime", args.runtime.as_str())?;
            store.set("defaults.memory", args.memory.as_str())?;
            store.set("defaults.timeout", args.timeout.as_str())?;

            println!("Configuration saved!");
            println!("Config file: {}", store.config_file().display());
        }
        ConfigCommands::Path => {
            println!("Config file: {}", store.config_file().display());
            println!("Config directory: {}", store.config_dir().display());
        }
        ConfigCommands::Reset { yes } => {
            if *yes || confirm("Are you sure you want to reset all configuration?")? {
                store.reset()?;
                println!("Configuration reset to defaults");
            }
        }
    }

    Ok(())
}

fn handle_build_command(args: &BuildArgs) -> Result<()> {
    let builder = Builder::new(&args.path);
    let target = builder.stage().context("build failed")?;
    println!("Build package staged at {}", target.display());
    Ok(())
}

/// Scalars print bare (`author.name: Jane`), everything else as YAML.
fn render_value(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(text) => text.clone(),
        other => serde_yaml::to_string(other)
            .map(|rendered| rendered.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer())
        .init();

    let result = match &cli.command {
        Commands::Config { command } => handle_config_command(command),
        Commands::Build(args) => handle_build_command(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
