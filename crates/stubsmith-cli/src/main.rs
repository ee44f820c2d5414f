//! Stubsmith CLI - pytest stubs from Python modules, FastAPI projects from templates.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stubsmith_ops::{Config, OpsContext};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::config as config_cmd;

/// Stubsmith CLI - Generate pytest stubs and bootstrap FastAPI projects.
#[derive(Parser, Debug)]
#[command(
    name = "stubsmith",
    author,
    version,
    about = "Stubsmith: pytest stubs and FastAPI project templates",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a pytest module of placeholder tests for a Python file.
    Test {
        /// Source Python file to generate tests for.
        source_file: PathBuf,

        /// Output test file path (default: tests/test_<source_file>).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate FastAPI client scaffolding even if no routes are found.
        #[arg(long)]
        fastapi: bool,
    },

    /// Show the functions, classes and routes found in a Python file.
    Scan {
        /// Source Python file to scan.
        source_file: PathBuf,

        /// Print the catalogue as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Create a new FastAPI project from a template.
    Init {
        /// Name of the new project.
        project_name: String,

        /// Template to use (hello-world, intermediate-api, production-ready).
        template: String,

        /// Output directory.
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },

    /// List available project templates.
    Templates,

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup tracing: explicit flags win over RUST_LOG
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Test {
            source_file,
            output,
            fastapi,
        } => {
            let ctx = OpsContext::default_config()?;
            commands::test::execute(&ctx, source_file, output, fastapi, cli.quiet)?;
        }

        Commands::Scan { source_file, json } => {
            let ctx = OpsContext::default_config()?;
            commands::scan::execute(&ctx, source_file, json)?;
        }

        Commands::Init {
            project_name,
            template,
            path,
        } => {
            let ctx = OpsContext::default_config()?;
            commands::init::execute(&ctx, &project_name, &template, path)?;
        }

        Commands::Templates => {
            let ctx = OpsContext::default_config()?;
            commands::init::list(&ctx);
        }

        Commands::Config(config_cmd_inner) => run_config(config_cmd_inner)?,
    }

    Ok(())
}

fn run_config(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            config_cmd::show(&Config::load()?);
        }
        ConfigCommands::Set { key, value } => {
            // File layer only; env overrides stay out of the saved file
            let mut config = Config::load_file()?;
            config_cmd::set(&mut config, &key, &value)?;
        }
        ConfigCommands::Get { key } => {
            config_cmd::get(&Config::load()?, &key)?;
        }
        ConfigCommands::Reset => {
            config_cmd::reset()?;
        }
        ConfigCommands::Path => {
            if let Some(path) = Config::config_file_path() {
                println!("{}", path.display());
            } else {
                println!("(no config file path available)");
            }
        }
    }

    Ok(())
}
