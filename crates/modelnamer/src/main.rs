//! modelnamer - APIpie provider config generator.
//!
//! This is the main entry point for the modelnamer CLI.

mod commands;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use commands::{handle_cache, handle_generate, CacheCommands, GenerateArgs};
use modelnamer_util::{LogConfig, LogLevel};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "modelnamer")]
#[command(
    author,
    version,
    about = "Generate the APIpie provider config with readable model names",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Name cache database
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Options for the default generate command
    #[command(flatten)]
    generate: GenerateArgs,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog, resolve names and write the provider config
    Generate(GenerateArgs),
    /// Inspect or maintain the name cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    modelnamer_util::log::init(LogConfig {
        level: if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        },
        include_location: cli.verbose,
        ansi: std::io::stderr().is_terminal(),
    });

    let command = match cli.command {
        Some(_) if cli.generate.is_set() => Cli::command()
            .error(
                ErrorKind::ArgumentConflict,
                "--output and --max-age-days go after the generate subcommand",
            )
            .exit(),
        Some(command) => command,
        None => Commands::Generate(cli.generate),
    };
    if let Commands::Version = command {
        print_version();
        return Ok(());
    }

    let config = commands::load_config(cli.config.as_deref(), cli.cache).await?;
    match command {
        Commands::Generate(args) => handle_generate(config, args).await,
        Commands::Cache { command } => handle_cache(config, command).await,
        Commands::Version => Ok(()),
    }
}

fn print_version() {
    println!("modelnamer {}", env!("CARGO_PKG_VERSION"));
}
