//! imagesearch CLI - Command-line interface
//!
//! This binary provides a command-line interface to the imagesearch library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::common::EngineArgs;
use commands::config::ConfigCommands;
use commands::search::SearchArgs;

#[derive(Parser)]
#[command(name = "imagesearch")]
#[command(version = imagesearch::VERSION)]
#[command(about = "Search-as-you-type image gallery", long_about = None)]
struct Cli {
    /// Log to stdout as well as the log file, at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search, wait for the gallery to load, and print it
    Search {
        /// Search term
        term: String,

        #[command(flatten)]
        engine: EngineArgs,

        /// Choose the image in this slot once the gallery has loaded
        #[arg(long)]
        select: Option<usize>,
    },

    /// Read search terms from stdin, one per line
    Interactive {
        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Search {
            term,
            engine,
            select,
        } => commands::search::run(SearchArgs {
            term,
            engine,
            select,
            verbose: cli.verbose,
        }),
        Commands::Interactive { engine } => commands::interactive::run(engine, cli.verbose),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
