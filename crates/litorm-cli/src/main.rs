//! litorm CLI
//!
//! Sample program for the mapping engine

use clap::{Parser, Subcommand};
use litorm_core::logging_facility::{init, Profile};

mod commands;
mod person;

#[derive(Debug, Parser)]
#[command(name = "litorm")]
#[command(about = "litorm - record mapping over SQLite", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or age a table of people and commit the changes
    Demo(commands::demo::DemoArgs),
    /// Print the create-table statement for the Person record
    Ddl,
}

fn main() {
    init(Profile::Development);
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Demo(args) => commands::demo::execute(args),
        Commands::Ddl => commands::ddl::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
