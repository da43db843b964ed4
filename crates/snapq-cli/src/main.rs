//! snapq CLI
//!
//! Command-line interface for listing snapshots in a fixture-backed cluster

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "snapq")]
#[command(about = "snapq - List snapshots across repositories", long_about = None)]
struct Cli {
    /// Log output format: pretty or json
    #[arg(long, global = true, default_value = "pretty")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List snapshots
    List(commands::list::ListArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    snapq_core::logging_facility::init(snapq_core::logging_facility::Profile::parse(
        &cli.log_format,
    ));

    let result = match cli.command {
        Commands::List(args) => commands::list::execute(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
