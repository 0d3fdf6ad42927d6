// saftq/src/main.rs

mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    // Setup Logging (Tracing)
    // RUST_LOG=debug saftq run ... pour voir les détails
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            report_dir,
            full_clean,
            config,
        } => commands::run::execute(input, output, report_dir, full_clean, config),
        Commands::Check {
            input,
            report,
            config,
        } => commands::check::execute(input, report, config),
        Commands::Inspect { input, limit } => commands::inspect::execute(input, limit),
    };

    if let Err(e) = result {
        eprintln!("\n💥 ERROR: {:#}", e);
        std::process::exit(1);
    }
}
