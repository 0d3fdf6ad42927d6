// saftq/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "saftq")]
#[command(about = "SAF-T invoice ETL & data-quality toolkit", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the full pipeline (Extract -> Clean -> Export -> Quality report)
    Run {
        /// Source file (.xlsx or .csv)
        #[arg(long, short)]
        input: PathBuf,

        /// Destination file for the cleaned dataset (.xlsx or .csv)
        #[arg(long, short)]
        output: PathBuf,

        /// Directory where JSON reports are written
        #[arg(long, default_value = "relatorios")]
        report_dir: PathBuf,

        /// Also deduplicate, drop null required rows and sparse columns
        #[arg(long, default_value = "false")]
        full_clean: bool,

        /// Explicit config file (default: saftq.yaml next to the input)
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// 🩺 Runs the quality battery on a file without cleaning it
    Check {
        /// File to audit (.xlsx or .csv)
        #[arg(long, short)]
        input: PathBuf,

        /// Optional path to write the quality report as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Explicit config file (default: saftq.yaml next to the input)
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// 🔍 Shows the columns and first rows of a file
    Inspect {
        /// File to inspect (.xlsx or .csv)
        #[arg(long, short)]
        input: PathBuf,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run_defaults() {
        let args = Cli::parse_from(["saftq", "run", "-i", "vendas.xlsx", "-o", "out.xlsx"]);
        match args.command {
            Commands::Run {
                input,
                output,
                report_dir,
                full_clean,
                config,
            } => {
                assert_eq!(input.to_string_lossy(), "vendas.xlsx");
                assert_eq!(output.to_string_lossy(), "out.xlsx");
                assert_eq!(report_dir.to_string_lossy(), "relatorios");
                assert!(!full_clean);
                assert_eq!(config, None);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_full_clean() {
        let args = Cli::parse_from([
            "saftq",
            "run",
            "--input",
            "a.csv",
            "--output",
            "b.csv",
            "--full-clean",
            "--report-dir",
            "/tmp/reports",
        ]);
        match args.command {
            Commands::Run {
                full_clean,
                report_dir,
                ..
            } => {
                assert!(full_clean);
                assert_eq!(report_dir.to_string_lossy(), "/tmp/reports");
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_check_with_report() {
        let args = Cli::parse_from(["saftq", "check", "-i", "vendas.csv", "--report", "q.json"]);
        match args.command {
            Commands::Check { input, report, .. } => {
                assert_eq!(input.to_string_lossy(), "vendas.csv");
                assert_eq!(report.unwrap().to_string_lossy(), "q.json");
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_parse_inspect_limit() {
        let args = Cli::parse_from(["saftq", "inspect", "-i", "vendas.xlsx", "--limit", "12"]);
        match args.command {
            Commands::Inspect { limit, .. } => assert_eq!(limit, 12),
            _ => panic!("Expected Inspect command"),
        }
    }
}
