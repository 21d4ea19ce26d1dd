//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleetsheet")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Reconcile a vehicle CSV against the fleet service and export a color-coded report")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Reconciliation service URL. Uses config value if not specified.
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit the CSV for reconciliation and write the XLSX report
    Export {
        /// Columns to include in the report (rnr is always first)
        #[arg(long, short = 'k', num_args = 1..)]
        keys: Vec<String>,

        /// Row coloring by inspection recency: True or False
        #[arg(long, short = 'c', default_value = "True")]
        colored: String,

        /// Input CSV. Uses config value if not specified.
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Output directory. Uses config value if not specified.
        #[arg(long, short = 'o')]
        output_dir: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set reconciliation service URL
        #[arg(long)]
        set_server: Option<String>,

        /// Set input CSV path
        #[arg(long)]
        set_input: Option<PathBuf>,

        /// Set output directory
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// Set request timeout in seconds
        #[arg(long)]
        set_timeout: Option<u64>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
