//! Command handlers

use std::path::PathBuf;

use chrono::Local;
use fleetsheet_app::app::{export_report, parse_colored_flag, ExportRequest};
use fleetsheet_app::config::Config;
use fleetsheet_infra::reconcile_client::ReconcileClient;
use fleetsheet_types::Result;

use crate::cli::{Cli, Commands};
use crate::output::output_export;

pub fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(ref server) = cli.server {
        config.server_url = server.clone();
    }

    match cli.command {
        Commands::Export {
            keys,
            colored,
            input,
            output_dir,
        } => cmd_export(&config, keys, &colored, input, output_dir),
        Commands::Config {
            show,
            set_server,
            set_input,
            set_output_dir,
            set_timeout,
            reset,
        } => cmd_config(show, set_server, set_input, set_output_dir, set_timeout, reset),
    }
}

fn cmd_export(
    config: &Config,
    keys: Vec<String>,
    colored: &str,
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    // Validate before touching the network
    let colored = parse_colored_flag(colored)?;

    let request = ExportRequest {
        input: input.unwrap_or_else(|| config.input_csv.clone()),
        keys,
        colored,
        output_dir: output_dir.unwrap_or_else(|| config.output_dir.clone()),
    };

    tracing::debug!(?request, "export request");
    eprintln!(
        "Submitting {} to {}",
        request.input.display(),
        config.server_url
    );
    let client = ReconcileClient::new(&config.server_url, config.request_timeout())?;
    let outcome = export_report(&client, &request, Local::now().date_naive())?;

    output_export(&outcome);
    Ok(())
}

fn cmd_config(
    show: bool,
    set_server: Option<String>,
    set_input: Option<PathBuf>,
    set_output_dir: Option<PathBuf>,
    set_timeout: Option<u64>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(server) = set_server {
        config.server_url = server;
        modified = true;
    }

    if let Some(input) = set_input {
        config.input_csv = input;
        modified = true;
    }

    if let Some(output_dir) = set_output_dir {
        config.output_dir = output_dir;
        modified = true;
    }

    if let Some(timeout) = set_timeout {
        config.request_timeout_secs = timeout;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
