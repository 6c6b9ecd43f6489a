//! q2lsp - diagnostics for QIIME 2 command lines in shell scripts.

use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use q2lsp::Q2Error;
use q2lsp::app::AppContext;
use q2lsp::cli::Cli;
use q2lsp::cli::output::robot_error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(&cli) {
        eprintln!("Error: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.robot {
                let code = match &e {
                    Q2Error::Config(_) | Q2Error::MissingConfig(_) => "config",
                    Q2Error::InvalidSignature(_) | Q2Error::SignaturesNotFound(_) => "signatures",
                    Q2Error::ValidationFailed(_) => "validation_failed",
                    Q2Error::Io(_) | Q2Error::Json(_) => "error",
                };
                let payload = serde_json::to_string(&robot_error(code, e.to_string()))
                    .unwrap_or_default();
                println!("{payload}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> q2lsp::Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    q2lsp::cli::commands::run(&ctx, &cli.command)
}

/// Logs always go to stderr: stdout carries the protocol under `serve`.
fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let filter = if cli.quiet {
        "off"
    } else {
        match cli.verbose {
            0 => "warn,q2lsp=info",
            1 => "info,q2lsp=debug",
            2 => "debug,q2lsp=trace",
            _ => "trace",
        }
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);
    if cli.robot {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .context("install JSON logger")?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .context("install logger")?;
    }
    Ok(())
}
