//! sigreport: install a crash report handler and wait for a fatal signal.

mod cli;
mod config;
#[cfg(unix)]
mod fault;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ConfigAction, CrashKind};
use config::{Config, generate_schema, init_config, load_config, load_config_from_path};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Load configuration (from file or default)
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    // Apply CLI overrides
    if let Some(path) = &cli.report_path {
        config.report.path = path.clone();
    }
    if cli.no_alt_stack {
        config.signals.alt_stack = false;
    }

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            Cli::print_completions(*shell);
            return Ok(());
        }
        Some(Commands::Config { action }) => {
            return handle_config_command(action, &cli, &config);
        }
        None => {}
    }

    log::debug!("Loaded config: {:?}", config);
    run_host(&config, cli.raise.as_deref(), cli.crash)
}

/// Handle config subcommands.
fn handle_config_command(action: &ConfigAction, cli: &Cli, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Init { force } => {
            let path = init_config(cli.config.as_deref(), *force)?;
            println!("Configuration file created at: {}", path.display());
        }
        ConfigAction::Show => {
            let content =
                toml::to_string_pretty(config).context("Failed to serialize configuration")?;
            print!("{}", content);
        }
        ConfigAction::Schema => {
            println!("{}", generate_schema()?);
        }
    }
    Ok(())
}

/// Install the handler, announce readiness, then idle until a signal ends the
/// process.
#[cfg(unix)]
fn run_host(config: &Config, raise: Option<&str>, crash: Option<CrashKind>) -> Result<()> {
    use std::io::Write;

    let raise = raise
        .map(|name| {
            sigreport_core::parse_signal(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown signal: {}", name))
        })
        .transpose()?;

    let settings = config.to_settings()?;
    sigreport_core::try_install(&settings).context("Failed to install crash handler")?;

    let mut stdout = std::io::stdout();
    writeln!(stdout, "ready {}", std::process::id())?;
    stdout.flush()?;

    if let Some(signal) = raise {
        log::info!("Raising {}", signal);
        nix::sys::signal::raise(signal).with_context(|| format!("Failed to raise {}", signal))?;
        log::warn!("{} did not terminate the process", signal);
    }
    if let Some(kind) = crash {
        log::info!("Triggering {:?} crash", kind);
        fault::trigger(kind);
        log::warn!("{:?} crash did not terminate the process", kind);
    }

    log::info!("Waiting for a signal (pid {})", std::process::id());
    loop {
        std::thread::park();
    }
}

#[cfg(not(unix))]
fn run_host(_config: &Config, _raise: Option<&str>, _crash: Option<CrashKind>) -> Result<()> {
    anyhow::bail!("sigreport requires a POSIX signal implementation")
}
