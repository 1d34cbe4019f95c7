//! Command-line interface definition using clap.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;

/// Install a crash report handler and wait for a fatal signal.
#[derive(Parser, Debug)]
#[command(name = "sigreport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Where to write the crash report
    ///
    /// Relative paths are resolved against the working directory at startup.
    ///
    /// Config: report.path
    #[arg(long = "report-path", env = "SIGREPORT_REPORT_PATH", value_hint = ValueHint::FilePath)]
    pub report_path: Option<PathBuf>,

    /// Do not set up an alternate signal stack
    ///
    /// Config: signals.alt_stack
    #[arg(long = "no-alt-stack")]
    pub no_alt_stack: bool,

    /// Deliver this signal to the process right after installation
    ///
    /// Accepts names (SIGTERM, TERM) or numbers (15).
    #[arg(long, value_name = "SIGNAL")]
    pub raise: Option<String>,

    /// Crash the process with a real fault right after installation
    #[arg(long, value_enum, value_name = "KIND", conflicts_with = "raise")]
    pub crash: Option<CrashKind>,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Kind of fault produced by `--crash`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrashKind {
    /// Write into the unmapped first page (SIGSEGV)
    Segv,
    /// Recurse until the stack is exhausted (SIGSEGV on the guard page)
    Overflow,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration as TOML
    Show,
    /// Print the JSON schema of the configuration file
    Schema,
}

impl Cli {
    /// Generate shell completions and print to stdout.
    pub fn print_completions(shell: Shell) {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "sigreport", &mut io::stdout());
    }
}
