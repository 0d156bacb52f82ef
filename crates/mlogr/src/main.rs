//! mlogr command-line entry point.

use clap::Parser;
use mlogr::{HelpfulError, PostHook, RunOptions};
use mlogr_logging::{init_logging, LogConfig};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "mlogr",
    version,
    about = "Prompt for log entries and store them in SQLite tables"
)]
struct Cli {
    /// Use supplied config file
    #[arg(
        short = 'c',
        long = "config-file",
        value_name = "FILE",
        default_value = mlogr::app::DEFAULT_CONFIG_FILE
    )]
    config_file: PathBuf,

    /// Print debugging information
    #[arg(short = 'd', long)]
    debug: bool,

    /// Use supplied database
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        default_value = mlogr::app::DEFAULT_DATABASE_FILE
    )]
    file: PathBuf,

    /// Print configured log tables and exit
    #[arg(short = 'p', long = "print-config")]
    print_config: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(LogConfig {
        app_name: "mlogr",
        debug: cli.debug,
    }) {
        eprintln!("Warning: {:#}", err);
    }

    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let options = RunOptions {
        config_file: cli.config_file,
        database: cli.file,
        print_config: cli.print_config,
        debug: cli.debug,
        post_hook: PostHook::in_dir(working_dir),
    };

    let stdin = io::stdin();
    match mlogr::run(&options, stdin.lock(), io::stdout(), io::stderr()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "mlogr run failed");
            eprint!("{}", HelpfulError::from(&err));
            ExitCode::from(1)
        }
    }
}
