//! subpy: classify Python programs by the language features they use.

mod args;
mod config;
mod diagnostics;
mod error;
mod run;

use args::{ExecutionMode, USAGE};
use config::CliConfig;
use error::EXIT_USAGE_ERROR;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = match args::parse_args(std::env::args_os().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("subpy: {}\n{}\nTry `subpy -h' for more information.", e, USAGE);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let config = match CliConfig::from_args(&args) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            eprintln!("subpy: {}", e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        None => {
            match args.mode {
                ExecutionMode::PrintVersion => println!("{}", args::version_string()),
                _ => println!("{}", args::help_text()),
            }
            return ExitCode::SUCCESS;
        }
    };

    init_logging(&config.log_filter);

    let code = run::run(&config, &mut std::io::stdout().lock(), &mut std::io::stderr().lock());
    ExitCode::from(code)
}

/// Install the stderr log subscriber. A bad filter falls back to `warn`.
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
