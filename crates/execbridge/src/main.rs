mod config;
mod exit;
mod logging;

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::exit::{config_error, session_error, CliError, CliResult, BRIDGE_ERROR};
use crate::logging::{init_logging, LogFormat, LogLevel};

/// Remote-execution bridge client.
///
/// Connects to the configured agent, forwards standard input to the remote
/// process, and exits with that process's exit code.
#[derive(Parser, Debug)]
#[command(name = "execbridge", version, about = "Remote-execution bridge client")]
struct Cli {
    /// Config file path. Defaults to the executable path plus `.conf`.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: LogLevel,

    /// Startup arguments appended after the configured ones.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("execbridge: {err}");
            std::process::exit(err.code);
        }
    }
}

fn run(cli: Cli) -> CliResult<i32> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_path().map_err(|err| {
            CliError::new(BRIDGE_ERROR, format!("config error: cannot locate executable: {err}"))
        })?,
    };
    let config = Config::load(&config_path).map_err(config_error)?;

    let mut params = config.args;
    params.extend(cli.args);

    let (session, mut reader) =
        execbridge_session::connect(&config.address, config.port, &params)
            .map_err(session_error)?;

    // End the session on every exit path so the worker is always joined
    // before the process exits.
    let outcome = execbridge_session::run_control_loop(&mut reader);
    let ended = session.end();

    let code = outcome.map_err(session_error)?;
    ended.map_err(session_error)?;
    Ok(i32::from(code))
}
