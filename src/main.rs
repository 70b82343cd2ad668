//! static-server: serve a directory over HTTP(S).
//!
//! This is the process entry point. It parses the command line, initializes
//! tracing, resolves the bind address, runs the server, and maps the outcome
//! to an exit code: 0 after a graceful shutdown, 1 for any failure.

use std::process::ExitCode;

use tracing::Level;
use tracing_subscriber::filter::{filter_fn, LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use static_server::cli::{self, CliError, LoggingOptions};
use static_server::config::{
    shutdown_token_from_env, LogFormat, DEFAULT_LOG_FILTER, SILENT_LOG_FILTER,
};
use static_server::{address, app};

#[tokio::main]
async fn main() -> ExitCode {
    let mut invocation = match cli::parse_from(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(CliError::Parse(err)) => {
            // --help and --version land here too and go to stdout
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
        Err(CliError::Config(err)) => return usage_error(&err),
    };

    init_tracing(&invocation.logging);

    let addr = match address::resolve(&invocation.config) {
        Ok(addr) => addr,
        Err(err) => return usage_error(&err),
    };

    invocation.config.shutdown_token = shutdown_token_from_env();

    match app::run(invocation.config, &addr).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn usage_error(err: &dyn std::error::Error) -> ExitCode {
    eprintln!("Error: {}\n", err);
    eprintln!("{}", cli::usage());
    ExitCode::FAILURE
}

/// Initialize tracing with priority: CLI > env > default
fn init_tracing(options: &LoggingOptions) {
    let default_filter = if options.silent {
        SILENT_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };

    let log_filter = options
        .level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| default_filter.to_string());

    // Errors go to stderr, everything else to stdout
    let (out_layer, err_layer) = match options.format {
        LogFormat::Text => (
            fmt::layer().with_writer(std::io::stdout).boxed(),
            fmt::layer().with_writer(std::io::stderr).boxed(),
        ),
        LogFormat::Json => (
            fmt::layer().json().with_writer(std::io::stdout).boxed(),
            fmt::layer().json().with_writer(std::io::stderr).boxed(),
        ),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(&log_filter))
        .with(out_layer.with_filter(filter_fn(|meta| *meta.level() != Level::ERROR)))
        .with(err_layer.with_filter(LevelFilter::ERROR))
        .init();
}
