//! Command-line surface.
//!
//! Flags are defined with clap. Whether `-host`, `-port` and `-addr` were typed
//! by the user is taken from clap's value source rather than by comparing
//! against defaults, since all three have non-empty defaults.
//!
//! Single-dash long flags (`-port 0`, `-tls`) are accepted alongside the
//! double-dash forms. Boolean flags also take an attached value
//! (`-silent=true`, `-tls=false`); a detached word is never consumed as one.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};

use crate::config::{
    FlagValue, LogFormat, ServerConfig, TlsFiles, DEFAULT_ADDR, DEFAULT_CERT_FILE,
    DEFAULT_HOST, DEFAULT_KEY_FILE, DEFAULT_PORT, DEFAULT_ROOT_DIR,
};
use crate::error::ConfigError;

const USAGE_NOTES: &str = "\
[DIR] is optional; if not passed, '.' is used.

By default, the server listens on localhost:8080. Both the host and the port
are configurable with flags. Set the host to something else if you want the
server to listen on a specific network interface. Setting the port to 0 will
instruct the server to pick a random available port.";

/// Simple static file server
#[derive(Parser, Debug)]
#[command(name = "static-server", version, about, after_help = USAGE_NOTES)]
pub struct Args {
    /// Specific host to listen on
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on; if 0, a random available port will be used
    #[arg(long, default_value = DEFAULT_PORT)]
    pub port: String,

    /// Full address (host:port) to listen on; don't use this if 'port' or 'host' are set
    #[arg(long, default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// Suppress messages from output (reporting only errors)
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub silent: bool,

    /// Enable CORS by returning Access-Control-Allow-Origin header
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub cors: bool,

    /// Enable HTTPS serving with TLS
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub tls: bool,

    /// TLS certificate file to use with -tls
    #[arg(long, default_value = DEFAULT_CERT_FILE)]
    pub certfile: PathBuf,

    /// TLS key file to use with -tls
    #[arg(long, default_value = DEFAULT_KEY_FILE)]
    pub keyfile: PathBuf,

    /// Log level filter (e.g., "static_server=debug")
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Give up on draining connections after this many seconds during shutdown
    #[arg(long, value_name = "SECONDS")]
    pub drain_timeout: Option<u64>,

    /// Directory to serve
    #[arg(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,
}

/// Logging options, consumed before the server starts.
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    pub level: Option<String>,
    pub format: LogFormat,
    pub silent: bool,
}

/// Everything the binary needs after a successful parse.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub config: ServerConfig,
    pub logging: LoggingOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Includes `--help` and `--version`, which clap reports as errors
    #[error(transparent)]
    Parse(#[from] clap::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Parse the full argument list (program name first).
///
/// The shutdown token is left unset; it comes from the environment, not flags.
pub fn parse_from<I, T>(args: I) -> Result<Invocation, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = normalize_flags(args.into_iter().map(Into::into).collect());
    let matches = Args::command().try_get_matches_from(args)?;
    let parsed = Args::from_arg_matches(&matches)?;

    if parsed.dirs.len() > 1 {
        return Err(ConfigError::TooManyArguments(parsed.dirs.len()).into());
    }

    Ok(parsed.into_invocation(&matches))
}

/// Full help text, printed alongside configuration errors.
pub fn usage() -> String {
    Args::command().render_help().to_string()
}

impl Args {
    fn into_invocation(self, matches: &ArgMatches) -> Invocation {
        let flag = |id: &str, value: String| {
            if set_on_command_line(matches, id) {
                FlagValue::explicit(value)
            } else {
                FlagValue::default_value(value)
            }
        };

        let explicit_addr = set_on_command_line(matches, "addr").then_some(self.addr);
        let tls = self.tls.then(|| TlsFiles {
            cert_path: self.certfile,
            key_path: self.keyfile,
        });
        let root_dir = self
            .dirs
            .into_iter()
            .next()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT_DIR));

        let config = ServerConfig {
            host: flag("host", self.host),
            port: flag("port", self.port),
            explicit_addr,
            root_dir,
            silent: self.silent,
            cors: self.cors,
            tls,
            shutdown_token: None,
            drain_timeout: self.drain_timeout.map(Duration::from_secs),
        };

        Invocation {
            config,
            logging: LoggingOptions {
                level: self.log_level,
                format: self.log_format,
                silent: self.silent,
            },
        }
    }
}

fn set_on_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Rewrite `-name` and `-name=value` into `--name...` for every known long flag.
fn normalize_flags(args: Vec<OsString>) -> Vec<OsString> {
    let command = Args::command();
    let mut longs: Vec<String> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .map(str::to_string)
        .collect();
    longs.extend(["help".to_string(), "version".to_string()]);

    let mut args = args.into_iter();
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut after_terminator = false;

    for arg in args {
        if after_terminator {
            normalized.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("--") => {
                after_terminator = true;
                None
            }
            Some(text) => text
                .strip_prefix('-')
                .filter(|rest| !rest.starts_with('-'))
                .filter(|rest| {
                    let name = rest.split_once('=').map_or(*rest, |(name, _)| name);
                    longs.iter().any(|long| long == name)
                })
                .map(|rest| OsString::from(format!("--{}", rest))),
            None => None,
        };

        normalized.push(rewritten.unwrap_or(arg));
    }

    normalized
}
