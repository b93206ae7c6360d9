//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and library configuration.

use std::fmt;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_SUBDOMAIN, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, ENV_PASSWORD, ENV_SUBDOMAIN,
    ENV_USERNAME,
};
use crate::models::CalendarMonth;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Output format for scraped records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per record
    Text,
    /// One JSON object per line
    Jsonl,
}

/// URL scheme used to reach the portal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Protocol {
    /// Plain HTTP, handy for inspecting traffic with a packet capture
    Http,
    /// HTTPS (default)
    #[default]
    Https,
}

impl Protocol {
    pub fn scheme(self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Library configuration (no CLI dependencies).
///
/// This is the configuration used to build a [`Session`](crate::Session). It can
/// be constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use schoolloop::Config;
///
/// let config = Config {
///     subdomain: "lhs-sfusd-ca".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Portal subdomain (`<subdomain>.schoolloop.com`)
    pub subdomain: String,

    /// Scheme used for every request
    pub protocol: Protocol,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subdomain: DEFAULT_SUBDOMAIN.to_string(),
            protocol: Protocol::Https,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Print classes and assignments (prompts for credentials)
/// schoolloop -c -a
///
/// # Calendar for a specific month, as JSON lines
/// schoolloop -u jdoe -e --month 2012-11 --format jsonl
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "schoolloop",
    version,
    about = "Logs in to a School Loop portal and prints classes, dropbox files, assignments and events."
)]
pub struct Opt {
    /// Username to log in with. Prompted on the terminal when absent.
    #[arg(short, long, env = ENV_USERNAME)]
    pub username: Option<String>,

    /// Password to log in with. Prompted on the terminal when absent.
    #[arg(short, long, env = ENV_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Portal subdomain (https://<subdomain>.schoolloop.com/)
    #[arg(short, long, env = ENV_SUBDOMAIN, default_value = DEFAULT_SUBDOMAIN)]
    pub subdomain: String,

    /// Use plain HTTP instead of HTTPS
    #[arg(long)]
    pub http: bool,

    /// Print classes
    #[arg(short, long)]
    pub classes: bool,

    /// Print the list of files in the dropbox
    #[arg(short, long)]
    pub dropbox: bool,

    /// Print calendar events
    #[arg(short = 'e', long = "events")]
    pub calendar: bool,

    /// Print the list of current assignments
    #[arg(short, long)]
    pub assignments: bool,

    /// Calendar month to print (YYYY-MM); defaults to the portal's current month
    #[arg(long, value_parser = parse_month)]
    pub month: Option<CalendarMonth>,

    /// Output format: text|jsonl
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        Self {
            subdomain: opt.subdomain.clone(),
            protocol: if opt.http {
                Protocol::Http
            } else {
                Protocol::Https
            },
            timeout_seconds: opt.timeout_seconds,
            user_agent: opt.user_agent.clone(),
        }
    }
}

fn parse_month(s: &str) -> Result<CalendarMonth, String> {
    s.parse()
}
