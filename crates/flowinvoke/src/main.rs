//! flowinvoke - run Operations Orchestration flows from the command line
//!
//! Main entry point for the flowinvoke CLI.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

mod commands;

use commands::{encode, invoke};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Run an Operations Orchestration flow and wait for its result
#[derive(Parser)]
#[command(name = "flowinvoke")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server host, including the port (default: localhost:8443)
    #[arg(long, env = "FLOWINVOKE_HOST")]
    pub host: Option<String>,

    /// UUID of the flow to run
    #[arg(long, required_unless_present = "encode")]
    pub uuid: Option<String>,

    /// User name (default: admin)
    #[arg(long, env = "FLOWINVOKE_USER")]
    pub user: Option<String>,

    /// Password for the user (default: admin)
    #[arg(long, env = "FLOWINVOKE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Use the output of --encode instead of --user and --password
    #[arg(long, env = "FLOWINVOKE_CREDENTIALS", hide_env_values = true)]
    pub credentials: Option<String>,

    /// Print the encoding of a user:password string for --credentials and exit
    #[arg(long, value_name = "USER:PASSWORD")]
    pub encode: Option<String>,

    /// Flow input, repeat for more inputs (e.g. --input key1=value1 --input key2=value2)
    #[arg(long = "input", value_name = "KEY=VALUE", value_parser = invoke::parse_input)]
    pub inputs: Vec<(String, String)>,

    /// Seconds to wait for the flow to finish (default: 3600)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Seconds between status checks (default: 120)
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub heartbeat: Option<u64>,

    /// Submit the flow and print its run id without waiting for the result
    #[arg(long = "async")]
    pub async_mode: bool,

    /// Print the whole execution log as JSON, including the execution summary
    #[arg(short, long)]
    pub verbose: bool,

    /// Named context from the client config file
    #[arg(long, env = "FLOWINVOKE_CONTEXT")]
    pub context: Option<String>,

    /// Client config file (default: <config dir>/flowinvoke/client.yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level for the log file
    #[arg(long, value_enum, default_value_t = LogLevel::Info, env = "FLOWINVOKE_LOG")]
    pub log_level: LogLevel,

    /// File to append log messages to
    #[arg(long, value_name = "PATH", default_value = "flowinvoke.log")]
    pub log_file: PathBuf,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(plain) = &cli.encode {
        return encode::run(plain);
    }

    // Console gets warnings only so stdout stays clean for scripts, unless
    // --verbose; the log file gets JSON lines at the requested level
    let console_filter = if cli.verbose {
        "flowinvoke=debug,flowinvoke_client=debug,flowinvoke_config=debug,warn"
    } else {
        "warn"
    };

    let log_dir = match cli.log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let log_name = cli
        .log_file
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("flowinvoke.log"));
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(log_name.display().to_string())
        .build(&log_dir)
        .with_context(|| format!("failed to open log file {}", cli.log_file.display()))?;
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let level = cli.log_level.as_str();
    let file_filter = format!(
        "flowinvoke={level},flowinvoke_client={level},flowinvoke_config={level},warn"
    );

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(console_filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(file_filter)),
        )
        .init();

    let ctx = commands::Context::resolve(&cli)?;

    let flow_id = cli
        .uuid
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--uuid is required"))?;
    let inputs = cli.inputs.into_iter().collect();

    invoke::run(flow_id, inputs, &ctx)
}
