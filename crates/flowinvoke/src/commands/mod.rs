//! CLI command handlers.

pub mod encode;
pub mod invoke;

use anyhow::{Context as _, Result};
use flowinvoke_client::{Credentials, PollPolicy};
use flowinvoke_config::{ResolvedAuth, load_client_config, load_client_config_from};

use crate::Cli;

/// Host used when neither the command line nor a context names one.
const DEFAULT_HOST: &str = "localhost:8443";

/// User and password used when no credentials are configured.
const DEFAULT_USER: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin";

/// Settings for one invocation, after applying flags, config and defaults.
#[derive(Debug, Clone)]
pub struct Context {
    /// Server host.
    pub host: String,
    /// Credentials sent with every request.
    pub credentials: Credentials,
    /// Timeout and heartbeat.
    pub policy: PollPolicy,
    /// Submit only, do not wait.
    pub async_mode: bool,
    /// Print the whole execution log.
    pub verbose: bool,
}

impl Context {
    /// Resolve settings: flag or env var, then the selected config context,
    /// then config defaults, then built-in defaults.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => load_client_config_from(Some(path)),
            None => load_client_config(),
        }
        .context("failed to load client config")?;

        let context = config.resolve_context(cli.context.as_deref())?;
        if let Some(context) = context {
            tracing::debug!(context = %context.name, "using config context");
        }

        let host = cli
            .host
            .clone()
            .or_else(|| context.map(|c| c.host.clone()))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let credentials = if let Some(encoded) = &cli.credentials {
            Credentials::encoded(encoded.clone())
        } else if cli.user.is_some() || cli.password.is_some() {
            Credentials::basic(
                cli.user.as_deref().unwrap_or(DEFAULT_USER),
                cli.password.as_deref().unwrap_or(DEFAULT_PASSWORD),
            )
        } else {
            match context.map(|c| c.credentials()).transpose()?.flatten() {
                Some(ResolvedAuth::Basic { user, password }) => Credentials::basic(user, password),
                Some(ResolvedAuth::Encoded(token)) => Credentials::encoded(token),
                None => Credentials::basic(DEFAULT_USER, DEFAULT_PASSWORD),
            }
        };

        let timeout = cli.timeout.unwrap_or_else(|| config.timeout_for(context));
        let heartbeat = cli.heartbeat.unwrap_or_else(|| config.heartbeat_for(context));
        let policy = PollPolicy::from_secs(timeout, heartbeat)?;

        Ok(Self {
            host,
            credentials,
            policy,
            async_mode: cli.async_mode,
            verbose: cli.verbose,
        })
    }
}
