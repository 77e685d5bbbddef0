//! Client configuration for flowinvoke.
//!
//! A kubeconfig-style YAML file holds named server contexts (host plus
//! credentials) and polling defaults, so scripts can run flows without
//! repeating hosts and secrets on the command line.

pub mod client;
pub mod discovery;
pub mod error;

pub use client::{
    AuthConfig, ClientConfig, ClientDefaults, Context, ResolvedAuth, client_config_path,
    load_client_config, load_client_config_from,
};
pub use discovery::xdg_config_dir;
pub use error::{ConfigError, Result};
