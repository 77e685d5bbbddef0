//! Client configuration for connecting to orchestration servers.
//!
//! Implements a kubeconfig-style configuration with named contexts:
//!
//! ```yaml
//! api-version: v1
//! kind: ClientConfig
//!
//! current-context: prod
//!
//! contexts:
//!   - name: prod
//!     host: oo.example.com:8443
//!     auth:
//!       type: basic
//!       user: svc-deploy
//!       password-env: OO_PASSWORD
//!   - name: lab
//!     host: 10.0.0.5:8443
//!     auth:
//!       type: encoded
//!       credentials-file: ~/.config/flowinvoke/lab.cred
//!
//! defaults:
//!   timeout: 3600
//!   heartbeat: 120
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Client Config
// ─────────────────────────────────────────────────────────────────────────────

/// API version for the client config file format.
pub const API_VERSION: &str = "v1";

/// Kind identifier for client config files.
pub const KIND: &str = "ClientConfig";

/// Default config filename.
const CLIENT_CONFIG_FILE: &str = "client.yaml";

/// Root client configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// API version (always "v1" currently).
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Config kind (always "ClientConfig").
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Name of the current/default context.
    #[serde(default)]
    pub current_context: Option<String>,

    /// Named connection contexts.
    #[serde(default)]
    pub contexts: Vec<Context>,

    /// Default settings applied to all contexts.
    #[serde(default)]
    pub defaults: ClientDefaults,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

impl ClientConfig {
    /// Create an empty client config.
    pub fn new() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            ..Default::default()
        }
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Get the current context, if set and valid.
    pub fn current(&self) -> Option<&Context> {
        self.current_context
            .as_ref()
            .and_then(|name| self.get_context(name))
    }

    /// Get a context by name.
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Pick the context to use.
    ///
    /// An explicitly named context must exist. Without a name the current
    /// context is used; a `current-context` naming a missing context is an
    /// error, no `current-context` at all means no context.
    pub fn resolve_context(&self, name: Option<&str>) -> Result<Option<&Context>> {
        match name.or(self.current_context.as_deref()) {
            Some(name) => self
                .get_context(name)
                .map(Some)
                .ok_or_else(|| ConfigError::ContextNotFound(name.to_string())),
            None => Ok(None),
        }
    }

    /// Effective timeout in seconds for a context, applying defaults.
    pub fn timeout_for(&self, context: Option<&Context>) -> u64 {
        context
            .and_then(|c| c.timeout)
            .unwrap_or(self.defaults.timeout)
    }

    /// Effective heartbeat in seconds for a context, applying defaults.
    pub fn heartbeat_for(&self, context: Option<&Context>) -> u64 {
        context
            .and_then(|c| c.heartbeat)
            .unwrap_or(self.defaults.heartbeat)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// A named connection context (host + auth bundle).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Context {
    /// Unique name for this context.
    pub name: String,

    /// Server host, `host:port` or a full URL.
    pub host: String,

    /// Authentication configuration.
    #[serde(default)]
    pub auth: Option<AuthConfig>,

    /// Run timeout override (seconds).
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Poll interval override (seconds).
    #[serde(default)]
    pub heartbeat: Option<u64>,
}

impl Context {
    /// Create a new context with just a name and host.
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            auth: None,
            timeout: None,
            heartbeat: None,
        }
    }

    /// Set the auth configuration.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the run timeout.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the poll interval.
    pub fn with_heartbeat(mut self, heartbeat: u64) -> Self {
        self.heartbeat = Some(heartbeat);
        self
    }

    /// Resolve this context's credentials.
    pub fn credentials(&self) -> Result<Option<ResolvedAuth>> {
        match &self.auth {
            Some(auth) => auth.resolve(&self.name),
            None => Ok(None),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authentication
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication configuration for a context.
///
/// Secrets may be given inline, in a file, or in an environment variable;
/// a file wins over an env var, which wins over an inline value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AuthConfig {
    /// No authentication.
    None,

    /// User name and password.
    #[serde(rename_all = "kebab-case")]
    Basic {
        user: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password_file: Option<PathBuf>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password_env: Option<String>,
    },

    /// Pre-encoded `user:password` string.
    #[serde(rename_all = "kebab-case")]
    Encoded {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        credentials: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        credentials_file: Option<PathBuf>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        credentials_env: Option<String>,
    },
}

/// Credentials resolved from an [`AuthConfig`].
#[derive(Clone, PartialEq, Eq)]
pub enum ResolvedAuth {
    Basic { user: String, password: String },
    Encoded(String),
}

impl std::fmt::Debug for ResolvedAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedAuth::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
            ResolvedAuth::Encoded(_) => f.write_str("Encoded(<redacted>)"),
        }
    }
}

impl AuthConfig {
    /// Create basic auth reading the password from an environment variable.
    pub fn basic_env(user: impl Into<String>, var: impl Into<String>) -> Self {
        Self::Basic {
            user: user.into(),
            password: None,
            password_file: None,
            password_env: Some(var.into()),
        }
    }

    /// Create encoded auth reading the credentials from a file.
    pub fn encoded_file(path: impl Into<PathBuf>) -> Self {
        Self::Encoded {
            credentials: None,
            credentials_file: Some(path.into()),
            credentials_env: None,
        }
    }

    /// Resolve the actual credential value.
    ///
    /// `context` names the owning context in error messages.
    pub fn resolve(&self, context: &str) -> Result<Option<ResolvedAuth>> {
        match self {
            AuthConfig::None => Ok(None),

            AuthConfig::Basic {
                user,
                password,
                password_file,
                password_env,
            } => {
                let password = secret(password, password_file, password_env)?.ok_or_else(|| {
                    ConfigError::CredentialNotFound {
                        context: context.to_string(),
                        what: "password".to_string(),
                    }
                })?;
                Ok(Some(ResolvedAuth::Basic {
                    user: user.clone(),
                    password,
                }))
            }

            AuthConfig::Encoded {
                credentials,
                credentials_file,
                credentials_env,
            } => {
                let token = secret(credentials, credentials_file, credentials_env)?.ok_or_else(
                    || ConfigError::CredentialNotFound {
                        context: context.to_string(),
                        what: "credentials".to_string(),
                    },
                )?;
                Ok(Some(ResolvedAuth::Encoded(token)))
            }
        }
    }
}

/// Look up a secret: file first, then env var, then inline value.
fn secret(
    inline: &Option<String>,
    file: &Option<PathBuf>,
    env: &Option<String>,
) -> Result<Option<String>> {
    if let Some(path) = file {
        let expanded = expand_path(path);
        if expanded.exists() {
            let value = std::fs::read_to_string(&expanded)
                .map_err(|e| ConfigError::ReadFile {
                    path: expanded.display().to_string(),
                    source: e,
                })?
                .trim()
                .to_string();
            return Ok(Some(value));
        }
    }
    if let Some(var) = env
        && let Ok(value) = std::env::var(var)
    {
        return Ok(Some(value));
    }
    Ok(inline.clone())
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default settings applied to all contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientDefaults {
    /// Seconds to wait for a run to finish.
    pub timeout: u64,

    /// Seconds between status checks.
    pub heartbeat: u64,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self {
            timeout: 3600,
            heartbeat: 120,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Get the path to the client config file.
pub fn client_config_path() -> Option<PathBuf> {
    crate::xdg_config_dir().map(|d| d.join(CLIENT_CONFIG_FILE))
}

/// Load the client configuration.
///
/// Returns a default config if the file doesn't exist.
pub fn load_client_config() -> Result<ClientConfig> {
    load_client_config_from(client_config_path().as_deref())
}

/// Load client config from a specific path.
pub fn load_client_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let Some(path) = path else {
        return Ok(ClientConfig::new());
    };

    if !path.exists() {
        return Ok(ClientConfig::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;

    ClientConfig::from_yaml(&contents)
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Expand ~ to home directory in paths.
fn expand_path(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str()
        && let Some(rest) = s.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
api-version: v1
kind: ClientConfig
current-context: prod

contexts:
  - name: prod
    host: oo.example.com:8443
    auth:
      type: basic
      user: svc-deploy
      password: inline-secret
    timeout: 7200

  - name: lab
    host: https://10.0.0.5:8443
    auth:
      type: encoded
      credentials: c3ZjOnB3
    heartbeat: 15

  - name: open
    host: localhost:8443

defaults:
  timeout: 1800
  heartbeat: 60
"#;

    #[test]
    fn test_empty_config() {
        let config = ClientConfig::new();
        assert_eq!(config.api_version, API_VERSION);
        assert_eq!(config.kind, KIND);
        assert!(config.current_context.is_none());
        assert!(config.contexts.is_empty());
        assert_eq!(config.defaults.timeout, 3600);
        assert_eq!(config.defaults.heartbeat, 120);
    }

    #[test]
    fn test_parse_full_yaml() {
        let config = ClientConfig::from_yaml(FULL).unwrap();

        assert_eq!(config.current_context.as_deref(), Some("prod"));
        assert_eq!(config.contexts.len(), 3);

        let prod = config.get_context("prod").unwrap();
        assert_eq!(prod.host, "oo.example.com:8443");
        assert_eq!(prod.timeout, Some(7200));
        match &prod.auth {
            Some(AuthConfig::Basic { user, .. }) => assert_eq!(user, "svc-deploy"),
            _ => panic!("Expected Basic auth"),
        }

        let lab = config.get_context("lab").unwrap();
        assert_eq!(lab.heartbeat, Some(15));
        assert!(matches!(lab.auth, Some(AuthConfig::Encoded { .. })));

        assert!(config.get_context("open").unwrap().auth.is_none());
        assert_eq!(config.defaults.timeout, 1800);
        assert_eq!(config.defaults.heartbeat, 60);
    }

    #[test]
    fn test_resolve_context() {
        let config = ClientConfig::from_yaml(FULL).unwrap();

        let current = config.resolve_context(None).unwrap().unwrap();
        assert_eq!(current.name, "prod");

        let lab = config.resolve_context(Some("lab")).unwrap().unwrap();
        assert_eq!(lab.name, "lab");

        let err = config.resolve_context(Some("missing")).unwrap_err();
        assert!(matches!(err, ConfigError::ContextNotFound(name) if name == "missing"));
    }

    #[test]
    fn test_resolve_context_without_current() {
        let config = ClientConfig::new();
        assert!(config.resolve_context(None).unwrap().is_none());

        let mut dangling = ClientConfig::new();
        dangling.current_context = Some("gone".to_string());
        assert!(dangling.resolve_context(None).is_err());
    }

    #[test]
    fn test_polling_overrides_and_defaults() {
        let config = ClientConfig::from_yaml(FULL).unwrap();
        let prod = config.get_context("prod");
        let lab = config.get_context("lab");

        assert_eq!(config.timeout_for(prod), 7200);
        assert_eq!(config.heartbeat_for(prod), 60);
        assert_eq!(config.timeout_for(lab), 1800);
        assert_eq!(config.heartbeat_for(lab), 15);
        assert_eq!(config.timeout_for(None), 1800);
    }

    #[test]
    fn test_inline_credentials_resolve() {
        let config = ClientConfig::from_yaml(FULL).unwrap();

        let prod = config.get_context("prod").unwrap().credentials().unwrap();
        assert_eq!(
            prod,
            Some(ResolvedAuth::Basic {
                user: "svc-deploy".to_string(),
                password: "inline-secret".to_string(),
            })
        );

        let lab = config.get_context("lab").unwrap().credentials().unwrap();
        assert_eq!(lab, Some(ResolvedAuth::Encoded("c3ZjOnB3".to_string())));

        let open = config.get_context("open").unwrap().credentials().unwrap();
        assert!(open.is_none());
    }

    #[test]
    fn test_basic_env_resolve() {
        // SAFETY: Test is single-threaded, env var is test-specific
        unsafe {
            std::env::set_var("TEST_FLOWINVOKE_PASSWORD", "from-env");
        }
        let auth = AuthConfig::basic_env("admin", "TEST_FLOWINVOKE_PASSWORD");
        let resolved = auth.resolve("ctx").unwrap();
        assert_eq!(
            resolved,
            Some(ResolvedAuth::Basic {
                user: "admin".to_string(),
                password: "from-env".to_string(),
            })
        );
        // SAFETY: Cleanup test env var
        unsafe {
            std::env::remove_var("TEST_FLOWINVOKE_PASSWORD");
        }
    }

    #[test]
    fn test_missing_password_is_error() {
        let auth = AuthConfig::basic_env("admin", "TEST_FLOWINVOKE_UNSET_VAR");
        let err = auth.resolve("prod").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CredentialNotFound { ref context, ref what }
                if context == "prod" && what == "password"
        ));
    }

    #[test]
    fn test_encoded_file_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab.cred");
        std::fs::write(&path, "c3ZjOnB3\n").unwrap();

        let auth = AuthConfig::encoded_file(path.clone());
        let resolved = auth.resolve("lab").unwrap();
        assert_eq!(resolved, Some(ResolvedAuth::Encoded("c3ZjOnB3".to_string())));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let auth = ResolvedAuth::Basic {
            user: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{:?}", auth).contains("hunter2"));
    }

    #[test]
    fn test_roundtrip_yaml() {
        let mut config = ClientConfig::new();
        config.contexts.push(
            Context::new("prod", "oo.example.com:8443")
                .with_auth(AuthConfig::basic_env("svc", "OO_PASSWORD"))
                .with_timeout(600)
                .with_heartbeat(30),
        );
        config.current_context = Some("prod".to_string());

        let yaml = config.to_yaml().unwrap();
        let reparsed = ClientConfig::from_yaml(&yaml).unwrap();

        assert_eq!(reparsed.current_context, config.current_context);
        let prod = reparsed.get_context("prod").unwrap();
        assert_eq!(prod.timeout, Some(600));
        assert_eq!(prod.heartbeat, Some(30));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_client_config_from(Some(&dir.path().join("client.yaml"))).unwrap();
        assert!(config.contexts.is_empty());

        let config = load_client_config_from(None).unwrap();
        assert!(config.contexts.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.yaml");
        std::fs::write(&path, FULL).unwrap();

        let config = load_client_config_from(Some(&path)).unwrap();
        assert_eq!(config.contexts.len(), 3);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.yaml");
        std::fs::write(&path, "contexts: [unterminated").unwrap();

        let err = load_client_config_from(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseYaml(_)));
    }

    #[test]
    fn test_expand_path() {
        let path = PathBuf::from("~/test/file.cred");
        let expanded = expand_path(&path);
        if dirs::home_dir().is_some() {
            assert!(!expanded.to_str().unwrap().starts_with("~/"));
        }

        let path2 = PathBuf::from("/absolute/path");
        assert_eq!(expand_path(&path2), path2);
    }
}
