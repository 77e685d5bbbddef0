//! HTTP Basic credentials.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Credentials sent with every request.
#[derive(Clone)]
pub enum Credentials {
    /// Plain user name and password, encoded on use.
    Basic { user: String, password: String },
    /// Already base64-encoded `user:password`.
    Encoded(String),
}

impl Credentials {
    pub fn basic(user: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Basic {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn encoded(token: impl Into<String>) -> Self {
        Credentials::Encoded(token.into())
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        match self {
            Credentials::Basic { user, password } => {
                format!("Basic {}", encode(&format!("{}:{}", user, password)))
            }
            Credentials::Encoded(token) => format!("Basic {}", token.trim()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Encoded(_) => f.write_str("Encoded(<redacted>)"),
        }
    }
}

/// Base64-encode a `user:password` string for use as pre-encoded credentials.
pub fn encode(plain: &str) -> String {
    STANDARD.encode(plain.as_bytes())
}
