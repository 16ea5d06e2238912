//! Bearer credential for the upstream row API.

use std::fmt;

/// Supplies the bearer token attached to upstream row requests.
pub trait CredentialSource: Send + Sync {
    /// The raw token, without the `Bearer ` prefix.
    fn credential(&self) -> &str;
}

/// Error raised when the credential cannot be loaded at startup.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("environment variable {name} is not set")]
    Missing { name: String },
    #[error("environment variable {name} is empty")]
    Empty { name: String },
}

/// A fixed token, typically used in tests.
#[derive(Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialSource for StaticCredential {
    fn credential(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticCredential(<redacted>)")
    }
}

/// A token read once from the process environment.
pub struct EnvCredential {
    name: String,
    token: String,
}

impl EnvCredential {
    /// Read the token from the named environment variable.
    pub fn from_env(name: &str) -> Result<Self, CredentialError> {
        let token = std::env::var(name).map_err(|_| CredentialError::Missing {
            name: name.to_string(),
        })?;
        Self::from_value(name, token)
    }

    fn from_value(name: &str, token: String) -> Result<Self, CredentialError> {
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(CredentialError::Empty {
                name: name.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            token,
        })
    }

    /// Name of the variable the token came from.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CredentialSource for EnvCredential {
    fn credential(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for EnvCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvCredential")
            .field("name", &self.name)
            .field("token", &"<redacted>")
            .finish()
    }
}
