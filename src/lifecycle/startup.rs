//! Startup orchestration.
//!
//! Fail fast: a bad config file or a missing credential aborts startup before
//! any listener is bound.

use std::path::Path;
use std::sync::Arc;

use crate::config::{load_config, ConfigError, ProxyConfig};
use crate::config::validation::validate_config;
use crate::security::{CredentialError, CredentialSource, EnvCredential};

/// Error raised before the server starts.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),
}

/// Everything the server needs, loaded once.
pub struct Prepared {
    pub config: ProxyConfig,
    pub credential: Arc<dyn CredentialSource>,
}

/// Load the configuration (defaults when no path is given), apply the bind
/// override, and read the credential from the configured variable.
pub fn prepare(config_path: Option<&Path>, bind: Option<String>) -> Result<Prepared, StartupError> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    if let Some(bind) = bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    let credential = EnvCredential::from_env(&config.upstream.token_env)?;
    tracing::debug!(variable = credential.name(), "Loaded upstream credential");

    Ok(Prepared {
        config,
        credential: Arc::new(credential),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bind_override_is_rejected() {
        let err = prepare(None, Some("not-an-address".into())).err().unwrap();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let err = prepare(Some(Path::new("/nonexistent/grid-proxy.toml")), None)
            .err()
            .unwrap();
        assert!(matches!(err, StartupError::Config(ConfigError::Io(_))));
    }
}
