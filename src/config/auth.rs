//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum secret length accepted outside development.
const MIN_SECRET_LENGTH: usize = 16;

/// Authentication configuration (HS256 access tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret used to verify access token signatures
    #[serde(default = "default_secret")]
    pub access_token_secret: SecretString,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// In production and staging, a real secret of reasonable length is
    /// required; development tolerates short local secrets.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.access_token_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("ACCESS_TOKEN_SECRET"));
        }
        if *environment != Environment::Development && secret.len() < MIN_SECRET_LENGTH {
            return Err(ValidationError::WeakTokenSecret);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: default_secret(),
        }
    }
}

fn default_secret() -> SecretString {
    SecretString::new(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(secret: &str) -> AuthConfig {
        AuthConfig {
            access_token_secret: SecretString::new(secret.to_string()),
        }
    }

    #[test]
    fn test_empty_secret_fails() {
        let config = AuthConfig::default();
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_short_secret_fails_in_production() {
        let config = config_with("short");
        assert!(config.validate(&Environment::Production).is_err());
    }

    #[test]
    fn test_short_secret_allowed_in_development() {
        let config = config_with("short");
        assert!(config.validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_long_secret_passes_everywhere() {
        let config = config_with("a-long-enough-signing-secret");
        assert!(config.validate(&Environment::Production).is_ok());
        assert!(config.validate(&Environment::Development).is_ok());
    }
}
