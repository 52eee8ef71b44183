//! JWT implementation of the TokenVerifier port.
//!
//! Verifies HS256 access tokens signed with a shared secret and resolves
//! the subject against the user directory when one is configured, so that
//! tokens for deleted accounts are rejected even while structurally valid.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::{TokenVerifier, UserDirectory};

/// Claims carried by an access token.
///
/// The issuer puts the user id in `id`; `sub` is accepted as a fallback
/// for standards-shaped tokens.
#[derive(Debug, Deserialize)]
struct AccessTokenClaims {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[allow(dead_code)]
    exp: u64,
}

/// HS256 JWT verifier.
pub struct JwtTokenVerifier {
    secret: SecretString,
    validation: Validation,
    directory: Option<Arc<dyn UserDirectory>>,
}

impl JwtTokenVerifier {
    /// Creates a verifier that trusts tokens signed with `secret`.
    pub fn new(secret: SecretString) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            secret,
            validation,
            directory: None,
        }
    }

    /// Resolve verified subjects against a user directory.
    ///
    /// With a directory configured, the returned profile comes from the
    /// directory and a vanished user fails verification with `UserNotFound`.
    pub fn with_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    fn decode_claims(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        decode::<AccessTokenClaims>(token, &key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode_claims(token)?;

        let subject = claims
            .id
            .or(claims.sub)
            .ok_or(AuthError::InvalidToken)?;
        let user_id = UserId::new(subject).map_err(|_| AuthError::InvalidToken)?;

        match &self.directory {
            Some(directory) => directory.get_user(&user_id).await,
            None => Ok(AuthenticatedUser::new(
                user_id,
                claims.email.unwrap_or_default(),
                claims.name,
            )),
        }
    }
}
