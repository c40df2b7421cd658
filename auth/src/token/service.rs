use std::str::FromStr;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::SubsecRound;
use chrono::Utc;
use jsonwebtoken::Algorithm;

use super::errors::ConfigurationError;
use crate::clock::Clock;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

const DEFAULT_ALGORITHM: &str = "HS256";
const DEFAULT_TTL_MINUTES: i64 = 60;

/// Signing configuration for access tokens, built once at startup.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: Option<String>,
    pub algorithm: String,
    pub ttl: Duration,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            algorithm: DEFAULT_ALGORITHM.to_string(),
            ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
        }
    }

    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

// Hand-written so the secret never ends up in logs.
impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// A freshly signed access token together with what it asserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates signed, time-limited bearer tokens.
///
/// A token is valid while its signature verifies under the configured secret
/// and algorithm and the clock reads strictly before its `exp` claim.
/// Everything else is invalid, and invalid is terminal.
pub struct TokenService {
    handler: JwtHandler,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
}

impl TokenService {
    /// Build the service from settings.
    ///
    /// # Errors
    /// * `MissingSecret` - No secret, or a blank one
    /// * `UnsupportedAlgorithm` - Unknown algorithm or not an HMAC algorithm
    /// * `NonPositiveTtl` - Default time-to-live is zero or negative
    pub fn new(settings: &TokenSettings, clock: Arc<dyn Clock>) -> Result<Self, ConfigurationError> {
        let secret = settings
            .secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigurationError::MissingSecret)?;

        let algorithm = parse_hmac_algorithm(&settings.algorithm)?;

        if settings.ttl <= Duration::zero() {
            return Err(ConfigurationError::NonPositiveTtl);
        }

        Ok(Self {
            handler: JwtHandler::new(secret.as_bytes(), algorithm),
            clock,
            default_ttl: settings.ttl,
        })
    }

    /// Issue a token for `subject` with the default time-to-live.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, JwtError> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    /// Issue a token for `subject` expiring `ttl` after now.
    ///
    /// # Errors
    /// * `MissingClaim` - Subject is empty
    /// * `EncodingFailed` - Signing failed, or the expiry is out of range
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<IssuedToken, JwtError> {
        if subject.is_empty() {
            return Err(JwtError::MissingClaim("sub".to_string()));
        }

        // JWT timestamps have whole-second resolution
        let issued_at = self.clock.now().trunc_subsecs(0);
        let claims = Claims::for_subject(subject, issued_at, ttl)?;
        let access_token = self.handler.encode(&claims)?;
        let expires_at = claims
            .exp
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
            .ok_or_else(|| JwtError::EncodingFailed("expiry out of range".to_string()))?;

        Ok(IssuedToken {
            access_token,
            subject: subject.to_string(),
            issued_at,
            expires_at,
        })
    }

    /// Return the subject of a valid token, `None` for any invalid one.
    pub fn validate(&self, token: &str) -> Option<String> {
        match self.verified_subject(token) {
            Ok(subject) => Some(subject),
            Err(e) => {
                tracing::debug!(reason = %e, "Token rejected");
                None
            }
        }
    }

    fn verified_subject(&self, token: &str) -> Result<String, JwtError> {
        let claims: Claims = self.handler.decode(token)?;

        if claims.exp.is_none() {
            return Err(JwtError::MissingClaim("exp".to_string()));
        }

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| JwtError::MissingClaim("sub".to_string()))
    }
}

fn parse_hmac_algorithm(name: &str) -> Result<Algorithm, ConfigurationError> {
    match Algorithm::from_str(name) {
        Ok(algorithm @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(algorithm),
        _ => Err(ConfigurationError::UnsupportedAlgorithm(name.to_string())),
    }
}
