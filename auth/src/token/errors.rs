use thiserror::Error;

/// Startup-time configuration problems. These are fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Token signing secret is not configured")]
    MissingSecret,

    #[error("Unsupported token signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token time-to-live must be positive")]
    NonPositiveTtl,

    #[error("Token time-to-live out of range: {0} minutes")]
    TtlOutOfRange(i64),
}
