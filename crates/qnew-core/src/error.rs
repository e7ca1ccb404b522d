//! Error types for q-NEW operations

use thiserror::Error;

/// Result type alias for q-NEW operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating keys, signing or auditing.
///
/// A signature that merely fails to verify is not an error: `verify` reports
/// it as `Ok(false)`.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong number of fields passed to `KeyRecord::construct`
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid generation configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The nonce K is not smaller than the group order q
    #[error("K is greater than or equal to q")]
    NonceTooLarge,

    /// Negative message representative
    #[error("Illegal value of M (<0)")]
    NegativeMessage,

    /// Message representative of 161 bits or more
    #[error("Illegal value of M (too large)")]
    MessageTooLarge,

    /// Signing requested on a public-only key record
    #[error("Key record has no private component")]
    MissingPrivateKey,

    /// No generator g > 1 found within the configured number of draws
    #[error("No subgroup generator found after {0} attempts")]
    GeneratorExhausted(u32),

    /// Every drawn nonce produced a zero signature component
    #[error("No usable nonce found after {0} attempts")]
    NonceExhausted(u32),

    /// The modulus could not be re-derived from its seed
    #[error("Parameter audit failed: {0}")]
    AuditFailed(String),

    /// Encoding or decoding of key material failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::Serialization(e.to_string())
    }
}
