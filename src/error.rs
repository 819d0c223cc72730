//! Custom error types for filecipher
//!
//! This module defines the error hierarchy for the library using thiserror
//! for ergonomic error definitions. Every failure is surfaced as its own
//! variant so callers can tell a tampered file from a missing one.

use thiserror::Error;

/// The main error type for filecipher operations
#[derive(Error, Debug)]
pub enum FileCipherError {
    /// File read/write errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Key bytes could not be parsed for the expected algorithm
    #[error("Key format error: {0}")]
    KeyFormat(String),

    /// A cipher could not be set up or failed to encrypt
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Plaintext exceeds what a single RSA-OAEP block can carry
    #[error("Payload too large: {len} bytes exceeds the maximum of {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },

    /// AEAD tag verification failed
    #[error("Authentication failed: ciphertext was tampered with or the key is wrong")]
    Authentication,

    /// RSA-OAEP decryption failed
    #[error("Decryption failed")]
    Decryption,

    /// Decryption target does not carry the expected suffix
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Unrecognized algorithm name
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl FileCipherError {
    /// Create a "payload too large" error
    pub fn payload_too_large(len: usize, max: usize) -> Self {
        Self::PayloadTooLarge { len, max }
    }

    /// Check if this is an AEAD authentication failure
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication)
    }

    /// Check if this is an RSA decryption failure
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption)
    }

    /// Check if this is a key format error
    pub fn is_key_format(&self) -> bool {
        matches!(self, Self::KeyFormat(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for FileCipherError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FileCipherError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for filecipher operations
pub type FileCipherResult<T> = Result<T, FileCipherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FileCipherError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_payload_too_large_error() {
        let err = FileCipherError::payload_too_large(191, 190);
        assert_eq!(
            err.to_string(),
            "Payload too large: 191 bytes exceeds the maximum of 190 bytes"
        );
    }

    #[test]
    fn test_decryption_error_is_opaque() {
        let err = FileCipherError::Decryption;
        assert_eq!(err.to_string(), "Decryption failed");
        assert!(err.is_decryption());
        assert!(!err.is_authentication());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cipher_err: FileCipherError = io_err.into();
        assert!(matches!(cipher_err, FileCipherError::Io(_)));
    }
}
