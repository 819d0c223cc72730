//! Algorithm selection
//!
//! The set of supported algorithm families is closed; a name is resolved to
//! an [`Algorithm`] once and never compared as a string again.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FileCipherError;

/// Encryption algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Algorithm {
    /// AES-256-GCM with a random 96-bit nonce per message
    #[default]
    #[serde(rename = "aead")]
    SymmetricAead,
    /// RSA with OAEP padding (SHA-256, MGF1-SHA-256, empty label)
    #[serde(rename = "rsa-oaep")]
    AsymmetricOaep,
}

impl Algorithm {
    /// Canonical name, as accepted by [`FromStr`] and written to settings
    pub fn name(&self) -> &'static str {
        match self {
            Self::SymmetricAead => "aead",
            Self::AsymmetricOaep => "rsa-oaep",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = FileCipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aead" | "aes-gcm" | "aes-256-gcm" | "symmetric" => Ok(Self::SymmetricAead),
            "rsa" | "rsa-oaep" | "oaep" | "asymmetric" => Ok(Self::AsymmetricOaep),
            _ => Err(FileCipherError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        for name in ["aead", "AES-GCM", "aes-256-gcm", " symmetric "] {
            assert_eq!(name.parse::<Algorithm>().unwrap(), Algorithm::SymmetricAead);
        }
        for name in ["rsa", "RSA-OAEP", "oaep", "asymmetric"] {
            assert_eq!(name.parse::<Algorithm>().unwrap(), Algorithm::AsymmetricOaep);
        }
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "blowfish".parse::<Algorithm>().unwrap_err();
        assert!(matches!(
            err,
            FileCipherError::UnsupportedAlgorithm(ref name) if name == "blowfish"
        ));
        assert_eq!(err.to_string(), "Unsupported algorithm: blowfish");
    }

    #[test]
    fn test_display_round_trips() {
        for algorithm in [Algorithm::SymmetricAead, Algorithm::AsymmetricOaep] {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Algorithm::AsymmetricOaep).unwrap();
        assert_eq!(json, "\"rsa-oaep\"");
        let parsed: Algorithm = serde_json::from_str("\"aead\"").unwrap();
        assert_eq!(parsed, Algorithm::SymmetricAead);
    }
}
