//! User settings for filecipher
//!
//! Persists the default algorithm, RSA key size and an optional key file
//! override as JSON.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::CipherPaths;
use crate::crypto::keys::{DEFAULT_RSA_BITS, MIN_RSA_BITS};
use crate::crypto::Algorithm;
use crate::error::FileCipherError;
use crate::storage::file_io;

/// User settings for filecipher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Algorithm used when none is given on the command line
    #[serde(default)]
    pub default_algorithm: Algorithm,

    /// Modulus size for newly generated RSA keys
    #[serde(default = "default_rsa_key_bits")]
    pub rsa_key_bits: usize,

    /// Key file to use instead of the per-algorithm default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_rsa_key_bits() -> usize {
    DEFAULT_RSA_BITS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_algorithm: Algorithm::default(),
            rsa_key_bits: default_rsa_key_bits(),
            key_file: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &CipherPaths) -> Result<Self, FileCipherError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FileCipherError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            FileCipherError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CipherPaths) -> Result<(), FileCipherError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FileCipherError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        file_io::write_bytes_atomic(paths.settings_file(), contents.as_bytes())
    }

    /// Reject values the key provider would refuse
    pub fn validate(&self) -> Result<(), FileCipherError> {
        if self.rsa_key_bits < MIN_RSA_BITS {
            return Err(FileCipherError::Config(format!(
                "rsa_key_bits must be at least {}, got {}",
                MIN_RSA_BITS, self.rsa_key_bits
            )));
        }
        Ok(())
    }

    /// Key file for `algorithm`: the configured override, else the default location
    pub fn key_file_for(&self, paths: &CipherPaths, algorithm: Algorithm) -> PathBuf {
        self.key_file
            .clone()
            .unwrap_or_else(|| paths.default_key_file(algorithm))
    }
}
