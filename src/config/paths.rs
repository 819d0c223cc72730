//! Path management for filecipher
//!
//! Resolves where settings and default key files live.
//!
//! ## Path Resolution Order
//!
//! 1. `FILECIPHER_HOME` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/filecipher` or `~/.config/filecipher`
//! 3. Windows: `%APPDATA%\filecipher`

use std::path::PathBuf;

use crate::crypto::Algorithm;
use crate::error::FileCipherError;

/// Environment variable overriding the base directory
pub const HOME_ENV_VAR: &str = "FILECIPHER_HOME";

/// Manages all paths used by filecipher
#[derive(Debug, Clone)]
pub struct CipherPaths {
    /// Base directory for all filecipher data
    base_dir: PathBuf,
}

impl CipherPaths {
    /// Create a new CipherPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, FileCipherError> {
        let base_dir = match std::env::var_os(HOME_ENV_VAR) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create CipherPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/filecipher/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the directory holding default key files
    pub fn keys_dir(&self) -> PathBuf {
        self.base_dir.join("keys")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the default key file for an algorithm
    pub fn default_key_file(&self, algorithm: Algorithm) -> PathBuf {
        match algorithm {
            Algorithm::SymmetricAead => self.keys_dir().join("aead.key"),
            Algorithm::AsymmetricOaep => self.keys_dir().join("rsa_private.pem"),
        }
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), FileCipherError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FileCipherError::Io(format!("Failed to create base directory: {}", e)))
    }
}

/// Resolve the default base directory based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, FileCipherError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var_os("HOME").ok_or_else(|| {
                FileCipherError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("filecipher"))
}

/// Resolve the default base directory based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, FileCipherError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| FileCipherError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("filecipher"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CipherPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.keys_dir(), temp_dir.path().join("keys"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var(HOME_ENV_VAR, temp_dir.path());

        let paths = CipherPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        // Clean up
        env::remove_var(HOME_ENV_VAR);
    }

    #[test]
    fn test_default_key_files() {
        let paths = CipherPaths::with_base_dir(PathBuf::from("/base"));

        assert_eq!(
            paths.default_key_file(Algorithm::SymmetricAead),
            PathBuf::from("/base/keys/aead.key")
        );
        assert_eq!(
            paths.default_key_file(Algorithm::AsymmetricOaep),
            PathBuf::from("/base/keys/rsa_private.pem")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CipherPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();
        assert!(paths.base_dir().exists());
    }
}
