//! Whole-file encryption and decryption
//!
//! [`FileCipher`] reads a file fully into memory, runs it through the
//! strategy chosen at construction, and writes the result next to the
//! source. Encrypted files carry the fixed `.encrypted` suffix; decryption
//! strips it and refuses paths that don't have it.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use rand::{CryptoRng, RngCore};

use crate::crypto::{strategy_for, Algorithm, CipherStrategy, KeyMaterial, KeyProvider};
use crate::error::{FileCipherError, FileCipherResult};
use crate::storage::file_io;

/// Suffix appended to encrypted files
pub const ENCRYPTED_SUFFIX: &str = ".encrypted";

/// [`ENCRYPTED_SUFFIX`] as a path extension
const ENCRYPTED_EXTENSION: &str = "encrypted";

/// Encrypts and decrypts files with a fixed algorithm and key
pub struct FileCipher {
    key: KeyMaterial,
    strategy: Box<dyn CipherStrategy>,
}

impl FileCipher {
    /// Create a cipher with freshly generated key material
    pub fn new(algorithm: Algorithm) -> FileCipherResult<Self> {
        Self::with_provider(algorithm, &mut KeyProvider::new())
    }

    /// Create a cipher with key material generated by `provider`
    pub fn with_provider<R: RngCore + CryptoRng>(
        algorithm: Algorithm,
        provider: &mut KeyProvider<R>,
    ) -> FileCipherResult<Self> {
        let key = provider.generate(algorithm)?;
        Self::with_key(key)
    }

    /// Create a cipher from existing key material
    pub fn with_key(key: KeyMaterial) -> FileCipherResult<Self> {
        let strategy = strategy_for(&key)?;
        Ok(Self { key, strategy })
    }

    /// Create a cipher from an algorithm name
    ///
    /// The name is validated before any key is generated. Supplied key
    /// material must belong to the named algorithm.
    pub fn from_name(name: &str, key: Option<KeyMaterial>) -> FileCipherResult<Self> {
        let algorithm: Algorithm = name.parse()?;

        match key {
            Some(key) if key.algorithm() != algorithm => Err(FileCipherError::KeyFormat(format!(
                "Key is for {}, not {}",
                key.algorithm(),
                algorithm
            ))),
            Some(key) => Self::with_key(key),
            None => Self::new(algorithm),
        }
    }

    /// The algorithm fixed at construction
    pub fn algorithm(&self) -> Algorithm {
        self.strategy.algorithm()
    }

    /// The key material, e.g. for persisting with [`KeyProvider::save_key`]
    pub fn key(&self) -> &KeyMaterial {
        &self.key
    }

    /// Encrypt an in-memory buffer
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> FileCipherResult<Vec<u8>> {
        self.strategy.encrypt(plaintext)
    }

    /// Decrypt an in-memory buffer
    pub fn decrypt_bytes(&self, ciphertext: &[u8]) -> FileCipherResult<Vec<u8>> {
        self.strategy.decrypt(ciphertext)
    }

    /// Encrypt `path` into `<path>.encrypted`, returning the output path
    pub fn encrypt_file<P: AsRef<Path>>(&self, path: P) -> FileCipherResult<PathBuf> {
        let path = path.as_ref();
        let output = encrypted_path_for(path);

        let plaintext = file_io::read_bytes(path)?;
        let ciphertext = self.encrypt_bytes(&plaintext)?;
        file_io::write_bytes_atomic(&output, &ciphertext)?;

        tracing::info!(
            algorithm = %self.algorithm(),
            input = %path.display(),
            output = %output.display(),
            bytes = plaintext.len(),
            "encrypted file"
        );
        Ok(output)
    }

    /// Decrypt `<path>.encrypted` into `<path>`, returning the output path
    ///
    /// Fails with [`FileCipherError::InvalidPath`] before touching the
    /// filesystem if `encrypted_path` lacks the suffix.
    pub fn decrypt_file<P: AsRef<Path>>(&self, encrypted_path: P) -> FileCipherResult<PathBuf> {
        let encrypted_path = encrypted_path.as_ref();
        let output = decrypted_path_for(encrypted_path)?;

        let ciphertext = file_io::read_bytes(encrypted_path)?;
        let plaintext = self.decrypt_bytes(&ciphertext).map_err(|e| {
            tracing::warn!(
                algorithm = %self.algorithm(),
                input = %encrypted_path.display(),
                error = %e,
                "decryption rejected"
            );
            e
        })?;
        file_io::write_bytes_atomic(&output, &plaintext)?;

        tracing::info!(
            algorithm = %self.algorithm(),
            input = %encrypted_path.display(),
            output = %output.display(),
            bytes = plaintext.len(),
            "decrypted file"
        );
        Ok(output)
    }
}

impl fmt::Debug for FileCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCipher")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

/// Output path for encrypting `path`
pub fn encrypted_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(ENCRYPTED_SUFFIX);
    PathBuf::from(name)
}

/// Output path for decrypting `encrypted_path`
///
/// The file name must end with the suffix and have something before it.
/// Names are compared as raw OS strings, so they need not be valid UTF-8.
pub fn decrypted_path_for(encrypted_path: &Path) -> FileCipherResult<PathBuf> {
    // A bare ".encrypted" has no extension, only a stem
    let stem = encrypted_path
        .extension()
        .filter(|ext| *ext == ENCRYPTED_EXTENSION)
        .and_then(|_| encrypted_path.file_stem())
        .ok_or_else(|| {
            FileCipherError::InvalidPath(format!(
                "{} does not end with '{}'",
                encrypted_path.display(),
                ENCRYPTED_SUFFIX
            ))
        })?;

    Ok(encrypted_path.with_file_name(stem))
}
