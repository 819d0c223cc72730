//! Key material and the KeyProvider
//!
//! Generates, saves and loads the keys used by the cipher strategies.
//! Symmetric keys are persisted as base64 text; RSA private keys as
//! unencrypted PKCS#8 PEM. The public half of an RSA pair is always
//! derived from the private key and never stored separately.

use std::fmt;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::Algorithm;
use crate::error::{FileCipherError, FileCipherResult};
use crate::storage::file_io;

/// Size of an AES-256 key in bytes
pub const SYMMETRIC_KEY_SIZE: usize = 32;

/// Smallest accepted RSA modulus, in bits
pub const MIN_RSA_BITS: usize = 2048;

/// Default RSA modulus size, in bits
pub const DEFAULT_RSA_BITS: usize = 2048;

/// Length of a symmetric key file: padded base64 plus the trailing newline
const ENCODED_SYMMETRIC_KEY_LEN: usize = SYMMETRIC_KEY_SIZE.div_ceil(3) * 4 + 1;

/// A 256-bit secret key, zeroed on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    key: [u8; SYMMETRIC_KEY_SIZE],
}

impl SymmetricKey {
    /// Wrap raw key bytes
    pub fn from_bytes(key: [u8; SYMMETRIC_KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; SYMMETRIC_KEY_SIZE] {
        &self.key
    }
}

// Don't print the key in Debug output
impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// An RSA private key together with its derived public key
#[derive(Clone)]
pub struct RsaKeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl RsaKeyPair {
    /// Build a pair from a private key, deriving the public half
    pub fn from_private(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        Self { private, public }
    }

    /// The private key, used only for decryption
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    /// The public key, used only for encryption
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.public.size() * 8
    }
}

impl fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

/// Key material for one algorithm family
#[derive(Debug, Clone)]
pub enum KeyMaterial {
    Symmetric(SymmetricKey),
    Asymmetric(RsaKeyPair),
}

impl KeyMaterial {
    /// The algorithm this material belongs to
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Symmetric(_) => Algorithm::SymmetricAead,
            Self::Asymmetric(_) => Algorithm::AsymmetricOaep,
        }
    }
}

/// Generates, saves and loads key material
///
/// The random source is injected so key generation can be made
/// deterministic in tests; production code uses [`OsRng`].
pub struct KeyProvider<R = OsRng> {
    rng: R,
    rsa_bits: usize,
}

impl KeyProvider<OsRng> {
    /// Create a provider backed by the operating system's random source
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for KeyProvider<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> KeyProvider<R> {
    /// Create a provider with a caller-supplied random source
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            rsa_bits: DEFAULT_RSA_BITS,
        }
    }

    /// Set the RSA modulus size used by [`generate`](Self::generate)
    pub fn with_rsa_bits(mut self, bits: usize) -> FileCipherResult<Self> {
        if bits < MIN_RSA_BITS {
            return Err(FileCipherError::Config(format!(
                "RSA key size must be at least {} bits, got {}",
                MIN_RSA_BITS, bits
            )));
        }
        self.rsa_bits = bits;
        Ok(self)
    }

    /// RSA modulus size used for new key pairs
    pub fn rsa_bits(&self) -> usize {
        self.rsa_bits
    }

    /// Generate fresh key material for `algorithm`
    pub fn generate(&mut self, algorithm: Algorithm) -> FileCipherResult<KeyMaterial> {
        let material = match algorithm {
            Algorithm::SymmetricAead => {
                let mut key = [0u8; SYMMETRIC_KEY_SIZE];
                self.rng.fill_bytes(&mut key);
                let material = SymmetricKey::from_bytes(key);
                key.zeroize();
                KeyMaterial::Symmetric(material)
            }
            Algorithm::AsymmetricOaep => {
                // Public exponent is fixed at 65537
                let private = RsaPrivateKey::new(&mut self.rng, self.rsa_bits).map_err(|e| {
                    FileCipherError::Config(format!("RSA key generation failed: {}", e))
                })?;
                KeyMaterial::Asymmetric(RsaKeyPair::from_private(private))
            }
        };

        tracing::debug!(%algorithm, "generated key material");
        Ok(material)
    }

    /// Persist the secret part of `material` to `destination`
    ///
    /// Any existing file is replaced atomically. On Unix the file is
    /// readable by its owner only.
    pub fn save_key<P: AsRef<Path>>(
        &self,
        material: &KeyMaterial,
        destination: P,
    ) -> FileCipherResult<()> {
        let destination = destination.as_ref();
        let encoded = encode_key(material)?;
        file_io::write_secret_atomic(destination, &encoded)?;

        tracing::info!(
            algorithm = %material.algorithm(),
            path = %destination.display(),
            "saved key"
        );
        Ok(())
    }

    /// Load key material for `algorithm` from `source`
    pub fn load_key<P: AsRef<Path>>(
        &self,
        source: P,
        algorithm: Algorithm,
    ) -> FileCipherResult<KeyMaterial> {
        let source = source.as_ref();
        let bytes = Zeroizing::new(file_io::read_bytes(source)?);
        let material = decode_key(&bytes, algorithm)?;

        tracing::debug!(%algorithm, path = %source.display(), "loaded key");
        Ok(material)
    }
}

/// Encode the secret part of `material` in its on-disk format
pub fn encode_key(material: &KeyMaterial) -> FileCipherResult<Zeroizing<Vec<u8>>> {
    match material {
        KeyMaterial::Symmetric(key) => {
            // Sized up front so appending the newline never reallocates
            let mut text = Zeroizing::new(String::with_capacity(ENCODED_SYMMETRIC_KEY_LEN));
            STANDARD.encode_string(key.as_bytes(), &mut *text);
            text.push('\n');
            Ok(Zeroizing::new(text.as_bytes().to_vec()))
        }
        KeyMaterial::Asymmetric(pair) => {
            let pem = pair
                .private_key()
                .to_pkcs8_pem(LineEnding::LF)
                .map_err(|e| {
                    FileCipherError::KeyFormat(format!("Failed to encode private key: {}", e))
                })?;
            Ok(Zeroizing::new(pem.as_bytes().to_vec()))
        }
    }
}

/// Parse key bytes previously produced by [`encode_key`]
pub fn decode_key(bytes: &[u8], algorithm: Algorithm) -> FileCipherResult<KeyMaterial> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| FileCipherError::KeyFormat("Key file is not valid UTF-8".to_string()))?;

    match algorithm {
        Algorithm::SymmetricAead => {
            let decoded = Zeroizing::new(
                STANDARD.decode(text.trim()).map_err(|e| {
                    FileCipherError::KeyFormat(format!("Invalid key encoding: {}", e))
                })?,
            );

            let key: [u8; SYMMETRIC_KEY_SIZE] = decoded.as_slice().try_into().map_err(|_| {
                FileCipherError::KeyFormat(format!(
                    "Invalid key size: expected {}, got {}",
                    SYMMETRIC_KEY_SIZE,
                    decoded.len()
                ))
            })?;

            Ok(KeyMaterial::Symmetric(SymmetricKey::from_bytes(key)))
        }
        Algorithm::AsymmetricOaep => {
            let private = RsaPrivateKey::from_pkcs8_pem(text).map_err(|e| {
                FileCipherError::KeyFormat(format!("Invalid RSA private key: {}", e))
            })?;

            let pair = RsaKeyPair::from_private(private);
            if pair.bits() < MIN_RSA_BITS {
                return Err(FileCipherError::KeyFormat(format!(
                    "RSA key too small: {} bits (minimum {})",
                    pair.bits(),
                    MIN_RSA_BITS
                )));
            }

            Ok(KeyMaterial::Asymmetric(pair))
        }
    }
}
