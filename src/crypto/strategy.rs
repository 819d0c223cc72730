//! Cipher strategies
//!
//! Both algorithm families implement the same two-method contract so the
//! file layer can treat them uniformly. The choice is made once, in
//! [`strategy_for`].

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::traits::PublicKeyParts;
use rsa::Oaep;
use sha2::Sha256;

use super::keys::{KeyMaterial, RsaKeyPair, SymmetricKey};
use super::Algorithm;
use crate::error::{FileCipherError, FileCipherResult};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Output size of SHA-256, the OAEP hash
const OAEP_HASH_SIZE: usize = 32;

/// Whole-message encryption for one algorithm family
pub trait CipherStrategy: Send + Sync {
    /// The algorithm this strategy implements
    fn algorithm(&self) -> Algorithm;

    /// Encrypt `plaintext`, returning a self-contained ciphertext
    fn encrypt(&self, plaintext: &[u8]) -> FileCipherResult<Vec<u8>>;

    /// Decrypt a ciphertext produced by [`encrypt`](Self::encrypt)
    fn decrypt(&self, ciphertext: &[u8]) -> FileCipherResult<Vec<u8>>;
}

/// Build the strategy matching `key`
pub fn strategy_for(key: &KeyMaterial) -> FileCipherResult<Box<dyn CipherStrategy>> {
    Ok(match key {
        KeyMaterial::Symmetric(key) => Box::new(SymmetricAead::new(key)?),
        KeyMaterial::Asymmetric(pair) => Box::new(AsymmetricOaep::new(pair.clone())),
    })
}

/// AES-256-GCM
///
/// Ciphertext layout: `nonce (12) || encrypted data || tag (16)`.
pub struct SymmetricAead {
    cipher: Aes256Gcm,
}

impl SymmetricAead {
    pub fn new(key: &SymmetricKey) -> FileCipherResult<Self> {
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| FileCipherError::Encryption(format!("Failed to create cipher: {}", e)))?;
        Ok(Self { cipher })
    }
}

impl CipherStrategy for SymmetricAead {
    fn algorithm(&self) -> Algorithm {
        Algorithm::SymmetricAead
    }

    fn encrypt(&self, plaintext: &[u8]) -> FileCipherResult<Vec<u8>> {
        // Fresh nonce for every message
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| FileCipherError::Encryption(format!("Encryption failed: {}", e)))?;

        let mut output = Vec::with_capacity(NONCE_SIZE + sealed.len());
        output.extend_from_slice(&nonce_bytes);
        output.extend_from_slice(&sealed);
        Ok(output)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> FileCipherResult<Vec<u8>> {
        if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
            return Err(FileCipherError::Authentication);
        }

        let (nonce_bytes, sealed) = ciphertext.split_at(NONCE_SIZE);
        self.cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed)
            .map_err(|_| FileCipherError::Authentication)
    }
}

/// RSA-OAEP with SHA-256 for both the hash and MGF1, empty label
///
/// The ciphertext is exactly one RSA block.
pub struct AsymmetricOaep {
    keys: RsaKeyPair,
}

impl AsymmetricOaep {
    pub fn new(keys: RsaKeyPair) -> Self {
        Self { keys }
    }

    /// Largest plaintext a single block can carry
    pub fn max_plaintext_len(&self) -> usize {
        self.keys.public_key().size() - 2 * OAEP_HASH_SIZE - 2
    }
}

impl CipherStrategy for AsymmetricOaep {
    fn algorithm(&self) -> Algorithm {
        Algorithm::AsymmetricOaep
    }

    fn encrypt(&self, plaintext: &[u8]) -> FileCipherResult<Vec<u8>> {
        let max = self.max_plaintext_len();
        if plaintext.len() > max {
            return Err(FileCipherError::payload_too_large(plaintext.len(), max));
        }

        self.keys
            .public_key()
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
            .map_err(|e| FileCipherError::Encryption(format!("RSA encryption failed: {}", e)))
    }

    fn decrypt(&self, ciphertext: &[u8]) -> FileCipherResult<Vec<u8>> {
        // The cause is discarded: every failure must look the same
        self.keys
            .private_key()
            .decrypt_blinded(&mut OsRng, Oaep::new::<Sha256>(), ciphertext)
            .map_err(|_| FileCipherError::Decryption)
    }
}
