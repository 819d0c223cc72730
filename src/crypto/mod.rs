//! Cryptographic functions for filecipher
//!
//! Provides AES-256-GCM and RSA-OAEP (SHA-256) whole-message encryption,
//! plus generation and persistence of the keys they use.

pub mod algorithm;
pub mod keys;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_support;

pub use algorithm::Algorithm;
pub use keys::{decode_key, encode_key, KeyMaterial, KeyProvider, RsaKeyPair, SymmetricKey};
pub use strategy::{strategy_for, AsymmetricOaep, CipherStrategy, SymmetricAead};
