//! Shared fixtures for crypto tests

use std::sync::OnceLock;

use super::keys::{KeyMaterial, KeyProvider, RsaKeyPair};
use super::Algorithm;

/// A 2048-bit key pair generated once per test binary
pub fn shared_rsa_key() -> RsaKeyPair {
    static KEY: OnceLock<RsaKeyPair> = OnceLock::new();
    KEY.get_or_init(|| match KeyProvider::new().generate(Algorithm::AsymmetricOaep) {
        Ok(KeyMaterial::Asymmetric(pair)) => pair,
        other => panic!("RSA key generation failed: {:?}", other),
    })
    .clone()
}
