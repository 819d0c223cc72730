//! File CLI commands
//!
//! Implements the encrypt and decrypt commands.

use std::path::{Path, PathBuf};

use crate::config::{paths::CipherPaths, settings::Settings};
use crate::crypto::{Algorithm, KeyMaterial, KeyProvider};
use crate::error::{FileCipherError, FileCipherResult};
use crate::services::FileCipher;

use super::resolve_algorithm;

/// Encrypt `file`, generating and saving a key first if none exists yet
pub fn handle_encrypt_command(
    paths: &CipherPaths,
    settings: &Settings,
    file: &Path,
    algorithm: Option<&str>,
    key: Option<PathBuf>,
) -> FileCipherResult<()> {
    let algorithm = resolve_algorithm(settings, algorithm)?;
    let key_path = key.unwrap_or_else(|| settings.key_file_for(paths, algorithm));

    let mut provider = KeyProvider::new().with_rsa_bits(settings.rsa_key_bits)?;
    let material = if key_path.exists() {
        provider.load_key(&key_path, algorithm)?
    } else {
        let material = provider.generate(algorithm)?;
        provider.save_key(&material, &key_path)?;
        eprintln!("Generated new {} key: {}", algorithm, key_path.display());
        material
    };

    let cipher = FileCipher::with_key(material)?;
    let encrypted = cipher.encrypt_file(file)?;
    println!("File encrypted: {}", encrypted.display());

    Ok(())
}

/// Decrypt `file` with an existing key
pub fn handle_decrypt_command(
    paths: &CipherPaths,
    settings: &Settings,
    file: &Path,
    algorithm: Option<&str>,
    key: Option<PathBuf>,
) -> FileCipherResult<()> {
    let algorithm = resolve_algorithm(settings, algorithm)?;
    let key_path = key.unwrap_or_else(|| settings.key_file_for(paths, algorithm));

    let material = load_existing_key(&key_path, algorithm)?;
    let cipher = FileCipher::with_key(material)?;
    let decrypted = cipher.decrypt_file(file)?;
    println!("File decrypted: {}", decrypted.display());

    Ok(())
}

fn load_existing_key(key_path: &Path, algorithm: Algorithm) -> FileCipherResult<KeyMaterial> {
    if !key_path.exists() {
        return Err(FileCipherError::Config(format!(
            "No {} key found at {}. Run 'filecipher keygen' or pass --key.",
            algorithm,
            key_path.display()
        )));
    }

    KeyProvider::new().load_key(key_path, algorithm)
}
