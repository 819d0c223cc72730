//! Key CLI commands

use std::path::PathBuf;

use crate::config::{paths::CipherPaths, settings::Settings};
use crate::crypto::KeyProvider;
use crate::error::{FileCipherError, FileCipherResult};

use super::resolve_algorithm;

/// Generate a key and save it
///
/// Refuses to replace an existing key file unless `force` is set, since
/// anything encrypted with the old key would become unreadable.
pub fn handle_keygen_command(
    paths: &CipherPaths,
    settings: &Settings,
    algorithm: Option<&str>,
    output: Option<PathBuf>,
    force: bool,
) -> FileCipherResult<()> {
    let algorithm = resolve_algorithm(settings, algorithm)?;
    let key_path = output.unwrap_or_else(|| settings.key_file_for(paths, algorithm));

    if key_path.exists() && !force {
        return Err(FileCipherError::Config(format!(
            "Key file already exists: {} (use --force to replace it)",
            key_path.display()
        )));
    }

    let mut provider = KeyProvider::new().with_rsa_bits(settings.rsa_key_bits)?;
    let material = provider.generate(algorithm)?;
    provider.save_key(&material, &key_path)?;

    println!("Generated {} key: {}", algorithm, key_path.display());
    Ok(())
}

/// Show resolved paths and settings
pub fn handle_config_command(paths: &CipherPaths, settings: &Settings) -> FileCipherResult<()> {
    println!("filecipher Configuration");
    println!("========================");
    println!("Base directory:  {}", paths.base_dir().display());
    println!("Settings file:   {}", paths.settings_file().display());
    println!();
    println!("Settings:");
    println!("  Default algorithm: {}", settings.default_algorithm);
    println!("  RSA key size:      {} bits", settings.rsa_key_bits);
    println!(
        "  Key file:          {}",
        settings
            .key_file_for(paths, settings.default_algorithm)
            .display()
    );

    Ok(())
}
