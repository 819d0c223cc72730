//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod file;
pub mod key;

pub use file::{handle_decrypt_command, handle_encrypt_command};
pub use key::{handle_config_command, handle_keygen_command};

use crate::config::settings::Settings;
use crate::crypto::Algorithm;
use crate::error::FileCipherResult;

/// Algorithm named on the command line, else the configured default
fn resolve_algorithm(settings: &Settings, name: Option<&str>) -> FileCipherResult<Algorithm> {
    match name {
        Some(name) => name.parse(),
        None => Ok(settings.default_algorithm),
    }
}
