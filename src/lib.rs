//! filecipher - whole-file authenticated encryption
//!
//! Encrypts one file at a time, fully in memory, with either AES-256-GCM
//! or RSA-OAEP (SHA-256), writing `<file>.encrypted` next to the source.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `crypto`: Algorithms, key material and cipher strategies
//! - `storage`: Whole-file reads and atomic writes
//! - `services`: The `FileCipher` orchestration layer
//! - `cli`: Command handlers for the `filecipher` binary
//!
//! # Example
//!
//! ```rust,no_run
//! use filecipher::{Algorithm, FileCipher};
//!
//! let cipher = FileCipher::new(Algorithm::SymmetricAead)?;
//! let encrypted = cipher.encrypt_file("example.txt")?;
//! let decrypted = cipher.decrypt_file(&encrypted)?;
//! assert_eq!(decrypted, std::path::Path::new("example.txt"));
//! # Ok::<(), filecipher::FileCipherError>(())
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod services;
pub mod storage;

pub use crypto::{Algorithm, CipherStrategy, KeyMaterial, KeyProvider};
pub use error::{FileCipherError, FileCipherResult};
pub use services::FileCipher;
