//! Service layer for filecipher
//!
//! The service layer ties the crypto strategies to the filesystem.

pub mod file_cipher;

pub use file_cipher::{decrypted_path_for, encrypted_path_for, FileCipher, ENCRYPTED_SUFFIX};
