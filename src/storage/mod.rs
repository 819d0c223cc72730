//! Storage layer for filecipher
//!
//! Whole-file reads and atomic writes shared by the key provider,
//! the settings file and the file cipher.

pub mod file_io;

pub use file_io::{read_bytes, write_bytes_atomic, write_secret_atomic};
