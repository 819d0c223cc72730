use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use filecipher::cli::{
    handle_config_command, handle_decrypt_command, handle_encrypt_command, handle_keygen_command,
};
use filecipher::config::{paths::CipherPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "filecipher",
    version,
    about = "Encrypt and decrypt whole files with AES-256-GCM or RSA-OAEP",
    long_about = "filecipher encrypts a single file into <file>.encrypted using either \
                  AES-256-GCM (the default) or RSA-OAEP with SHA-256, and decrypts it \
                  back. Keys are stored unencrypted in the configuration directory \
                  unless a key file is given explicitly."
)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "FILECIPHER_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key and save it
    Keygen {
        /// Algorithm (aead, rsa-oaep)
        #[arg(short, long)]
        algorithm: Option<String>,
        /// Where to write the key (defaults to the configured key file)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Replace an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Encrypt a file into <file>.encrypted
    #[command(alias = "enc")]
    Encrypt {
        /// File to encrypt
        file: PathBuf,
        /// Algorithm (aead, rsa-oaep)
        #[arg(short, long)]
        algorithm: Option<String>,
        /// Key file (created if it does not exist)
        #[arg(short, long)]
        key: Option<PathBuf>,
    },

    /// Decrypt a <file>.encrypted back into <file>
    #[command(alias = "dec")]
    Decrypt {
        /// File to decrypt; must end with .encrypted
        file: PathBuf,
        /// Algorithm (aead, rsa-oaep)
        #[arg(short, long)]
        algorithm: Option<String>,
        /// Key file
        #[arg(short, long)]
        key: Option<PathBuf>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    // Initialize paths and settings
    let paths = CipherPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Commands::Keygen {
            algorithm,
            output,
            force,
        } => handle_keygen_command(&paths, &settings, algorithm.as_deref(), output, force)?,
        Commands::Encrypt {
            file,
            algorithm,
            key,
        } => handle_encrypt_command(&paths, &settings, &file, algorithm.as_deref(), key)?,
        Commands::Decrypt {
            file,
            algorithm,
            key,
        } => handle_decrypt_command(&paths, &settings, &file, algorithm.as_deref(), key)?,
        Commands::Config => handle_config_command(&paths, &settings)?,
    }

    Ok(())
}

/// Log to stderr so stdout stays reserved for command output
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .init();
}
