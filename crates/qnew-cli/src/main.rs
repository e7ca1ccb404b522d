//! q-NEW CLI
//!
//! Command-line interface for q-NEW key operations:
//! - Key generation with auditable domain parameters
//! - Signing and verification of messages
//! - Auditing published parameters against their seed

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use qnew_core::{
    config::DEFAULT_PRIMALITY_ROUNDS, hash_message, keygen, params, GenerationConfig, KeyRecord,
    Provenance, Signature, TracingProgress,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

/// q-NEW - discrete-log signatures with verifiable parameters
#[derive(Parser)]
#[command(name = "qnew")]
#[command(about = "q-NEW key generation, signing and verification")]
#[command(version)]
struct Cli {
    /// Key file to read or write
    #[arg(short, long, env = "QNEW_KEY", default_value = "./qnew-key.json", global = true)]
    key: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate domain parameters and a key pair
    Keygen {
        /// Bit length of the modulus p
        #[arg(short, long, env = "QNEW_BITS", default_value_t = 1024)]
        bits: usize,
    },

    /// Write the public half of a key to another file
    Public {
        /// Destination for the public key file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Sign a message
    Sign {
        /// Message to sign
        #[arg(short, long)]
        message: String,
    },

    /// Verify a signature
    Verify {
        /// Signed message
        #[arg(short, long)]
        message: String,

        /// R component (hex)
        #[arg(short, long)]
        r: String,

        /// S component (hex)
        #[arg(short, long)]
        s: String,
    },

    /// Re-derive p from the seed and check the parameters
    Audit,

    /// Show key info
    Info,
}

/// On-disk key: the record plus the provenance needed for auditing.
#[derive(Serialize, Deserialize)]
struct KeyFile {
    key: KeyRecord,
    provenance: Option<Provenance>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen { bits } => run_keygen(&cli.key, bits),
        Commands::Public { ref out } => run_public(&cli.key, out),
        Commands::Sign { ref message } => run_sign(&cli.key, message),
        Commands::Verify {
            ref message,
            ref r,
            ref s,
        } => run_verify(&cli.key, message, r, s),
        Commands::Audit => run_audit(&cli.key),
        Commands::Info => show_info(&cli.key),
    }
}

fn run_keygen(path: &Path, bits: usize) -> Result<()> {
    info!(bits, "Starting key generation");

    let config = GenerationConfig::new(bits)?;
    let generated = keygen::generate(&config, &mut OsRng, &TracingProgress)?;

    let key_file = KeyFile {
        key: generated.record,
        provenance: Some(generated.provenance),
    };
    save_key_file(path, &key_file)?;

    info!(path = ?path, "Key generated and saved");

    println!("Seed: {}", hex::encode(key_file.key.seed()));
    println!("Counter: {}", generated.provenance.counter);
    println!("Public Key: {}", hex::encode(key_file.key.y().to_bytes_be()));

    Ok(())
}

fn run_public(path: &Path, out: &Path) -> Result<()> {
    let key_file = load_key_file(path)?;

    let public = KeyFile {
        key: key_file.key.public_projection(),
        provenance: key_file.provenance,
    };
    save_key_file(out, &public)?;

    info!(path = ?out, "Public key saved");

    Ok(())
}

fn run_sign(path: &Path, message: &str) -> Result<()> {
    let key_file = load_key_file(path)?;
    if !key_file.key.has_private() {
        bail!("{} holds no private key", path.display());
    }

    let m = hash_message(message.as_bytes());
    let signature = key_file.key.sign_with_rng(&m, &mut OsRng)?;

    info!(
        r = hex::encode(signature.r.to_bytes_be()),
        s = hex::encode(signature.s.to_bytes_be()),
        "Signature generated"
    );

    println!("Signature:");
    println!("  r: {}", hex::encode(signature.r.to_bytes_be()));
    println!("  s: {}", hex::encode(signature.s.to_bytes_be()));

    Ok(())
}

fn run_verify(path: &Path, message: &str, r: &str, s: &str) -> Result<()> {
    let key_file = load_key_file(path)?;

    let signature = Signature::from_hex(r, s).context("Signature components must be hex")?;
    let m = hash_message(message.as_bytes());

    if key_file.key.verify(&m, &signature)? {
        println!("Signature valid");
        Ok(())
    } else {
        bail!("Signature invalid")
    }
}

fn run_audit(path: &Path) -> Result<()> {
    let key_file = load_key_file(path)?;
    let provenance = key_file
        .provenance
        .context("Key file carries no provenance to audit against")?;

    params::check_params(key_file.key.params(), provenance, DEFAULT_PRIMALITY_ROUNDS)?;

    info!(counter = provenance.counter, "Audit passed");
    println!("Parameters match seed {}", hex::encode(key_file.key.seed()));

    Ok(())
}

fn show_info(path: &Path) -> Result<()> {
    let key_file = load_key_file(path)?;
    let key = &key_file.key;

    println!("Key Info:");
    println!("  Modulus Bits: {}", key.params().p.bits());
    println!("  Digest Bits: {}", key.size());
    println!("  Private: {}", key.has_private());
    println!("  Seed: {}", hex::encode(key.seed()));
    if let Some(provenance) = key_file.provenance {
        println!("  Counter: {}", provenance.counter);
    }
    println!("  Public Key: {}", hex::encode(key.y().to_bytes_be()));

    Ok(())
}

fn save_key_file(path: &Path, key_file: &KeyFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(key_file)?;
    std::fs::write(path, json).with_context(|| format!("Writing {}", path.display()))?;
    Ok(())
}

fn load_key_file(path: &Path) -> Result<KeyFile> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Reading {}", path.display()))?;
    let key_file: KeyFile = serde_json::from_str(&json)?;
    Ok(key_file)
}
