//! # q-NEW Core
//!
//! Core primitives for the q-NEW signature scheme, a discrete-logarithm
//! scheme in the DSA family.
//!
//! This crate provides:
//! - Verifiable domain parameter generation from a public seed
//! - Key pair derivation
//! - Signing and verification of message representatives
//! - Auditing of published parameters against their seed
//!
//! ## Scheme Overview
//!
//! q is a 160-bit prime and p a prime with `p ≡ 1 (mod 2q)`. p is expanded
//! from the bytes of q with SHA-1, so anyone holding q can reproduce it.
//! The private key is `0 < x < q` and the public key `y = g^x mod p`.
//! A signature over M with nonce K is `r = (g^K mod p) mod q`,
//! `s = (K - r*M*x) mod q`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use qnew_core::{hash_message, keygen, GenerationConfig};
//! use rand::rngs::OsRng;
//!
//! let config = GenerationConfig::new(1024)?;
//! let key = keygen::generate(&config, &mut OsRng, &())?;
//!
//! let m = hash_message(b"hello");
//! let signature = key.record.sign_with_rng(&m, &mut OsRng)?;
//! assert!(key.record.public_projection().verify(&m, &signature)?);
//! # Ok::<(), qnew_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod keygen;
pub mod params;
pub mod progress;
pub mod sign;
pub mod types;

pub use config::GenerationConfig;
pub use error::{Error, Result};
pub use num_bigint_dig::{BigInt, BigUint};
pub use progress::{Phase, Progress, TracingProgress};
pub use sign::hash_message;
pub use types::{DomainParams, KeyMaterial, KeyRecord, Provenance, SecretScalar, Signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
