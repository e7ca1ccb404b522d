//! Key generation module
//!
//! Produces domain parameters from a fresh seed, then a private scalar x and
//! public value y over them.

mod keypair;

pub use keypair::{derive_key_pair, generate, GeneratedKey};
