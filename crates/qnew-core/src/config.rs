//! Generation settings

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Bit length of the subgroup order q, which is also the digest width of the
/// hash primitive.
pub const HASH_BITS: usize = 160;

/// Message representatives must be smaller than `2^MESSAGE_BITS`: a digest
/// plus one extra leading bit.
pub const MESSAGE_BITS: usize = HASH_BITS + 1;

/// Smallest modulus size accepted by [`GenerationConfig::new`].
pub const MIN_MODULUS_BITS: usize = 256;

/// Candidates for p tried per q before drawing a fresh q.
pub const PRIME_ATTEMPTS: u32 = 4096;

/// Draws of h allowed while looking for a generator g > 1.
pub const DEFAULT_GENERATOR_ATTEMPTS: u32 = 64;

/// Nonces drawn by `KeyRecord::sign_with_rng` before giving up.
pub const MAX_NONCE_ATTEMPTS: u32 = 16;

/// Miller-Rabin rounds used for every primality test.
pub const DEFAULT_PRIMALITY_ROUNDS: usize = 20;

/// Configuration for parameter and key generation
///
/// Built through [`GenerationConfig::new`]; deserialization runs the same
/// validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationConfig {
    bits: usize,
    generator_attempts: u32,
    primality_rounds: usize,
}

/// Unvalidated wire form of [`GenerationConfig`]
#[derive(Deserialize)]
struct ConfigFields {
    bits: usize,
    #[serde(default = "default_generator_attempts")]
    generator_attempts: u32,
    #[serde(default = "default_primality_rounds")]
    primality_rounds: usize,
}

fn default_generator_attempts() -> u32 {
    DEFAULT_GENERATOR_ATTEMPTS
}

fn default_primality_rounds() -> usize {
    DEFAULT_PRIMALITY_ROUNDS
}

impl<'de> Deserialize<'de> for GenerationConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let fields = ConfigFields::deserialize(deserializer)?;
        GenerationConfig::new(fields.bits)
            .and_then(|config| config.with_generator_attempts(fields.generator_attempts))
            .and_then(|config| config.with_primality_rounds(fields.primality_rounds))
            .map_err(serde::de::Error::custom)
    }
}

impl GenerationConfig {
    /// Create a configuration for a `bits`-bit modulus with default limits.
    pub fn new(bits: usize) -> Result<Self> {
        if bits < MIN_MODULUS_BITS {
            return Err(Error::InvalidConfig(format!(
                "Modulus must have at least {} bits, got {}",
                MIN_MODULUS_BITS, bits
            )));
        }

        Ok(Self {
            bits,
            generator_attempts: DEFAULT_GENERATOR_ATTEMPTS,
            primality_rounds: DEFAULT_PRIMALITY_ROUNDS,
        })
    }

    /// Bit length of the modulus p
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Draws of h before generator selection gives up
    pub fn generator_attempts(&self) -> u32 {
        self.generator_attempts
    }

    /// Rounds passed to the probabilistic primality test
    pub fn primality_rounds(&self) -> usize {
        self.primality_rounds
    }

    /// Override the number of generator draws.
    pub fn with_generator_attempts(mut self, attempts: u32) -> Result<Self> {
        if attempts == 0 {
            return Err(Error::InvalidConfig(
                "Generator attempts must be at least 1".into(),
            ));
        }
        self.generator_attempts = attempts;
        Ok(self)
    }

    /// Override the number of primality rounds.
    pub fn with_primality_rounds(mut self, rounds: usize) -> Result<Self> {
        if rounds == 0 {
            return Err(Error::InvalidConfig(
                "Primality rounds must be at least 1".into(),
            ));
        }
        self.primality_rounds = rounds;
        Ok(self)
    }
}
