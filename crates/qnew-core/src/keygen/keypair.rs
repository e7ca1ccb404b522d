//! Key pair derivation and the full generation pipeline

use num_bigint_dig::{BigUint, RandBigInt};
use num_traits::One;
use rand_core::{CryptoRng, RngCore};
use tracing::{info, instrument};

use crate::config::GenerationConfig;
use crate::params;
use crate::progress::{Phase, Progress};
use crate::{DomainParams, KeyRecord, Provenance, Result};

/// A freshly generated key together with the provenance of its parameters.
#[derive(Debug, Clone)]
pub struct GeneratedKey {
    /// Key record holding both the public and private halves
    pub record: KeyRecord,
    /// Bit length and attempt counter needed to audit p
    pub provenance: Provenance,
}

/// Generate domain parameters and a key pair over them.
#[instrument(skip(config, rng, progress), fields(bits = config.bits()))]
pub fn generate<R>(
    config: &GenerationConfig,
    rng: &mut R,
    progress: &dyn Progress,
) -> Result<GeneratedKey>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let generated = params::generate(config, rng, progress)?;
    let record = derive_key_pair(generated.params, rng, progress)?;

    info!(
        seed = hex::encode(record.seed()),
        y = hex::encode(record.y().to_bytes_be()),
        "Key generation completed"
    );

    Ok(GeneratedKey {
        record,
        provenance: generated.provenance,
    })
}

/// Draw `0 < x < q` and compute `y = g^x mod p`.
///
/// Fails with [`crate::Error::InvalidArgument`] if `p == 0` or `q < 2`.
pub fn derive_key_pair<R>(
    params: DomainParams,
    rng: &mut R,
    progress: &dyn Progress,
) -> Result<KeyRecord>
where
    R: RngCore + CryptoRng + ?Sized,
{
    params.check_group()?;
    progress.report(Phase::KeyPair);

    let x = rng.gen_biguint_range(&BigUint::one(), &params.q);
    let y = params.g.modpow(&x, &params.p);

    Ok(KeyRecord::private(params, y, x))
}
