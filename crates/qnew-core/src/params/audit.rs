//! Independent re-derivation and checking of published parameters

use num_bigint_dig::{prime::probably_prime, BigUint};
use num_integer::Integer;
use num_traits::One;
use tracing::{debug, instrument};

use super::generate::search_modulus;
use crate::config::{HASH_BITS, PRIME_ATTEMPTS};
use crate::{DomainParams, Error, Provenance, Result};

/// Re-derive p from a published seed.
///
/// Replays the candidate search from the first attempt and requires that the
/// first prime found is the one at `provenance.counter`, so a generator
/// cannot skip over earlier valid candidates.
#[instrument(skip(seed), fields(seed = %hex::encode(seed)))]
pub fn audit(seed: &[u8], provenance: Provenance, rounds: usize) -> Result<BigUint> {
    if provenance.counter >= PRIME_ATTEMPTS {
        return Err(Error::AuditFailed(format!(
            "Counter {} exceeds the {} candidates tried per seed",
            provenance.counter, PRIME_ATTEMPTS
        )));
    }
    if provenance.bits <= HASH_BITS {
        return Err(Error::AuditFailed(format!(
            "Modulus size {} is too small",
            provenance.bits
        )));
    }

    let q = BigUint::from_bytes_be(seed);
    if q.bits() != HASH_BITS || !probably_prime(&q, rounds) {
        return Err(Error::AuditFailed(
            "Seed does not encode a 160-bit prime".into(),
        ));
    }

    match search_modulus(seed, &q, provenance.bits, provenance.counter + 1, rounds) {
        Some((p, counter)) if counter == provenance.counter => {
            debug!(counter, "Modulus re-derived from seed");
            Ok(p)
        }
        Some((_, counter)) => Err(Error::AuditFailed(format!(
            "First prime candidate is at attempt {}, not {}",
            counter, provenance.counter
        ))),
        None => Err(Error::AuditFailed(format!(
            "No prime candidate at attempt {}",
            provenance.counter
        ))),
    }
}

/// Check published domain parameters against their seed and the structural
/// requirements of the scheme.
pub fn check_params(params: &DomainParams, provenance: Provenance, rounds: usize) -> Result<()> {
    let DomainParams { p, q, g } = params;
    let one = BigUint::one();

    if p.bits() != provenance.bits {
        return Err(Error::AuditFailed(format!(
            "p has {} bits, expected {}",
            p.bits(),
            provenance.bits
        )));
    }
    if !(p - &one).is_multiple_of(&(q << 1usize)) {
        return Err(Error::AuditFailed("p is not 1 mod 2q".into()));
    }
    if *g <= one || g >= p {
        return Err(Error::AuditFailed("g is out of range".into()));
    }
    if g.modpow(q, p) != one {
        return Err(Error::AuditFailed("g does not have order q".into()));
    }

    let derived = audit(&params.seed(), provenance, rounds)?;
    if &derived != p {
        return Err(Error::AuditFailed(
            "p does not match the value derived from the seed".into(),
        ));
    }

    Ok(())
}
