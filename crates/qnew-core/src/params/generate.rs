//! Seeded generation of the domain parameters (p, q, g)

use num_bigint_dig::{prime::probably_prime, BigUint, RandBigInt};
use num_traits::One;
use rand_core::{CryptoRng, RngCore};
use sha1::Sha1;
use tracing::{debug, info, instrument, warn};

use super::expander::{counter_for_attempt, HashExpander};
use crate::config::{GenerationConfig, HASH_BITS, PRIME_ATTEMPTS};
use crate::progress::{Phase, Progress};
use crate::{DomainParams, Error, Provenance, Result};

/// Domain parameters together with what is needed to audit them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedParams {
    /// The generated `(p, q, g)`
    pub params: DomainParams,
    /// Bit length and attempt counter for re-deriving p
    pub provenance: Provenance,
}

impl GeneratedParams {
    /// Published seed: the big-endian bytes of q
    pub fn seed(&self) -> Vec<u8> {
        self.params.seed()
    }
}

/// Generate domain parameters for a `config.bits()`-bit modulus.
///
/// A fresh 160-bit prime q is drawn and its bytes serve as the seed from
/// which p is expanded. If none of the first 4096 candidates for p is
/// prime, q is discarded and the search starts over; restarts are not
/// bounded.
///
/// Fails with [`Error::InvalidConfig`] if the modulus is not wider than q:
/// no full-size candidate can then satisfy `p ≡ 1 (mod 2q)`.
#[instrument(skip(config, rng, progress), fields(bits = config.bits()))]
pub fn generate<R>(
    config: &GenerationConfig,
    rng: &mut R,
    progress: &dyn Progress,
) -> Result<GeneratedParams>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let bits = config.bits();
    if bits <= HASH_BITS {
        return Err(Error::InvalidConfig(format!(
            "Modulus must be wider than {} bits, got {}",
            HASH_BITS, bits
        )));
    }

    info!("Starting parameter generation");

    progress.report(Phase::PrimeSearch);
    let (q, p, counter) = loop {
        let q = random_subgroup_order(rng, config.primality_rounds());
        let seed = q.to_bytes_be();

        if let Some((p, counter)) =
            search_modulus(&seed, &q, bits, PRIME_ATTEMPTS, config.primality_rounds())
        {
            break (q, p, counter);
        }

        warn!(
            seed = hex::encode(&seed),
            "{} values of p tried, drawing a new q", PRIME_ATTEMPTS
        );
        progress.report(Phase::PrimeSearchRestart);
    };
    debug!(counter, "Prime modulus found");

    progress.report(Phase::Generator);
    let g = select_generator(&p, &q, config.generator_attempts(), rng)?;

    let params = DomainParams { p, q, g };
    info!(
        seed = hex::encode(params.seed()),
        counter,
        "Parameter generation completed"
    );

    Ok(GeneratedParams {
        params,
        provenance: Provenance { bits, counter },
    })
}

/// Draw a prime of exactly `HASH_BITS` bits.
///
/// Only the top bit of the random start is forced; the search then walks
/// upward over odd values, redrawing if it runs past `2^HASH_BITS`.
pub(crate) fn random_subgroup_order<R>(rng: &mut R, rounds: usize) -> BigUint
where
    R: RngCore + CryptoRng + ?Sized,
{
    let top = BigUint::one() << (HASH_BITS - 1);
    let two = BigUint::from(2u32);

    loop {
        let mut q = rng.gen_biguint(HASH_BITS) | &top | BigUint::one();
        while q.bits() == HASH_BITS {
            if probably_prime(&q, rounds) {
                return q;
            }
            q += &two;
        }
    }
}

/// Search the first `attempts` seed-derived candidates for a prime p with
/// `p ≡ 1 (mod 2q)`.
///
/// Returns p and the zero-based attempt at which it was accepted.
pub(crate) fn search_modulus(
    seed: &[u8],
    q: &BigUint,
    bits: usize,
    attempts: u32,
    rounds: usize,
) -> Option<(BigUint, u32)> {
    let expander = HashExpander::<Sha1>::new(seed);
    let two_q: BigUint = q << 1usize;
    let top = BigUint::one() << (bits - 1);

    for attempt in 0..attempts {
        let counter = counter_for_attempt(bits, attempt);
        let p = candidate_modulus(&expander, bits, counter, &two_q, &top);

        if p >= top && probably_prime(&p, rounds) {
            return Some((p, attempt));
        }
    }

    None
}

/// Candidate for p at hash counter `counter`: top bit forced, then lowered
/// so that `p mod 2q == 1`.
fn candidate_modulus(
    expander: &HashExpander<'_, Sha1>,
    bits: usize,
    counter: u64,
    two_q: &BigUint,
    top: &BigUint,
) -> BigUint {
    let p = expander.candidate(bits, counter) + top;
    let rem = &p % two_q;
    p + BigUint::one() - rem
}

/// Find `g = h^((p-1)/q) mod p > 1` for random `1 < h < p-1`.
pub(crate) fn select_generator<R>(
    p: &BigUint,
    q: &BigUint,
    attempts: u32,
    rng: &mut R,
) -> Result<BigUint>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let p_minus_one = p - &one;
    let exponent = &p_minus_one / q;

    for attempt in 0..attempts {
        let h = rng.gen_biguint_range(&two, &p_minus_one);
        let g = h.modpow(&exponent, p);
        if g > one {
            debug!(attempt, "Generator selected");
            return Ok(g);
        }
    }

    Err(Error::GeneratorExhausted(attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_integer::Integer;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::cell::RefCell;

    #[test]
    fn generates_valid_params() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let config = GenerationConfig::new(512).unwrap();
        let generated = generate(&config, &mut rng, &()).unwrap();
        let DomainParams { p, q, g } = &generated.params;

        assert_eq!(q.bits(), 160);
        assert_eq!(p.bits(), 512);
        assert!(probably_prime(q, 20));
        assert!(probably_prime(p, 20));
        assert!((p - BigUint::one()).is_multiple_of(&(q << 1usize)));
        assert!(*g > BigUint::one() && g < p);
        assert_eq!(g.modpow(q, p), BigUint::one());
        assert_eq!(generated.seed(), q.to_bytes_be());
        assert_eq!(generated.provenance.bits, 512);
        assert!(generated.provenance.counter < PRIME_ATTEMPTS);
    }

    #[test]
    fn reports_phases_in_order() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let config = GenerationConfig::new(256).unwrap();
        let seen = RefCell::new(Vec::new());
        let observer = |phase: Phase| seen.borrow_mut().push(phase);

        generate(&config, &mut rng, &observer).unwrap();

        let seen = seen.into_inner();
        assert_eq!(seen.first(), Some(&Phase::PrimeSearch));
        assert_eq!(seen.last(), Some(&Phase::Generator));
        assert!(seen[1..seen.len() - 1]
            .iter()
            .all(|phase| *phase == Phase::PrimeSearchRestart));
    }

    #[test]
    fn same_seed_same_modulus() {
        let q = BigUint::parse_bytes(b"80000000000000000000000000000000012346a9", 16).unwrap();
        let seed = q.to_bytes_be();
        let first = search_modulus(&seed, &q, 512, PRIME_ATTEMPTS, 20).unwrap();
        let second = search_modulus(&seed, &q, 512, PRIME_ATTEMPTS, 20).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.1, 371);
    }

    #[test]
    fn search_gives_up_after_attempts() {
        let q = BigUint::parse_bytes(b"80000000000000000000000000000000012346a9", 16).unwrap();
        let seed = q.to_bytes_be();
        assert!(search_modulus(&seed, &q, 512, 371, 20).is_none());
    }

    #[test]
    fn subgroup_orders_cover_the_full_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let upper_quarter = BigUint::from(3u32) << (HASH_BITS - 2);
        let drawn: Vec<BigUint> = (0..64)
            .map(|_| random_subgroup_order(&mut rng, 20))
            .collect();

        for q in &drawn {
            assert_eq!(q.bits(), HASH_BITS);
            assert!(probably_prime(q, 20));
        }
        assert!(drawn.iter().any(|q| q < &upper_quarter));
        assert!(drawn.iter().any(|q| q >= &upper_quarter));
    }

    #[test]
    fn generator_selection_is_bounded() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        // With q = 1 every h maps to h^(p-1) = 1.
        let result = select_generator(
            &BigUint::from(7u32),
            &BigUint::one(),
            5,
            &mut rng,
        );
        assert!(matches!(result, Err(Error::GeneratorExhausted(5))));
    }

    #[test]
    fn generator_has_order_q() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let p = BigUint::from(23u32);
        let q = BigUint::from(11u32);
        let g = select_generator(&p, &q, 8, &mut rng).unwrap();
        assert!(g > BigUint::one());
        assert_eq!(g.modpow(&q, &p), BigUint::one());
    }
}
