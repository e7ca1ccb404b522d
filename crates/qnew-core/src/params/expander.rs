//! Hash-based expansion of the seed into candidate moduli

use std::marker::PhantomData;

use digest::{consts::U20, Digest};
use num_bigint_dig::BigUint;
use num_traits::One;
use sha1::Sha1;

use crate::config::HASH_BITS;

/// Deterministic byte stream derived from a seed.
///
/// Block `(N, k)` is `H(seed || decimal(N) || decimal(k))`, read as a
/// big-endian integer. Anyone holding the seed can recompute every block.
pub struct HashExpander<'a, D = Sha1> {
    seed: &'a [u8],
    _digest: PhantomData<fn() -> D>,
}

impl<'a, D> HashExpander<'a, D>
where
    D: Digest<OutputSize = U20>,
{
    /// Create an expander over `seed`
    pub fn new(seed: &'a [u8]) -> Self {
        Self {
            seed,
            _digest: PhantomData,
        }
    }

    /// The seed being expanded
    pub fn seed(&self) -> &[u8] {
        self.seed
    }

    /// Block `V = H(seed || decimal(counter) || decimal(index))`
    pub fn block(&self, counter: u64, index: u64) -> BigUint {
        let digest = D::new()
            .chain_update(self.seed)
            .chain_update(counter.to_string().as_bytes())
            .chain_update(index.to_string().as_bytes())
            .finalize();
        BigUint::from_bytes_be(&digest)
    }

    /// Assemble a `(bits - 1)`-bit value from blocks `V[0..=n]` at `counter`.
    ///
    /// `V[n] mod 2^b` is the most significant chunk, followed by
    /// `V[n-1], ..., V[0]`, each occupying exactly 160 bits.
    pub fn candidate(&self, bits: usize, counter: u64) -> BigUint {
        let (n, b) = chunk_layout(bits);
        let high_mask = (BigUint::one() << b) - BigUint::one();

        let mut value = self.block(counter, n as u64) & high_mask;
        for k in (0..n).rev() {
            value = (value << HASH_BITS) + self.block(counter, k as u64);
        }
        value
    }
}

/// Split `bits - 1` into `n` full hash-width chunks plus `b` leftover bits.
pub fn chunk_layout(bits: usize) -> (usize, usize) {
    ((bits - 1) / HASH_BITS, (bits - 1) % HASH_BITS)
}

/// Hash counter used for the `attempt`-th candidate: `2 + attempt * (n + 1)`.
pub fn counter_for_attempt(bits: usize, attempt: u32) -> u64 {
    let (n, _) = chunk_layout(bits);
    2 + u64::from(attempt) * (n as u64 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Vec<u8> {
        hex::decode("80000000000000000000000000000000012346a9").unwrap()
    }

    fn hex_int(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
    }

    #[test]
    fn layout() {
        assert_eq!(chunk_layout(512), (3, 31));
        assert_eq!(chunk_layout(1024), (6, 63));
        assert_eq!(chunk_layout(481), (3, 0));
        assert_eq!(counter_for_attempt(512, 0), 2);
        assert_eq!(counter_for_attempt(512, 3), 14);
    }

    #[test]
    fn blocks_match_known_digests() {
        let seed = seed();
        let expander = HashExpander::<Sha1>::new(&seed);
        assert_eq!(
            expander.block(2, 0),
            hex_int("c90ec3dbf7ff44bb0b84d6f1db5159a032ef2d9d")
        );
        assert_eq!(
            expander.block(2, 3),
            hex_int("a26f49895f3a6796e3bd81392b610be07f49534d")
        );
    }

    #[test]
    fn blocks_are_deterministic() {
        let seed = seed();
        let a = HashExpander::<Sha1>::new(&seed);
        let b = HashExpander::<Sha1>::new(&seed);
        assert_eq!(a.block(42, 1), b.block(42, 1));
        assert_ne!(a.block(42, 1), a.block(42, 2));
    }

    #[test]
    fn candidate_layout() {
        let seed = seed();
        let expander = HashExpander::<Sha1>::new(&seed);
        let candidate = expander.candidate(512, 2);
        assert!(candidate.bits() <= 511);

        let low_mask = (BigUint::one() << HASH_BITS) - BigUint::one();
        assert_eq!(&candidate & &low_mask, expander.block(2, 0));
        assert_eq!(
            (&candidate >> (2 * HASH_BITS)) & &low_mask,
            expander.block(2, 2)
        );
        let high_mask = (BigUint::one() << 31usize) - BigUint::one();
        assert_eq!(
            &candidate >> (3 * HASH_BITS),
            expander.block(2, 3) & high_mask
        );
    }

    #[test]
    fn zero_leftover_bits_drop_top_block() {
        let seed = seed();
        let expander = HashExpander::<Sha1>::new(&seed);
        let candidate = expander.candidate(481, 7);
        assert!(candidate.bits() <= 480);
        assert_eq!(&candidate >> (2 * HASH_BITS), expander.block(7, 2));
    }
}
