//! Signature generation

use num_bigint_dig::{BigInt, BigUint, RandBigInt};
use num_traits::{One, Signed, Zero};
use rand_core::{CryptoRng, RngCore};
use tracing::debug;

use crate::config::{MAX_NONCE_ATTEMPTS, MESSAGE_BITS};
use crate::{DomainParams, Error, KeyRecord, Result, Signature};

impl KeyRecord {
    /// Sign the message representative `m` with the caller-chosen nonce `k`.
    ///
    /// Computes `r = (g^k mod p) mod q` and `s = (k - r*m*x mod q) mod q`.
    /// A zero `r` or `s` is returned as is; callers should retry with a new
    /// nonce in that case.
    ///
    /// `k` must be secret, unpredictable and never reused under the same
    /// key: two signatures sharing a nonce reveal x.
    ///
    /// # Errors
    /// - [`Error::MissingPrivateKey`] for a public-only record
    /// - [`Error::InvalidArgument`] if `p == 0` or `q < 2`
    /// - [`Error::NonceTooLarge`] if `k >= q`
    /// - [`Error::NegativeMessage`] if `m < 0`
    /// - [`Error::MessageTooLarge`] if `m >= 2^161`
    pub fn sign(&self, m: &BigInt, k: &BigUint) -> Result<Signature> {
        let x = self.x().ok_or(Error::MissingPrivateKey)?;
        self.params().check_group()?;
        let DomainParams { p, q, g } = self.params();

        if k >= q {
            return Err(Error::NonceTooLarge);
        }
        if m.is_negative() {
            return Err(Error::NegativeMessage);
        }
        let m = m.to_biguint().ok_or(Error::NegativeMessage)?;
        if m.bits() > MESSAGE_BITS {
            return Err(Error::MessageTooLarge);
        }

        let r = g.modpow(k, p) % q;
        let t = (&r * &m * x) % q;
        let s = (k + q - t) % q;

        Ok(Signature::new(r, s))
    }

    /// Draw a nonce uniformly from `[1, q)`.
    ///
    /// Fails with [`Error::InvalidArgument`] when the range is empty or p is
    /// zero.
    pub fn random_nonce<R>(&self, rng: &mut R) -> Result<BigUint>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        self.params().check_group()?;
        Ok(rng.gen_biguint_range(&BigUint::one(), &self.params().q))
    }

    /// Sign `m` with fresh nonces from `rng` until neither component is zero.
    pub fn sign_with_rng<R>(&self, m: &BigInt, rng: &mut R) -> Result<Signature>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        for attempt in 0..MAX_NONCE_ATTEMPTS {
            let k = self.random_nonce(rng)?;
            let signature = self.sign(m, &k)?;
            if !signature.r.is_zero() && !signature.s.is_zero() {
                return Ok(signature);
            }
            debug!(attempt, "Zero signature component, redrawing nonce");
        }

        Err(Error::NonceExhausted(MAX_NONCE_ATTEMPTS))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{hex_int, known_record};
    use super::*;
    use crate::hash_message;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn matches_known_answer() {
        let record = known_record();
        let m = hash_message(b"abc");
        let k = hex_int("00fedcba9876543210fedcba9876543210fedcba");

        let signature = record.sign(&m, &k).unwrap();
        assert_eq!(signature.r, hex_int("24f56962e83d1b48621593821caadfd9e1fa5f"));
        assert_eq!(signature.s, hex_int("688460f49b5e46c9945e7f708c084595aeff56b7"));
    }

    #[test]
    fn rejects_nonce_not_below_q() {
        let record = known_record();
        let q = record.params().q.clone();
        let m = BigInt::from(5u32);

        assert!(matches!(record.sign(&m, &q), Err(Error::NonceTooLarge)));
        assert!(matches!(
            record.sign(&m, &(&q + BigUint::one())),
            Err(Error::NonceTooLarge)
        ));
        assert!(record.sign(&m, &(&q - BigUint::one())).is_ok());
    }

    #[test]
    fn rejects_out_of_range_messages() {
        let record = known_record();
        let k = BigUint::from(12345u32);
        let limit = BigInt::one() << MESSAGE_BITS;

        assert!(matches!(
            record.sign(&BigInt::from(-1), &k),
            Err(Error::NegativeMessage)
        ));
        assert!(matches!(
            record.sign(&limit, &k),
            Err(Error::MessageTooLarge)
        ));
        assert!(record.sign(&(limit - BigInt::one()), &k).is_ok());
        assert!(record.sign(&BigInt::zero(), &k).is_ok());
    }

    #[test]
    fn nonce_is_checked_before_message() {
        let record = known_record();
        let q = record.params().q.clone();
        assert!(matches!(
            record.sign(&BigInt::from(-1), &q),
            Err(Error::NonceTooLarge)
        ));
    }

    #[test]
    fn public_record_cannot_sign() {
        let record = known_record().public_projection();
        assert!(matches!(
            record.sign(&BigInt::from(1), &BigUint::from(1u32)),
            Err(Error::MissingPrivateKey)
        ));
    }

    #[test]
    fn random_nonces_stay_in_range() {
        let record = known_record();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        for _ in 0..64 {
            let k = record.random_nonce(&mut rng).unwrap();
            assert!(!k.is_zero());
            assert!(k < record.params().q);
        }
    }

    #[test]
    fn sign_with_rng_gives_nonzero_components() {
        let record = known_record();
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let m = hash_message(b"message");
        let signature = record.sign_with_rng(&m, &mut rng).unwrap();
        assert!(!signature.r.is_zero());
        assert!(!signature.s.is_zero());
        assert!(record.verify(&m, &signature).unwrap());
    }

    #[test]
    fn degenerate_parameters_error_instead_of_panicking() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let m = BigInt::one();
        let fields = |p: u32, q: u32| [p, q, 4, 3, 2].map(BigUint::from);

        let zero_modulus = KeyRecord::construct(&fields(0, 11)).unwrap();
        assert!(matches!(
            zero_modulus.sign(&m, &BigUint::one()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            zero_modulus.sign_with_rng(&m, &mut rng),
            Err(Error::InvalidArgument(_))
        ));

        for q in [0u32, 1] {
            let record = KeyRecord::construct(&fields(23, q)).unwrap();
            assert!(matches!(
                record.random_nonce(&mut rng),
                Err(Error::InvalidArgument(_))
            ));
            assert!(matches!(
                record.sign_with_rng(&m, &mut rng),
                Err(Error::InvalidArgument(_))
            ));
        }
    }
}
