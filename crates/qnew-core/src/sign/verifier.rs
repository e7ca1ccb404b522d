//! Signature verification

use num_bigint_dig::BigInt;
use num_traits::{Signed, Zero};

use crate::config::MESSAGE_BITS;
use crate::{DomainParams, Error, KeyRecord, Result, Signature};

impl KeyRecord {
    /// Verify `signature` over the message representative `m`.
    ///
    /// Accepts iff `(g^s * y^(m*r) mod p) mod q == r`. Out-of-range `r`, `s`
    /// or `m` are rejections (`Ok(false)`), not errors. The one exception is a
    /// negative `m`, which is a caller error. A record with `p == 0` or
    /// `q == 0` verifies nothing.
    pub fn verify(&self, m: &BigInt, signature: &Signature) -> Result<bool> {
        let DomainParams { p, q, g } = self.params();
        let Signature { r, s } = signature;

        if p.is_zero() || q.is_zero() {
            return Ok(false);
        }
        if r.is_zero() || r >= q || s.is_zero() || s >= q {
            return Ok(false);
        }
        if m.is_negative() {
            return Err(Error::NegativeMessage);
        }
        let m = match m.to_biguint() {
            Some(m) if !m.is_zero() && m.bits() <= MESSAGE_BITS => m,
            _ => return Ok(false),
        };

        let v1 = g.modpow(s, p);
        let v2 = self.y().modpow(&(&m * r), p);
        let v = (v1 * v2) % p % q;

        Ok(&v == r)
    }
}
