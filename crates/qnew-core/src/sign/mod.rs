//! Signing and verification
//!
//! The scheme signs a message representative `M` (normally a SHA-1 digest)
//! with `r = (g^K mod p) mod q` and `s = (K - r*M*x) mod q`, and verifies by
//! recomputing `g^K` as `g^s * y^(M*r)`.

mod signer;
mod verifier;

use num_bigint_dig::{BigInt, Sign};
use sha1::{Digest, Sha1};

/// Message representative for `message`: its SHA-1 digest as a big-endian
/// integer.
pub fn hash_message(message: &[u8]) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &Sha1::digest(message))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{DomainParams, KeyRecord};
    use num_bigint_dig::BigUint;

    pub(crate) fn hex_int(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
    }

    /// 512-bit parameters derived from seed `80..012346a9`, with g = 2^((p-1)/q).
    pub(crate) fn known_record() -> KeyRecord {
        let params = DomainParams {
            p: hex_int(
                "f5e2a65fe7186298f845211d3865f5369d40ee930451a6447407bb006cb4c888\
                 a1a4f44f8764802013a5cb9be9384dfdb13353f08b9e6c924bd37c315142379b",
            ),
            q: hex_int("80000000000000000000000000000000012346a9"),
            g: hex_int(
                "bffcb7bdc6774e9979941f7b680f9b556a5311f89505df1526d5808100c60d27\
                 ad215c855d29a07e872fd85c97eff2e2a78c7f0a91ffee99cfd1d2a582c316b5",
            ),
        };
        let y = hex_int(
            "66e04c7af092bc8ab3f92ca7d5a67a87d39879a16007c84ef29ced75a4206c3e\
             dcbbce189720fc357c058f3efde38c248b8c72b1f64915f6db43577f70b05511",
        );
        let x = hex_int("0123456789abcdef0123456789abcdef01234567");
        KeyRecord::private(params, y, x)
    }

    #[test]
    fn hash_message_is_sha1() {
        assert_eq!(
            hash_message(b"abc"),
            BigInt::from_biguint(
                Sign::Plus,
                hex_int("a9993e364706816aba3e25717850c26c9cd0d89d")
            )
        );
    }
}
