//! PBKDF2 (RFC 2898 §5.2), generic over the pseudo-random function.

use common::CryptError;
use hmac::digest::{KeyInit, OutputSizeUser};
use hmac::Mac;

/// Largest block index PBKDF2 allows: `2^32 - 1`.
pub const MAX_BLOCKS: u64 = 2u64.pow(32) - 1;

/// Maximum derived-key length for a PRF with `h_len`-byte output.
pub fn max_output_len_for(h_len: usize) -> u64 {
    MAX_BLOCKS * h_len as u64
}

/// Derive `output_len` bytes from `password` and `salt` with PRF `M`.
///
/// `M` is normally an `Hmac<D>`; any MAC that accepts arbitrary-length keys
/// works.
///
/// # Errors
///
/// - [`CryptError::InvalidIterations`] if `iterations` is zero.
/// - [`CryptError::DerivedKeyTooLong`] if `output_len` exceeds
///   [`max_output_len_for`] the PRF's output size, or cannot be allocated.
///   Checked before any block is computed.
pub fn pbkdf2<M>(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    output_len: usize,
) -> Result<Vec<u8>, CryptError>
where
    M: Mac + KeyInit + Clone,
{
    if iterations == 0 {
        return Err(CryptError::InvalidIterations);
    }

    let h_len = <M as OutputSizeUser>::output_size();
    let max = max_output_len_for(h_len);
    if output_len as u64 > max {
        return Err(CryptError::DerivedKeyTooLong {
            requested: output_len as u64,
            max,
        });
    }

    let prf = <M as KeyInit>::new_from_slice(password)
        .map_err(|e| CryptError::Cipher(format!("PRF rejected password: {e}")))?;

    // Inside the PBKDF2 bound can still exceed the address space on 32-bit.
    let mut dk = Vec::new();
    dk.try_reserve_exact(output_len)
        .map_err(|_| CryptError::DerivedKeyTooLong {
            requested: output_len as u64,
            max: max.min(isize::MAX as u64),
        })?;

    let block_count = output_len.div_ceil(h_len);

    for index in 1..=block_count {
        // Bounded by MAX_BLOCKS above.
        let index = index as u32;

        let mut mac = prf.clone();
        mac.update(salt);
        mac.update(&index.to_be_bytes());
        let mut u = mac.finalize().into_bytes();
        let mut block = u.clone();

        for _ in 1..iterations {
            let mut mac = prf.clone();
            mac.update(&u);
            u = mac.finalize().into_bytes();
            block.iter_mut().zip(u.iter()).for_each(|(t, x)| *t ^= x);
        }

        let take = h_len.min(output_len - dk.len());
        dk.extend_from_slice(&block[..take]);
    }

    Ok(dk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmac::Hmac;
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    #[test]
    fn bound_uses_exponentiation() {
        assert_eq!(MAX_BLOCKS, 4_294_967_295);
        assert_eq!(max_output_len_for(32), 137_438_953_440);
        // `2 ^ 32 - 1` read as XOR would give 29 blocks.
        assert!(max_output_len_for(32) > 29 * 32);
    }

    #[test]
    fn longer_than_xor_bound_is_allowed() {
        let dk = pbkdf2::<HmacSha256>(b"p", b"s", 1, 1000).unwrap();
        assert_eq!(dk.len(), 1000);
    }

    #[test]
    fn zero_iterations_rejected() {
        assert_eq!(
            pbkdf2::<HmacSha256>(b"p", b"s", 0, 32),
            Err(CryptError::InvalidIterations)
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn too_long_rejected_before_allocation() {
        let requested = (max_output_len_for(32) + 1) as usize;
        match pbkdf2::<HmacSha256>(b"p", b"s", 1, requested) {
            Err(CryptError::DerivedKeyTooLong { requested: r, max }) => {
                assert_eq!(r, max + 1);
            }
            other => panic!("expected DerivedKeyTooLong, got {other:?}"),
        }
    }

    #[test]
    fn usize_max_output_is_rejected() {
        assert!(matches!(
            pbkdf2::<HmacSha256>(b"p", b"s", 1, usize::MAX),
            Err(CryptError::DerivedKeyTooLong { .. })
        ));
    }

    #[test]
    fn empty_output() {
        assert!(pbkdf2::<HmacSha256>(b"p", b"s", 1, 0).unwrap().is_empty());
    }

    #[test]
    fn truncation_is_a_prefix() {
        let long = pbkdf2::<HmacSha256>(b"password", b"salt", 3, 80).unwrap();
        let short = pbkdf2::<HmacSha256>(b"password", b"salt", 3, 33).unwrap();
        assert_eq!(&long[..33], &short[..]);
    }
}
