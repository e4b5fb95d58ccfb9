//! Secure random bytes for IV generation.

use aes_gcm_siv::aead::{rand_core::RngCore, OsRng};
use common::CryptError;

/// Source of cryptographically secure random bytes.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Fill `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| CryptError::Random(e.to_string()))
    }
}

/// Allocate and fill `n` random bytes from `source`.
pub fn random_bytes(source: &dyn RandomSource, n: usize) -> Result<Vec<u8>, CryptError> {
    let mut buf = vec![0u8; n];
    source.fill(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_random_fills_requested_length() {
        let bytes = random_bytes(&OsRandom, 16).unwrap();
        assert_eq!(bytes.len(), 16);
    }

    #[test]
    fn os_random_is_not_constant() {
        let a = random_bytes(&OsRandom, 32).unwrap();
        let b = random_bytes(&OsRandom, 32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_length_request() {
        assert!(random_bytes(&OsRandom, 0).unwrap().is_empty());
    }

    #[test]
    fn failure_is_propagated() {
        let mut mock = MockRandomSource::new();
        mock.expect_fill()
            .returning(|_| Err(CryptError::Random("entropy exhausted".into())));
        assert_eq!(
            random_bytes(&mock, 4),
            Err(CryptError::Random("entropy exhausted".into()))
        );
    }
}
