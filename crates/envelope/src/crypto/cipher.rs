//! The cipher capability: an opaque `encrypt(plaintext, key, iv)` /
//! `decrypt(ciphertext, key, iv)` pair plus the size constraints the envelope
//! layer validates against.

use std::fmt;

use common::CryptError;

/// Key lengths a cipher accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySizes {
    /// Exactly one of these lengths.
    OneOf(Vec<usize>),
    /// Any length in `1..=max`.
    UpTo(usize),
}

impl KeySizes {
    /// Returns `true` if a key of `len` bytes satisfies the constraint.
    pub fn accepts(&self, len: usize) -> bool {
        match self {
            KeySizes::OneOf(sizes) => sizes.contains(&len),
            KeySizes::UpTo(max) => (1..=*max).contains(&len),
        }
    }

    /// Check `len`, returning [`CryptError::KeySizeInvalid`] on violation.
    pub fn check(&self, len: usize) -> Result<(), CryptError> {
        if self.accepts(len) {
            Ok(())
        } else {
            Err(CryptError::KeySizeInvalid {
                actual: len,
                allowed: self.to_string(),
            })
        }
    }
}

impl fmt::Display for KeySizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySizes::OneOf(sizes) => write!(f, "one of {sizes:?} bytes"),
            KeySizes::UpTo(max) => write!(f, "1 - {max} bytes"),
        }
    }
}

/// A block cipher bound to a mode of operation.
///
/// Implementations are stateless; one instance serves any number of
/// concurrent calls.
pub trait Cipher: Send + Sync {
    /// Algorithm identifier written to the envelope's `algo` field.
    fn algorithm(&self) -> &'static str;

    /// Mode identifier written to the envelope's `mode` field.
    fn mode(&self) -> &'static str;

    fn key_sizes(&self) -> KeySizes;

    /// Required IV length in bytes.
    fn iv_size(&self) -> usize;

    fn encrypt(&self, plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptError>;

    fn decrypt(&self, ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptError>;
}
