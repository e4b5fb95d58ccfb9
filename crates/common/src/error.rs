//! Common error types shared across crates.

use thiserror::Error;

/// Error returned by every key-derivation and envelope operation.
///
/// Integrity failures always surface as [`CryptError::MacMismatch`], whether
/// the key was wrong or the ciphertext was altered. Callers must not be able
/// to tell the two apart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptError {
    /// The key length is outside the sizes the cipher accepts.
    #[error("key is out of range: got {actual} bytes, expected {allowed}")]
    KeySizeInvalid {
        /// Length of the rejected key.
        actual: usize,
        /// Human-readable description of the accepted sizes.
        allowed: String,
    },

    /// The envelope is missing a field, carries an extra one, or a field does not decode.
    #[error("malformed envelope: {0}")]
    EnvelopeMalformed(String),

    /// The integrity tag did not match.
    #[error("message authentication code invalid")]
    MacMismatch,

    /// The requested PBKDF2 output is longer than `(2^32 - 1) * hLen`.
    #[error("derived key too long: requested {requested} bytes, maximum is {max}")]
    DerivedKeyTooLong { requested: u64, max: u64 },

    /// PBKDF2 requires at least one iteration.
    #[error("iteration count must be at least 1")]
    InvalidIterations,

    /// No cipher is registered for this algorithm/mode pair.
    #[error("unsupported algorithm: {algo}/{mode}")]
    UnsupportedAlgorithm { algo: String, mode: String },

    /// The data codec could not serialise or deserialise the payload.
    #[error("codec failure: {0}")]
    Codec(String),

    /// The cipher primitive rejected its input.
    #[error("cipher failure: {0}")]
    Cipher(String),

    /// The random source could not produce bytes.
    #[error("random source failure: {0}")]
    Random(String),
}

impl CryptError {
    /// Short machine-readable code, suitable for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            CryptError::KeySizeInvalid { .. } => "key_size_invalid",
            CryptError::EnvelopeMalformed(_) => "envelope_malformed",
            CryptError::MacMismatch => "mac_mismatch",
            CryptError::DerivedKeyTooLong { .. } => "derived_key_too_long",
            CryptError::InvalidIterations => "invalid_iterations",
            CryptError::UnsupportedAlgorithm { .. } => "unsupported_algorithm",
            CryptError::Codec(_) => "codec",
            CryptError::Cipher(_) => "cipher",
            CryptError::Random(_) => "random",
        }
    }
}
