//! Sealer configuration.
//!
//! The default algorithm and mode are bound into a [`crate::Sealer`] when it
//! is built and never change afterwards. Per-call overrides go through
//! [`crate::Sealer::encrypt_with`].

use crate::crypto::{aes_ctr, CipherRegistry};
use common::CryptError;

/// Defaults applied when a caller does not name a cipher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealerConfig {
    /// Default cipher algorithm identifier.
    pub algo: String,

    /// Default cipher mode identifier.
    pub mode: String,
}

impl Default for SealerConfig {
    fn default() -> Self {
        Self::new(aes_ctr::ALGORITHM, aes_ctr::MODE)
    }
}

impl SealerConfig {
    pub fn new(algo: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            algo: algo.into(),
            mode: mode.into(),
        }
    }

    /// Check that the default pair is served by `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptError::UnsupportedAlgorithm`] if it is not.
    pub fn validate(&self, registry: &CipherRegistry) -> Result<(), CryptError> {
        registry.resolve(&self.algo, &self.mode).map(|_| ())
    }
}
