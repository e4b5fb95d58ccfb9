//! [`CipherRegistry`]: lookup of cipher capabilities by `(algo, mode)`.

use std::collections::BTreeMap;
use std::sync::Arc;

use common::CryptError;

use super::aes_ctr::AesCtr;
use super::cipher::Cipher;
use super::gcm_siv::AesGcmSiv;

/// Immutable-after-construction map from `(algo, mode)` to a cipher.
///
/// Cheap to clone; clones share the registered ciphers.
#[derive(Clone, Default)]
pub struct CipherRegistry {
    ciphers: BTreeMap<(String, String), Arc<dyn Cipher>>,
}

impl CipherRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in ciphers (`rijndael-128/ctr`,
    /// `aes-gcm-siv/siv`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AesCtr));
        registry.register(Arc::new(AesGcmSiv));
        registry
    }

    /// Add `cipher` under its own identifiers, replacing any previous entry.
    pub fn register(&mut self, cipher: Arc<dyn Cipher>) {
        let id = (cipher.algorithm().to_owned(), cipher.mode().to_owned());
        self.ciphers.insert(id, cipher);
    }

    /// Look up the cipher for `algo`/`mode`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptError::UnsupportedAlgorithm`] if nothing is registered.
    pub fn resolve(&self, algo: &str, mode: &str) -> Result<Arc<dyn Cipher>, CryptError> {
        self.ciphers
            .get(&(algo.to_owned(), mode.to_owned()))
            .cloned()
            .ok_or_else(|| CryptError::UnsupportedAlgorithm {
                algo: algo.to_owned(),
                mode: mode.to_owned(),
            })
    }

    pub fn contains(&self, algo: &str, mode: &str) -> bool {
        self.resolve(algo, mode).is_ok()
    }

    /// Registered ciphers in `(algo, mode)` order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Cipher>> {
        self.ciphers.values()
    }

    pub fn len(&self) -> usize {
        self.ciphers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphers.is_empty()
    }
}

impl std::fmt::Debug for CipherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.ciphers.keys()).finish()
    }
}
