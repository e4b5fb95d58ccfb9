//! [`Sealer`]: encrypts data into self-describing [`Envelope`]s and opens them
//! again.
//!
//! # Envelope construction
//!
//! ```text
//! iv    = random(cipher.iv_size())
//! cdata = cipher.encrypt(codec.serialize(data), key, iv)
//! mac   = PBKDF2-HMAC-SHA256(password = cdata, salt = key, 1000 iterations, 32 bytes)
//! ```
//!
//! The tag construction (PBKDF2 keyed by the ciphertext, salted with the key)
//! is kept for compatibility with existing envelopes. It only covers `cdata`;
//! `algo`, `mode` and `iv` are not authenticated.
//!
//! # Invariants
//!
//! - The tag is checked in constant time before anything is decrypted.
//! - A wrong key, a tampered ciphertext and a failed AEAD tag all yield
//!   [`CryptError::MacMismatch`].
//! - Decrypted bytes reach the codec unmodified, trailing bytes included.
//! - No key material appears in any log event.

use std::sync::Arc;

use common::{CryptError, DecodedEnvelope, Envelope};
use serde::{de::DeserializeOwned, Serialize};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::codec::{DataCodec, JsonCodec};
use crate::config::SealerConfig;
use crate::crypto::{Cipher, CipherRegistry};
use crate::kdf::{self, HashPrimitive};
use crate::rng::{random_bytes, OsRandom, RandomSource};

/// PBKDF2 iteration count for the envelope tag.
pub const TAG_ITERATIONS: u32 = 1000;

/// Envelope tag length in bytes.
pub const TAG_LEN: usize = 32;

/// Hash underlying the envelope tag.
pub const TAG_HASH: HashPrimitive = HashPrimitive::Sha256;

/// Compute the envelope tag for `ciphertext` under `key`.
pub fn compute_tag(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptError> {
    kdf::derive(ciphertext, key, TAG_ITERATIONS, TAG_LEN, TAG_HASH)
}

/// Encrypts and decrypts envelopes with a fixed set of capabilities.
///
/// Holds no per-call state; share one instance across threads.
#[derive(Clone)]
pub struct Sealer<C = JsonCodec> {
    config: SealerConfig,
    ciphers: CipherRegistry,
    rng: Arc<dyn RandomSource>,
    codec: C,
}

impl Sealer<JsonCodec> {
    /// A sealer with the built-in ciphers, the OS RNG and the JSON codec.
    ///
    /// # Errors
    ///
    /// Returns [`CryptError::UnsupportedAlgorithm`] if `config` names a
    /// cipher that is not built in.
    pub fn new(config: SealerConfig) -> Result<Self, CryptError> {
        Self::with_parts(
            config,
            CipherRegistry::with_defaults(),
            Arc::new(OsRandom),
            JsonCodec,
        )
    }
}

impl<C: DataCodec> Sealer<C> {
    /// A sealer with caller-supplied capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`CryptError::UnsupportedAlgorithm`] if the default pair in
    /// `config` is not in `ciphers`.
    pub fn with_parts(
        config: SealerConfig,
        ciphers: CipherRegistry,
        rng: Arc<dyn RandomSource>,
        codec: C,
    ) -> Result<Self, CryptError> {
        config.validate(&ciphers)?;
        Ok(Self {
            config,
            ciphers,
            rng,
            codec,
        })
    }

    pub fn config(&self) -> &SealerConfig {
        &self.config
    }

    pub fn ciphers(&self) -> &CipherRegistry {
        &self.ciphers
    }

    /// Encrypt `data` with the default cipher.
    pub fn encrypt<T: Serialize + ?Sized>(
        &self,
        data: &T,
        key: &[u8],
    ) -> Result<Envelope, CryptError> {
        self.encrypt_with(data, key, &self.config.algo, &self.config.mode)
    }

    /// Encrypt `data` with the cipher registered as `algo`/`mode`.
    ///
    /// # Errors
    ///
    /// - [`CryptError::UnsupportedAlgorithm`] for an unregistered pair.
    /// - [`CryptError::KeySizeInvalid`] if the cipher does not accept `key`'s length.
    /// - [`CryptError::Codec`], [`CryptError::Random`] or [`CryptError::Cipher`]
    ///   if a capability fails.
    pub fn encrypt_with<T: Serialize + ?Sized>(
        &self,
        data: &T,
        key: &[u8],
        algo: &str,
        mode: &str,
    ) -> Result<Envelope, CryptError> {
        let cipher = self.ciphers.resolve(algo, mode)?;
        // Validate before touching the codec or the RNG.
        check_key(cipher.as_ref(), key)?;
        let plaintext = self.codec.serialize(data)?;
        self.seal_bytes(cipher.as_ref(), &plaintext, key)
    }

    /// Encrypt raw bytes with the default cipher, bypassing the codec.
    pub fn encrypt_bytes(&self, plaintext: &[u8], key: &[u8]) -> Result<Envelope, CryptError> {
        self.encrypt_bytes_with(plaintext, key, &self.config.algo, &self.config.mode)
    }

    /// Encrypt raw bytes with `algo`/`mode`, bypassing the codec.
    pub fn encrypt_bytes_with(
        &self,
        plaintext: &[u8],
        key: &[u8],
        algo: &str,
        mode: &str,
    ) -> Result<Envelope, CryptError> {
        let cipher = self.ciphers.resolve(algo, mode)?;
        check_key(cipher.as_ref(), key)?;
        self.seal_bytes(cipher.as_ref(), plaintext, key)
    }

    fn seal_bytes(
        &self,
        cipher: &dyn Cipher,
        plaintext: &[u8],
        key: &[u8],
    ) -> Result<Envelope, CryptError> {
        let iv = random_bytes(self.rng.as_ref(), cipher.iv_size())?;
        let ciphertext = cipher.encrypt(plaintext, key, &iv)?;
        let mac = compute_tag(&ciphertext, key)?;

        debug!(
            algo = cipher.algorithm(),
            mode = cipher.mode(),
            plaintext_len = plaintext.len(),
            "envelope sealed"
        );
        Ok(Envelope::new(
            cipher.algorithm(),
            cipher.mode(),
            &iv,
            &ciphertext,
            &mac,
        ))
    }

    /// Verify and decrypt `envelope`, then deserialise the plaintext.
    ///
    /// # Errors
    ///
    /// - [`CryptError::EnvelopeMalformed`] if a field does not decode or the IV
    ///   has the wrong length for the named cipher.
    /// - [`CryptError::UnsupportedAlgorithm`] if the named cipher is unknown.
    /// - [`CryptError::MacMismatch`] if the tag does not verify under `key`,
    ///   or if an AEAD cipher rejects the IV/ciphertext pair.
    /// - [`CryptError::Cipher`] or [`CryptError::Codec`] if the verified
    ///   payload cannot be decrypted or deserialised.
    pub fn decrypt<T: DeserializeOwned>(
        &self,
        envelope: &Envelope,
        key: &[u8],
    ) -> Result<T, CryptError> {
        let plaintext = self.decrypt_bytes(envelope, key)?;
        self.codec.deserialize(&plaintext)
    }

    /// Verify and decrypt `envelope`, returning the exact plaintext bytes.
    pub fn decrypt_bytes(&self, envelope: &Envelope, key: &[u8]) -> Result<Vec<u8>, CryptError> {
        let decoded = envelope.decode().inspect_err(|e| {
            warn!(error = %e, "invalid envelope passed to decrypt");
        })?;
        self.open_decoded(envelope, &decoded, key)
    }

    fn open_decoded(
        &self,
        envelope: &Envelope,
        decoded: &DecodedEnvelope,
        key: &[u8],
    ) -> Result<Vec<u8>, CryptError> {
        let cipher = self.ciphers.resolve(&envelope.algo, &envelope.mode)?;
        if decoded.iv.len() != cipher.iv_size() {
            let e = CryptError::EnvelopeMalformed(format!(
                "iv: expected {} bytes, got {}",
                cipher.iv_size(),
                decoded.iv.len()
            ));
            warn!(error = %e, "invalid envelope passed to decrypt");
            return Err(e);
        }

        let expected = compute_tag(&decoded.cdata, key)?;
        if !bool::from(expected.as_slice().ct_eq(decoded.mac.as_slice())) {
            warn!(algo = %envelope.algo, mode = %envelope.mode, "message authentication code invalid");
            return Err(CryptError::MacMismatch);
        }

        let plaintext = cipher
            .decrypt(&decoded.cdata, key, &decoded.iv)
            .inspect_err(|e| {
                warn!(algo = %envelope.algo, mode = %envelope.mode, error = %e, "decryption failed");
            })?;
        debug!(
            algo = cipher.algorithm(),
            mode = cipher.mode(),
            plaintext_len = plaintext.len(),
            "envelope opened"
        );
        Ok(plaintext)
    }

    /// [`Sealer::encrypt`] followed by [`Envelope::to_json`].
    pub fn seal<T: Serialize + ?Sized>(&self, data: &T, key: &[u8]) -> Result<String, CryptError> {
        self.encrypt(data, key)?.to_json()
    }

    /// [`Envelope::parse`] followed by [`Sealer::decrypt`]. The binary fields
    /// are decoded once.
    pub fn open<T: DeserializeOwned>(&self, wire: &str, key: &[u8]) -> Result<T, CryptError> {
        let (envelope, decoded) = Envelope::parse(wire).inspect_err(|e| {
            warn!(error = %e, "invalid data passed to open");
        })?;
        let plaintext = self.open_decoded(&envelope, &decoded, key)?;
        self.codec.deserialize(&plaintext)
    }
}

impl<C> std::fmt::Debug for Sealer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sealer")
            .field("config", &self.config)
            .field("ciphers", &self.ciphers)
            .finish_non_exhaustive()
    }
}

fn check_key(cipher: &dyn Cipher, key: &[u8]) -> Result<(), CryptError> {
    cipher.key_sizes().check(key.len()).inspect_err(|e| {
        warn!(
            algo = cipher.algorithm(),
            mode = cipher.mode(),
            error = %e,
            "key rejected"
        );
    })
}
