//! AES-GCM-SIV (`aes-gcm-siv` / `siv`), RFC 8452.
//!
//! Nonce-misuse-resistant AEAD. The ciphertext carries its own 16-byte
//! authentication tag in addition to the envelope tag, and the nonce is the
//! envelope IV. Key length selects AES-128 or AES-256.

use aes_gcm_siv::{
    aead::{Aead, KeyInit},
    Aes128GcmSiv, Aes256GcmSiv, Nonce,
};
use common::CryptError;

use super::cipher::{Cipher, KeySizes};

pub const ALGORITHM: &str = "aes-gcm-siv";
pub const MODE: &str = "siv";

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Length of the AEAD tag appended to every ciphertext.
pub const AEAD_TAG_LEN: usize = 16;

#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmSiv;

impl AesGcmSiv {
    fn nonce<'a>(&self, iv: &'a [u8]) -> Result<&'a Nonce, CryptError> {
        if iv.len() != NONCE_LEN {
            return Err(CryptError::Cipher(format!(
                "invalid nonce length: expected {NONCE_LEN} bytes, got {}",
                iv.len()
            )));
        }
        Ok(Nonce::from_slice(iv))
    }
}

impl Cipher for AesGcmSiv {
    fn algorithm(&self) -> &'static str {
        ALGORITHM
    }

    fn mode(&self) -> &'static str {
        MODE
    }

    fn key_sizes(&self) -> KeySizes {
        KeySizes::OneOf(vec![16, 32])
    }

    fn iv_size(&self) -> usize {
        NONCE_LEN
    }

    fn encrypt(&self, plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptError> {
        self.key_sizes().check(key.len())?;
        let nonce = self.nonce(iv)?;
        let sealed = match key.len() {
            16 => build::<Aes128GcmSiv>(key)?.encrypt(nonce, plaintext),
            _ => build::<Aes256GcmSiv>(key)?.encrypt(nonce, plaintext),
        };
        sealed.map_err(|_| CryptError::Cipher("aead encryption failed".into()))
    }

    fn decrypt(&self, ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptError> {
        self.key_sizes().check(key.len())?;
        let nonce = self.nonce(iv)?;
        let opened = match key.len() {
            16 => build::<Aes128GcmSiv>(key)?.decrypt(nonce, ciphertext),
            _ => build::<Aes256GcmSiv>(key)?.decrypt(nonce, ciphertext),
        };
        // An AEAD tag failure is an integrity failure like any other.
        opened.map_err(|_| CryptError::MacMismatch)
    }
}

fn build<A: KeyInit>(key: &[u8]) -> Result<A, CryptError> {
    A::new_from_slice(key).map_err(|_| CryptError::KeySizeInvalid {
        actual: key.len(),
        allowed: AesGcmSiv.key_sizes().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_round_trip() {
        for len in [16, 32] {
            let key = vec![0x42u8; len];
            let nonce = [7u8; NONCE_LEN];
            let ct = AesGcmSiv.encrypt(b"123-45-6789", &key, &nonce).unwrap();
            assert_eq!(ct.len(), 11 + AEAD_TAG_LEN);
            assert_eq!(AesGcmSiv.decrypt(&ct, &key, &nonce).unwrap(), b"123-45-6789");
        }
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let nonce = [0u8; NONCE_LEN];
        let ct = AesGcmSiv.encrypt(b"secret", &[1u8; 32], &nonce).unwrap();
        assert_eq!(
            AesGcmSiv.decrypt(&ct, &[2u8; 32], &nonce),
            Err(CryptError::MacMismatch)
        );
    }

    #[test]
    fn invalid_key_length_rejected() {
        assert!(matches!(
            AesGcmSiv.encrypt(b"x", &[0u8; 24], &[0u8; NONCE_LEN]),
            Err(CryptError::KeySizeInvalid { actual: 24, .. })
        ));
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let key = [9u8; 32];
        let nonce = [3u8; NONCE_LEN];
        let mut ct = AesGcmSiv.encrypt(b"tamper me", &key, &nonce).unwrap();
        ct[0] ^= 0xFF;
        assert_eq!(
            AesGcmSiv.decrypt(&ct, &key, &nonce),
            Err(CryptError::MacMismatch)
        );
    }

    #[test]
    fn tampered_nonce_fails_auth() {
        let key = [9u8; 32];
        let mut nonce = [3u8; NONCE_LEN];
        let ct = AesGcmSiv.encrypt(b"tamper me", &key, &nonce).unwrap();
        nonce[0] ^= 1;
        assert_eq!(
            AesGcmSiv.decrypt(&ct, &key, &nonce),
            Err(CryptError::MacMismatch)
        );
    }

    #[test]
    fn short_nonce_is_a_cipher_error() {
        assert!(matches!(
            AesGcmSiv.decrypt(&[0u8; 32], &[9u8; 32], &[0u8; 8]),
            Err(CryptError::Cipher(_))
        ));
    }
}
