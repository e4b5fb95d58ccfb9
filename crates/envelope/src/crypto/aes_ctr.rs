//! AES in counter mode (`rijndael-128` / `ctr`).
//!
//! The 16-byte IV is the initial counter block, incremented as a 128-bit
//! big-endian integer. CTR provides no integrity on its own; the envelope tag
//! covers that. **Never reuse an IV with the same key.**

use aes::{Aes128, Aes192, Aes256};
use common::CryptError;
use ctr::cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;

use super::cipher::{Cipher, KeySizes};

pub const ALGORITHM: &str = "rijndael-128";
pub const MODE: &str = "ctr";

/// AES block size, which is also the counter block / IV size.
pub const IV_LEN: usize = 16;

/// AES-128/192/256 selected by key length.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesCtr;

impl AesCtr {
    fn apply(&self, data: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptError> {
        self.key_sizes().check(key.len())?;
        if iv.len() != IV_LEN {
            return Err(CryptError::Cipher(format!(
                "invalid IV length: expected {IV_LEN} bytes, got {}",
                iv.len()
            )));
        }

        let mut buf = data.to_vec();
        let applied = match key.len() {
            16 => Ctr128BE::<Aes128>::new_from_slices(key, iv)
                .map(|mut cipher| cipher.apply_keystream(&mut buf)),
            24 => Ctr128BE::<Aes192>::new_from_slices(key, iv)
                .map(|mut cipher| cipher.apply_keystream(&mut buf)),
            _ => Ctr128BE::<Aes256>::new_from_slices(key, iv)
                .map(|mut cipher| cipher.apply_keystream(&mut buf)),
        };
        applied.map_err(|e| CryptError::Cipher(e.to_string()))?;
        Ok(buf)
    }
}

impl Cipher for AesCtr {
    fn algorithm(&self) -> &'static str {
        ALGORITHM
    }

    fn mode(&self) -> &'static str {
        MODE
    }

    fn key_sizes(&self) -> KeySizes {
        KeySizes::OneOf(vec![16, 24, 32])
    }

    fn iv_size(&self) -> usize {
        IV_LEN
    }

    fn encrypt(&self, plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptError> {
        self.apply(plaintext, key, iv)
    }

    fn decrypt(&self, ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptError> {
        self.apply(ciphertext, key, iv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // NIST SP 800-38A F.5.1, first block.
    #[test]
    fn aes128_ctr_known_answer() {
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv = hex::decode("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff").unwrap();
        let pt = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
        let ct = AesCtr.encrypt(&pt, &key, &iv).unwrap();
        assert_eq!(hex::encode(ct), "874d6191b620e3261bef6864990db6ce");
    }

    #[test]
    fn round_trip_every_key_size() {
        for len in [16, 24, 32] {
            let key = vec![0x5a; len];
            let iv = [0x01; IV_LEN];
            let ct = AesCtr.encrypt(b"counter mode", &key, &iv).unwrap();
            assert_ne!(&ct[..], b"counter mode");
            assert_eq!(AesCtr.decrypt(&ct, &key, &iv).unwrap(), b"counter mode");
        }
    }

    #[test]
    fn rejects_bad_key_length() {
        assert!(matches!(
            AesCtr.encrypt(b"x", &[0u8; 20], &[0u8; IV_LEN]),
            Err(CryptError::KeySizeInvalid { actual: 20, .. })
        ));
    }

    #[test]
    fn rejects_bad_iv_length() {
        assert!(matches!(
            AesCtr.encrypt(b"x", &[0u8; 16], &[0u8; 8]),
            Err(CryptError::Cipher(_))
        ));
    }

    #[test]
    fn ciphertext_length_equals_plaintext_length() {
        let ct = AesCtr.encrypt(&[0u8; 37], &[1u8; 32], &[2u8; IV_LEN]).unwrap();
        assert_eq!(ct.len(), 37);
    }
}
