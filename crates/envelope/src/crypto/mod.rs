//! Cipher capabilities consumed by the envelope layer.
//!
//! This module knows nothing about envelopes or tags. It provides the
//! [`Cipher`] trait, the [`KeySizes`] constraint and the built-in ciphers:
//!
//! | algo           | mode  | key sizes    | IV  |
//! |----------------|-------|--------------|-----|
//! | `rijndael-128` | `ctr` | 16, 24, 32   | 16  |
//! | `aes-gcm-siv`  | `siv` | 16, 32       | 12  |

pub mod aes_ctr;
pub mod cipher;
pub mod gcm_siv;
pub mod registry;

pub use aes_ctr::AesCtr;
pub use cipher::{Cipher, KeySizes};
pub use gcm_siv::AesGcmSiv;
pub use registry::CipherRegistry;
