//! Key derivation: PBKDF2 over HMAC with a runtime-selected hash.
//!
//! [`derive`] is a pure function. The envelope layer also uses it as its tag
//! function (see [`crate::sealer::compute_tag`]).

pub mod pbkdf2;

use std::fmt;
use std::str::FromStr;

use common::CryptError;
use hmac::Hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha512};

pub use self::pbkdf2::{max_output_len_for, pbkdf2, MAX_BLOCKS};

/// Hash function underlying the HMAC pseudo-random function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashPrimitive {
    Sha1,
    #[default]
    Sha256,
    Sha512,
}

impl HashPrimitive {
    /// Digest output size in bytes (`hLen`).
    pub const fn output_len(self) -> usize {
        match self {
            HashPrimitive::Sha1 => 20,
            HashPrimitive::Sha256 => 32,
            HashPrimitive::Sha512 => 64,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            HashPrimitive::Sha1 => "sha1",
            HashPrimitive::Sha256 => "sha256",
            HashPrimitive::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashPrimitive {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(HashPrimitive::Sha1),
            "sha256" => Ok(HashPrimitive::Sha256),
            "sha512" => Ok(HashPrimitive::Sha512),
            other => Err(format!("unknown hash primitive: {other}")),
        }
    }
}

/// Maximum derived-key length PBKDF2 allows with `hash`.
pub fn max_output_len(hash: HashPrimitive) -> u64 {
    max_output_len_for(hash.output_len())
}

/// PBKDF2-HMAC-`hash`.
///
/// # Errors
///
/// See [`pbkdf2()`].
pub fn derive(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    output_len: usize,
    hash: HashPrimitive,
) -> Result<Vec<u8>, CryptError> {
    match hash {
        HashPrimitive::Sha1 => pbkdf2::<Hmac<Sha1>>(password, salt, iterations, output_len),
        HashPrimitive::Sha256 => pbkdf2::<Hmac<Sha256>>(password, salt, iterations, output_len),
        HashPrimitive::Sha512 => pbkdf2::<Hmac<Sha512>>(password, salt, iterations, output_len),
    }
}
