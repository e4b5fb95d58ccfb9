//! Self-describing authenticated encryption envelopes.
//!
//! - [`kdf`]: PBKDF2 (RFC 2898) over HMAC-SHA1/SHA256/SHA512.
//! - [`crypto`]: the [`Cipher`] capability and built-in AES ciphers.
//! - [`rng`] / [`codec`]: the random source and data codec capabilities.
//! - [`sealer`]: [`Sealer`], which ties them together into [`Envelope`]s.
//!
//! ```no_run
//! use envelope::{Sealer, SealerConfig};
//!
//! let sealer = Sealer::new(SealerConfig::default())?;
//! let key = [0x42u8; 32];
//! let wire = sealer.seal(&vec!["a", "b"], &key)?;
//! let back: Vec<String> = sealer.open(&wire, &key)?;
//! assert_eq!(back, ["a", "b"]);
//! # Ok::<(), envelope::CryptError>(())
//! ```

pub mod codec;
pub mod config;
pub mod crypto;
pub mod kdf;
pub mod rng;
pub mod sealer;

pub use codec::{DataCodec, JsonCodec};
pub use common::{CryptError, DecodedEnvelope, Envelope};
pub use config::SealerConfig;
pub use crypto::{Cipher, CipherRegistry, KeySizes};
pub use kdf::{derive, max_output_len, HashPrimitive};
pub use rng::{OsRandom, RandomSource};
pub use sealer::{compute_tag, Sealer};
