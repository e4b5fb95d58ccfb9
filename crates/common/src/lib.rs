//! Envelope wire types and errors shared across the sealed-envelope crates.

pub mod error;
pub mod protocol;

pub use error::CryptError;
pub use protocol::{DecodedEnvelope, Envelope};
