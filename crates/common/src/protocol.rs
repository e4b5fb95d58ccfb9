//! The envelope wire type.
//!
//! An envelope is serialised as a JSON object with exactly five fields:
//!
//! ```text
//! {"algo": "...", "mode": "...", "iv": "<b64>", "cdata": "<b64>", "mac": "<b64>"}
//! ```
//!
//! Binary fields use standard, padded base64. Field order is irrelevant.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::CryptError;

/// Self-describing container for one encrypted payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Cipher algorithm identifier (e.g. `"rijndael-128"`).
    pub algo: String,
    /// Cipher mode identifier (e.g. `"ctr"`).
    pub mode: String,
    /// Base64 initialisation vector.
    pub iv: String,
    /// Base64 ciphertext.
    pub cdata: String,
    /// Base64 integrity tag.
    pub mac: String,
}

/// The binary fields of an [`Envelope`], decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEnvelope {
    pub iv: Vec<u8>,
    pub cdata: Vec<u8>,
    pub mac: Vec<u8>,
}

impl Envelope {
    /// Build an envelope from raw parts, encoding the binary fields.
    pub fn new(
        algo: impl Into<String>,
        mode: impl Into<String>,
        iv: &[u8],
        cdata: &[u8],
        mac: &[u8],
    ) -> Self {
        Self {
            algo: algo.into(),
            mode: mode.into(),
            iv: STANDARD.encode(iv),
            cdata: STANDARD.encode(cdata),
            mac: STANDARD.encode(mac),
        }
    }

    /// Parse the JSON wire form, keeping only the envelope.
    ///
    /// Use [`Envelope::parse`] when the decoded fields are needed too.
    ///
    /// # Errors
    ///
    /// See [`Envelope::parse`].
    pub fn from_json(s: &str) -> Result<Self, CryptError> {
        Self::parse(s).map(|(envelope, _)| envelope)
    }

    /// Parse the JSON wire form and decode its binary fields.
    ///
    /// # Errors
    ///
    /// Returns [`CryptError::EnvelopeMalformed`] if the input is not a JSON
    /// object with exactly the five envelope fields, or if any field fails
    /// [`Envelope::decode`].
    pub fn parse(s: &str) -> Result<(Self, DecodedEnvelope), CryptError> {
        let envelope: Envelope = serde_json::from_str(s)
            .map_err(|e| CryptError::EnvelopeMalformed(e.to_string()))?;
        let decoded = envelope.decode()?;
        Ok((envelope, decoded))
    }

    /// Render the JSON wire form.
    pub fn to_json(&self) -> Result<String, CryptError> {
        serde_json::to_string(self).map_err(|e| CryptError::Codec(e.to_string()))
    }

    /// Decode the binary fields.
    ///
    /// # Errors
    ///
    /// Returns [`CryptError::EnvelopeMalformed`] if `algo` or `mode` is empty
    /// or if `iv`, `cdata` or `mac` is not valid base64.
    pub fn decode(&self) -> Result<DecodedEnvelope, CryptError> {
        if self.algo.is_empty() {
            return Err(CryptError::EnvelopeMalformed("empty algo".into()));
        }
        if self.mode.is_empty() {
            return Err(CryptError::EnvelopeMalformed("empty mode".into()));
        }
        Ok(DecodedEnvelope {
            iv: decode_field("iv", &self.iv)?,
            cdata: decode_field("cdata", &self.cdata)?,
            mac: decode_field("mac", &self.mac)?,
        })
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, CryptError> {
    STANDARD
        .decode(value)
        .map_err(|e| CryptError::EnvelopeMalformed(format!("{name}: {e}")))
}
