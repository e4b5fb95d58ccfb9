//! Structured-data codec: turns caller data into the plaintext bytes that get
//! encrypted, and back.

use common::CryptError;
use serde::{de::DeserializeOwned, Serialize};

/// Serialises arbitrary data to bytes and back.
///
/// Implementations must be total over the data they accept: whatever
/// `serialize` produced, `deserialize` must accept unchanged.
pub trait DataCodec: Send + Sync {
    fn serialize<T: Serialize + ?Sized>(&self, data: &T) -> Result<Vec<u8>, CryptError>;

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CryptError>;
}

/// JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl DataCodec for JsonCodec {
    fn serialize<T: Serialize + ?Sized>(&self, data: &T) -> Result<Vec<u8>, CryptError> {
        serde_json::to_vec(data).map_err(|e| CryptError::Codec(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CryptError> {
        serde_json::from_slice(bytes).map_err(|e| CryptError::Codec(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: u64,
        tags: Vec<String>,
    }

    #[test]
    fn struct_round_trip() {
        let rec = Record {
            id: 7,
            tags: vec!["a".into(), "b".into()],
        };
        let bytes = JsonCodec.serialize(&rec).unwrap();
        let back: Record = JsonCodec.deserialize(&bytes).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn unsized_input() {
        let bytes = JsonCodec.serialize("plain str").unwrap();
        assert_eq!(bytes, b"\"plain str\"");
    }

    #[test]
    fn non_string_map_keys_are_a_codec_error() {
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1);
        assert!(matches!(
            JsonCodec.serialize(&map),
            Err(CryptError::Codec(_))
        ));
    }

    #[test]
    fn garbage_is_a_codec_error() {
        assert!(matches!(
            JsonCodec.deserialize::<Record>(b"\x00\xff not json"),
            Err(CryptError::Codec(_))
        ));
    }
}
