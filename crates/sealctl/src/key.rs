//! [`KeyMaterial`]: owned key bytes that are wiped on drop and never printed.

/// Symmetric key bytes read from configuration.
///
/// When this type is dropped, the memory is overwritten with zeroes to
/// shorten the window during which key material lives in RAM.
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        write!(f, "KeyMaterial([REDACTED; {}])", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_in_debug() {
        let key = KeyMaterial::new(vec![0xFF; 16]);
        let dbg = format!("{key:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("255"));
    }

    #[test]
    fn exposes_bytes() {
        let key = KeyMaterial::new(vec![1, 2, 3]);
        assert_eq!(key.as_bytes(), &[1, 2, 3]);
    }
}
