//! Request fingerprints used as cache keys

use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 over a request's ordered key parts
///
/// Parts are raw bytes, so bodies that are not valid UTF-8 keep every byte.
/// Each part is prefixed with its byte length before hashing, so no two
/// different part sequences feed the hash the same bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut hasher = Sha256::new();
        for part in parts {
            let bytes = part.as_ref();
            hasher.update((bytes.len() as u64).to_be_bytes());
            hasher.update(bytes);
        }
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex digest, used as the cache file name
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = Fingerprint::of(["AdGroupAdService", "get", "<selector/>"]);
        let b = Fingerprint::of(vec!["AdGroupAdService".to_string(), "get".into(), "<selector/>".into()]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_part_boundaries_matter() {
        let joined = Fingerprint::of(["a-b"]);
        let split = Fingerprint::of(["a", "b"]);
        let longer = Fingerprint::of(["a", "bb"]);
        let shifted = Fingerprint::of(["ab", "b"]);
        assert_ne!(joined, split);
        assert_ne!(split, longer);
        assert_ne!(longer, shifted);
        assert_ne!(Fingerprint::of(["a"]), Fingerprint::of(["a", ""]));
    }

    #[test]
    fn test_non_utf8_parts_keep_every_byte() {
        let a = Fingerprint::of([b"get".to_vec(), vec![b'<', 0xff, b'>']]);
        let b = Fingerprint::of([b"get".to_vec(), vec![b'<', 0xfe, b'>']]);
        assert_ne!(a, b);
        assert_eq!(Fingerprint::of([b"get".to_vec()]), Fingerprint::of(["get"]));
    }

    #[test]
    fn test_hex_is_lowercase_sha256_width() {
        let hex = Fingerprint::of(["x"]).to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(Fingerprint::of(["x"]).to_string(), hex);
    }
}
