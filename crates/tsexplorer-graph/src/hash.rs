//! Content addressing for files and syntax nodes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

/// Lowercase hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

/// Identity of a source file: `sha256(path ":" content)`.
pub type FileHash = ContentHash;

/// Identity of a syntax node: `sha256(kind ":" text ":" start ":" end)`.
pub type NodeHash = ContentHash;

impl ContentHash {
    fn digest(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for (index, part) in parts.iter().enumerate() {
            if index > 0 {
                hasher.update(b":");
            }
            hasher.update(part);
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hash a file by its path and contents.
///
/// The path is part of the identity, so two files with identical contents
/// at different locations are distinct.
pub fn hash_file(path: &Path, content: &str) -> FileHash {
    let path = path.to_string_lossy();
    ContentHash::digest(&[path.as_bytes(), content.as_bytes()])
}

/// Hash a syntax node by kind, source text and byte offsets.
pub fn hash_node(kind: &str, text: &str, start: u32, end: u32) -> NodeHash {
    let start = start.to_string();
    let end = end.to_string();
    ContentHash::digest(&[
        kind.as_bytes(),
        text.as_bytes(),
        start.as_bytes(),
        end.as_bytes(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_file_is_hex_sha256() {
        let hash = hash_file(Path::new("/src/a.ts"), "export {}");
        assert_eq!(hash.as_str().len(), 64);
        assert!(hash.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_file_matches_joined_digest() {
        let expected = format!("{:x}", Sha256::digest(b"/src/a.ts:const a = 1;"));
        let hash = hash_file(Path::new("/src/a.ts"), "const a = 1;");
        assert_eq!(hash.as_str(), expected);
    }

    #[test]
    fn test_same_content_different_path() {
        let a = hash_file(Path::new("/src/a.ts"), "export const x = 1;");
        let b = hash_file(Path::new("/src/b.ts"), "export const x = 1;");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_node_depends_on_offsets() {
        let first = hash_node("Identifier", "x", 0, 1);
        let second = hash_node("Identifier", "x", 10, 11);
        assert_ne!(first, second);
        assert_eq!(first, hash_node("Identifier", "x", 0, 1));
    }

    #[test]
    fn test_hash_node_matches_joined_digest() {
        let expected = format!("{:x}", Sha256::digest(b"NumericLiteral:42:8:10"));
        assert_eq!(hash_node("NumericLiteral", "42", 8, 10).as_str(), expected);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let hash = hash_node("Program", "", 0, 0);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash));
    }
}
