//! Hash key derivation for audit record indexes
//!
//! Audit records are stored under two digests: one of `(service_id, org_id)`
//! for the partition key and one of `(org_id, obo_id)` for the secondary
//! index. Any writer or reader presented with the same identifiers must
//! arrive at the same key, so derivation is deterministic and sensitive to
//! item order. The digest is an index key, not a secret.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::errors::DomainError;

/// Separator placed between items when deriving audit index keys
pub const KEY_SEPARATOR: &str = "|";

/// Lowercase hexadecimal digest used as a store key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashKey(String);

impl HashKey {
    /// Wraps a digest read back from storage
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Returns the digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Partition key of the audit table: `derive("|", [service_id, org_id])`
    pub fn service_org(service_id: &str, org_id: &str) -> Self {
        digest(KEY_SEPARATOR, service_id, &[org_id])
    }

    /// Secondary index key of the audit table: `derive("|", [org_id, obo_id])`
    pub fn org_user(org_id: &str, obo_id: &str) -> Self {
        digest(KEY_SEPARATOR, org_id, &[obo_id])
    }
}

impl Display for HashKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Digests `items` joined by `separator`
///
/// # Errors
///
/// Returns `DomainError::EmptyHashInput` when `items` is empty.
///
/// # Example
///
/// ```
/// use zenaudit_core::domain::hash_key::derive;
///
/// let a = derive("|", &["svc", "org"]).unwrap();
/// let b = derive("|", &["org", "svc"]).unwrap();
/// assert_ne!(a, b);
/// assert_eq!(a.as_str().len(), 64);
/// ```
pub fn derive<S: AsRef<str>>(separator: &str, items: &[S]) -> Result<HashKey, DomainError> {
    let (first, rest) = items.split_first().ok_or(DomainError::EmptyHashInput)?;
    Ok(digest(separator, first.as_ref(), rest))
}

/// Digests `first` followed by each of `rest`, each preceded by `separator`
fn digest<S: AsRef<str>>(separator: &str, first: &str, rest: &[S]) -> HashKey {
    let mut hasher = Sha256::new();
    hasher.update(first.as_bytes());
    for item in rest {
        hasher.update(separator.as_bytes());
        hasher.update(item.as_ref().as_bytes());
    }
    HashKey(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_rejects_empty_input() {
        let items: [&str; 0] = [];
        assert_eq!(derive("|", &items), Err(DomainError::EmptyHashInput));
    }

    #[test]
    fn test_derive_is_deterministic() {
        let a = derive("|", &["service-1", "org-1"]).unwrap();
        let b = derive("|", &["service-1".to_string(), "org-1".to_string()]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_is_order_sensitive() {
        let a = derive("|", &["service-1", "org-1"]).unwrap();
        let b = derive("|", &["org-1", "service-1"]).unwrap();
        assert_ne!(a, b);

        let c = derive("|", &["a", "b", "c"]).unwrap();
        let d = derive("|", &["a", "c", "b"]).unwrap();
        assert_ne!(c, d);
    }

    #[test]
    fn test_derive_hashes_every_item() {
        // Every item contributes, not only the last one
        let a = derive("|", &["x", "shared"]).unwrap();
        let b = derive("|", &["y", "shared"]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_derive_matches_joined_digest() {
        let key = derive("|", &["svc", "org", "user"]).unwrap();

        let mut hasher = Sha256::new();
        hasher.update(b"svc|org|user");
        assert_eq!(key.as_str(), format!("{:x}", hasher.finalize()));
    }

    #[test]
    fn test_derive_single_item_has_no_separator() {
        let key = derive("|", &["only"]).unwrap();

        let mut hasher = Sha256::new();
        hasher.update(b"only");
        assert_eq!(key.as_str(), format!("{:x}", hasher.finalize()));
    }

    #[test]
    fn test_separator_changes_digest() {
        let a = derive("|", &["a", "b"]).unwrap();
        let b = derive(":", &["a", "b"]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_pair_helpers_match_derive() {
        assert_eq!(
            HashKey::service_org("svc", "org"),
            derive(KEY_SEPARATOR, &["svc", "org"]).unwrap()
        );
        assert_eq!(
            HashKey::org_user("org", "u1"),
            derive(KEY_SEPARATOR, &["org", "u1"]).unwrap()
        );
    }

    #[test]
    fn test_pair_helpers_join_like_derive() {
        // "a|b" + "c" and "a" + "b|c" join to the same bytes
        assert_eq!(
            HashKey::org_user("a|b", "c"),
            derive(KEY_SEPARATOR, &["a", "b|c"]).unwrap()
        );
        assert_eq!(
            HashKey::service_org("svc", "org"),
            derive(KEY_SEPARATOR, &["svc".to_string(), "org".to_string()]).unwrap()
        );
    }

    #[test]
    fn test_digest_is_lowercase_hex() {
        let key = HashKey::org_user("org", "u1");
        assert_eq!(key.as_str().len(), 64);
        assert!(key
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
