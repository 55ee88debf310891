//! Normalized cache keys derived from raw query text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// Key for cache lookups, derived from lowercased and trimmed SQL text.
///
/// Only case and surrounding whitespace are normalized. Internal whitespace and
/// token order are significant, so `SELECT  1` and `SELECT 1` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Create a cache key from SQL text
    pub fn from_query(query: &str) -> Self {
        let normalized = query.to_lowercase();
        Self(STANDARD.encode(normalized.trim()))
    }

    /// Encoded key text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the normalized query text the key was built from
    pub fn decode(&self) -> Option<String> {
        STANDARD
            .decode(&self.0)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode query text into its normalized key string
pub fn encode(query: &str) -> String {
    CacheKey::from_query(query).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_surrounding_whitespace_ignored() {
        let key1 = CacheKey::from_query("SELECT * FROM users");
        let key2 = CacheKey::from_query("  select * from USERS\n");
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_internal_whitespace_is_significant() {
        assert_ne!(encode("SELECT  1"), encode("SELECT 1"));
        assert_ne!(encode("SELECT a, b"), encode("SELECT b, a"));
    }

    #[test]
    fn test_empty_query_encodes() {
        assert_eq!(encode(""), "");
        assert_eq!(encode("   "), encode(""));
    }

    #[test]
    fn test_key_is_reversible() {
        let key = CacheKey::from_query("  SELECT Name FROM Customers ");
        assert_eq!(key.decode().as_deref(), Some("select name from customers"));
    }

    #[test]
    fn test_non_ascii_queries_encode() {
        let key = CacheKey::from_query("SELECT 'Ünïcödé'");
        assert_eq!(key.decode().as_deref(), Some("select 'ünïcödé'"));
    }
}
