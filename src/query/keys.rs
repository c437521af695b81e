//! Cache keys for every backend operation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::json;

use super::QueryKey;
use crate::api::{ListParams, SearchParams};

#[must_use]
pub fn recommended(params: &ListParams) -> QueryKey {
    QueryKey::from_parts(&json!(["posts", "recommended", params]))
}

#[must_use]
pub fn most_liked(params: &ListParams) -> QueryKey {
    QueryKey::from_parts(&json!(["posts", "most-liked", params]))
}

#[must_use]
pub fn search(params: &SearchParams) -> QueryKey {
    QueryKey::from_parts(&json!(["posts", "search", params]))
}

#[must_use]
pub fn detail(id: u64) -> QueryKey {
    QueryKey::from_parts(&json!(["posts", "detail", id]))
}

#[must_use]
pub fn comments(id: u64) -> QueryKey {
    QueryKey::from_parts(&json!(["posts", "comments", id]))
}

/// Key for the current user, scoped to the session token.
///
/// The cache is shared by every visitor, so the key carries a fingerprint
/// of the token rather than the token itself.
#[must_use]
pub fn me(token: &str) -> QueryKey {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    QueryKey::from_parts(&json!(["auth", "me", format!("{:016x}", hasher.finish())]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommended_key_shape() {
        let key = recommended(&ListParams::new(5, 2));
        assert_eq!(key.as_str(), r#"["posts","recommended",{"limit":5,"page":2}]"#);
    }

    #[test]
    fn test_search_key_includes_query() {
        let params = SearchParams {
            query: "rust".to_string(),
            list: ListParams::new(5, 1),
        };
        let key = search(&params);
        assert!(key.as_str().starts_with(r#"["posts","search",{"#));
        assert!(key.as_str().contains(r#""query":"rust""#));
        assert!(key.as_str().contains(r#""page":1"#));
    }

    #[test]
    fn test_keys_differ_by_parameters() {
        assert_ne!(
            recommended(&ListParams::new(5, 1)),
            recommended(&ListParams::new(5, 2))
        );
        assert_ne!(detail(1), comments(1));
        assert_ne!(me("a"), me("b"));
        assert!(!me("secret-token").as_str().contains("secret-token"));
    }
}
