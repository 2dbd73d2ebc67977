//! ETag fingerprints and conditional-request evaluation.
//!
//! Fingerprints are hex SHA-256 digests over a canonical serialized form, so
//! a resource's tag is stable across serialization and store-iteration order.
//! Validation is used only on safe (read) methods; writes never consult it.

use scoreboard_core::{content_hash, ScoreResult};

/// Compute the fingerprint for a single result.
///
/// Hashes `ScoreResult::canonical_form()`; two results with identical
/// client-visible fields always get identical tags.
pub fn fingerprint(result: &ScoreResult) -> String {
    content_hash(result.canonical_form().as_bytes())
}

/// Compute the fingerprint for a collection.
///
/// Members are ordered ascending by id before hashing so the same logical
/// collection yields the same tag regardless of how the store iterated.
pub fn collection_fingerprint(results: &[ScoreResult]) -> String {
    let mut ordered: Vec<&ScoreResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.id);

    let mut canonical = String::new();
    for result in ordered {
        canonical.push_str(&result.canonical_form());
        canonical.push('\n');
    }
    content_hash(canonical.as_bytes())
}

/// Parse an `If-None-Match` header value into the client's tag set.
///
/// Accepts a comma-separated list; strips surrounding quotes and weak (`W/`)
/// prefixes. The wildcard `*` is kept as-is.
pub fn parse_client_tags(header: &str) -> Vec<String> {
    header
        .split(',')
        .map(|tag| {
            let tag = tag.trim();
            let tag = tag.strip_prefix("W/").unwrap_or(tag);
            tag.trim_matches('"').to_string()
        })
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// True when the client already holds the current representation: the tag
/// list contains the fingerprint or the wildcard `*`.
pub fn matches(fingerprint: &str, client_tags: &[String]) -> bool {
    client_tags
        .iter()
        .any(|tag| tag == fingerprint || tag == "*")
}
