//! Property-Based Tests for Entity Tags
//!
//! A resource fingerprint must be stable for identical state, must change
//! when any canonical field changes, and the `If-None-Match` matcher must
//! honor quoting, weak prefixes, and the wildcard.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use scoreboard_api::etag;
use scoreboard_core::{RoleTag, ScoreResult, User};
use std::collections::BTreeSet;

// ============================================================================
// STRATEGIES
// ============================================================================

fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}@[a-z]{1,8}\\.com"
}

fn result_strategy() -> impl Strategy<Value = ScoreResult> {
    (1i64..10_000, any::<i64>(), email_strategy(), 0i64..4_000_000_000).prop_map(
        |(id, value, email, secs)| {
            let user = User::new(1, email, BTreeSet::from([RoleTag::User]), "digest");
            let time = Utc.timestamp_opt(secs, 0).single().unwrap();
            ScoreResult {
                id,
                result: value,
                user,
                time,
            }
        },
    )
}

// ============================================================================
// RESOURCE FINGERPRINTS
// ============================================================================

proptest! {
    /// Identical state always hashes to the same 64-char lowercase hex tag.
    #[test]
    fn prop_fingerprint_is_stable_hex(result in result_strategy()) {
        let first = etag::fingerprint(&result);
        let second = etag::fingerprint(&result);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 64);
        prop_assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// Changing the score value changes the tag.
    #[test]
    fn prop_fingerprint_tracks_value(result in result_strategy(), delta in 1i64..1000) {
        let mut changed = result.clone();
        changed.result = result.result.wrapping_add(delta);
        prop_assert_ne!(etag::fingerprint(&result), etag::fingerprint(&changed));
    }

    /// Changing the timestamp by a whole second changes the tag.
    #[test]
    fn prop_fingerprint_tracks_time(result in result_strategy()) {
        let mut changed = result.clone();
        changed.time = result.time + chrono::Duration::seconds(1);
        prop_assert_ne!(etag::fingerprint(&result), etag::fingerprint(&changed));
    }

    /// Two resources with different ids never share a tag.
    #[test]
    fn prop_fingerprint_tracks_identity(result in result_strategy()) {
        let mut changed = result.clone();
        changed.id = result.id + 1;
        prop_assert_ne!(etag::fingerprint(&result), etag::fingerprint(&changed));
    }

    /// Its own fingerprint always satisfies the conditional check, in every
    /// client spelling.
    #[test]
    fn prop_own_tag_always_matches(result in result_strategy()) {
        let tag = etag::fingerprint(&result);
        for spelling in [
            tag.clone(),
            format!("\"{}\"", tag),
            format!("W/\"{}\"", tag),
            format!("\"bogus\", {}", tag),
            "*".to_string(),
        ] {
            let parsed = etag::parse_client_tags(&spelling);
            prop_assert!(etag::matches(&tag, &parsed), "spelling {:?} did not match", spelling);
        }
    }

    /// A tag for different state never satisfies the conditional check.
    #[test]
    fn prop_foreign_tag_never_matches(result in result_strategy(), delta in 1i64..1000) {
        let mut changed = result.clone();
        changed.result = result.result.wrapping_add(delta);
        let stale = etag::fingerprint(&changed);
        let parsed = etag::parse_client_tags(&format!("\"{}\"", stale));
        prop_assert!(!etag::matches(&etag::fingerprint(&result), &parsed));
    }
}

// ============================================================================
// COLLECTION FINGERPRINTS
// ============================================================================

proptest! {
    /// The collection tag is insensitive to input ordering.
    #[test]
    fn prop_collection_tag_ignores_order(mut results in prop::collection::vec(result_strategy(), 1..6)) {
        // Distinct ids so the canonical ordering is well defined.
        for (i, r) in results.iter_mut().enumerate() {
            r.id = (i as i64 + 1) * 10;
        }
        let forward = etag::collection_fingerprint(&results);
        results.reverse();
        let backward = etag::collection_fingerprint(&results);
        prop_assert_eq!(forward, backward);
    }

    /// Adding a member changes the collection tag.
    #[test]
    fn prop_collection_tag_tracks_membership(
        mut results in prop::collection::vec(result_strategy(), 1..6),
        extra in result_strategy(),
    ) {
        for (i, r) in results.iter_mut().enumerate() {
            r.id = (i as i64 + 1) * 10;
        }
        let before = etag::collection_fingerprint(&results);
        let mut extra = extra;
        extra.id = (results.len() as i64 + 1) * 10;
        results.push(extra);
        prop_assert_ne!(before, etag::collection_fingerprint(&results));
    }
}
