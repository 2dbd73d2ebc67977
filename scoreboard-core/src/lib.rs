//! Scoreboard Core - Entity Types
//!
//! Pure data structures shared by the API layer. This crate contains only
//! data types and their canonical serialization - no I/O, no framework types.

pub mod access;
pub mod entities;
pub mod identity;

use sha2::{Digest, Sha256};

pub use access::{AccessDecision, AccessReason, Operation, Visibility};
pub use entities::{ScoreResult, User, TIME_FORMAT};
pub use identity::{Principal, RoleTag};

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Compute the hex-encoded SHA-256 digest of arbitrary content.
///
/// Used for ETag fingerprints and stored password digests.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
