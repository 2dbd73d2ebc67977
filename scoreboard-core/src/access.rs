//! Authorization decision types.
//!
//! The decision procedure itself lives in the API layer; these are the pure
//! data shapes it produces.

use serde::{Deserialize, Serialize};

/// The operation being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    List,
}

/// Why an authorization decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessReason {
    Ok,
    Unauthenticated,
    ForbiddenNotOwner,
}

/// Listing scope computed by the policy.
///
/// Listing never fails authorization; it narrows scope instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Admins see every record.
    All,
    /// Non-admins see only records they own.
    OwnedBy(String),
}

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
    pub visibility: Visibility,
}

impl AccessDecision {
    pub fn allow(visibility: Visibility) -> Self {
        Self {
            allowed: true,
            reason: AccessReason::Ok,
            visibility,
        }
    }

    pub fn deny(reason: AccessReason) -> Self {
        Self {
            allowed: false,
            reason,
            visibility: Visibility::All,
        }
    }
}
