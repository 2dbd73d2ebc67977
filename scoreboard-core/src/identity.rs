//! Request identity types.
//!
//! A `Principal` is built once per request from verified credentials and is
//! immutable for the request's duration. It is never persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role tags granted to a user.
///
/// `Admin` grants elevated access: every operation on every resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleTag {
    Admin,
    User,
}

/// The authenticated identity and role set attached to one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Matches a `User.email` when authenticated.
    pub email: String,

    /// Role tags copied from the authenticated user at request time.
    pub roles: BTreeSet<RoleTag>,
}

impl Principal {
    pub fn new(email: impl Into<String>, roles: BTreeSet<RoleTag>) -> Self {
        Self {
            email: email.into(),
            roles,
        }
    }

    /// Check role membership on the typed set.
    pub fn has_role(&self, role: RoleTag) -> bool {
        self.roles.contains(&role)
    }

    /// Admins may act on any resource, list all, and create on behalf of
    /// any user.
    pub fn is_admin(&self) -> bool {
        self.has_role(RoleTag::Admin)
    }
}
