//! Persistent entities: `User` and `ScoreResult`.

use crate::identity::RoleTag;
use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Wire format for timestamps: whole-second precision, no timezone suffix.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A registered user. Referenced read-only by the result resource.
///
/// The serde rename fixes the XML root element; JSON is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "user")]
pub struct User {
    /// Store-assigned identifier.
    pub id: i64,

    /// Unique stable identity.
    pub email: String,

    /// Granted role tags.
    pub roles: BTreeSet<RoleTag>,

    /// SHA-256 digest of the user's password. Never serialized.
    #[serde(skip)]
    pub password_digest: String,
}

impl User {
    pub fn new(
        id: i64,
        email: impl Into<String>,
        roles: BTreeSet<RoleTag>,
        password_digest: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            roles,
            password_digest: password_digest.into(),
        }
    }
}

/// A numeric score owned by exactly one user.
///
/// `id` is 0 before persistence; the store assigns it on insert. `time` is
/// set at creation and refreshed on every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "result")]
pub struct ScoreResult {
    pub id: i64,

    /// The score value.
    pub result: i64,

    /// Owning user. Ownership never transfers implicitly.
    pub user: User,

    /// Recorded-at timestamp, whole-second precision on the wire.
    #[serde(with = "time_format")]
    pub time: Timestamp,
}

impl ScoreResult {
    pub fn new(result: i64, user: User, time: Timestamp) -> Self {
        Self {
            id: 0,
            result,
            user,
            time,
        }
    }

    /// Identity of the owning user.
    pub fn owner_email(&self) -> &str {
        &self.user.email
    }

    /// Canonical form used for fingerprinting.
    ///
    /// Fields appear in a fixed, documented order - id, result, time, owner
    /// email - with the timestamp truncated to whole seconds, so two results
    /// with identical client-visible state always produce identical bytes
    /// regardless of in-memory or serialization ordering.
    pub fn canonical_form(&self) -> String {
        format!(
            "id={};result={};time={};user={}",
            self.id,
            self.result,
            self.time.format(TIME_FORMAT),
            self.user.email
        )
    }
}

impl fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:3} - {:3} - {:>22} - {}",
            self.id,
            self.result,
            self.user.email,
            self.time.format(TIME_FORMAT)
        )
    }
}

/// Serde adapter for the `YYYY-MM-DD HH:MM:SS` wire format.
mod time_format {
    use super::TIME_FORMAT;
    use crate::Timestamp;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIME_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
