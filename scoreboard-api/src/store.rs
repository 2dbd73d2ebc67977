//! Result persistence.
//!
//! The service layer only sees the `ResultStore` trait; consistency between
//! concurrent read-modify-write sequences on the same id is the store's
//! responsibility. `MemoryStore` is the in-process implementation used by the
//! server binary and the test suite.

use async_trait::async_trait;
use dashmap::DashMap;
use scoreboard_core::{ScoreResult, User};
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Store-level failures. Not recovered by the service layer; they surface
/// as 500 and are never retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("constraint violation: {0}")]
    Constraint(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// STORE TRAIT
// ============================================================================

/// CRUD primitives for results, plus the read-only user lookup the create
/// path needs to resolve ownership.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Look up a user by their stable identity.
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fetch one result by id.
    async fn result_by_id(&self, id: i64) -> StoreResult<Option<ScoreResult>>;

    /// Fetch every result.
    async fn results_all(&self) -> StoreResult<Vec<ScoreResult>>;

    /// Fetch the results owned by one user.
    async fn results_by_owner(&self, email: &str) -> StoreResult<Vec<ScoreResult>>;

    /// Persist a new result, assigning its id. Returns the stored row.
    async fn insert(&self, result: ScoreResult) -> StoreResult<ScoreResult>;

    /// Persist changes to an existing result.
    async fn update(&self, result: ScoreResult) -> StoreResult<ScoreResult>;

    /// Remove a result. Returns false when the id was absent.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

// ============================================================================
// IN-MEMORY IMPLEMENTATION
// ============================================================================

/// In-memory store backed by concurrent maps.
///
/// Per-key operations are atomic; that is the row-level guarantee the service
/// relies on. Ids are assigned from a monotonic sequence starting at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    results: DashMap<i64, ScoreResult>,
    next_id: AtomicI64,
    next_user_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            results: DashMap::new(),
            next_id: AtomicI64::new(1),
            next_user_id: AtomicI64::new(1),
        }
    }

    /// Register a user, assigning their id. Seeding-time helper; users are
    /// otherwise read-only to this service.
    pub fn add_user(&self, mut user: User) -> User {
        if user.id == 0 {
            user.id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
        }
        self.users.insert(user.email.clone(), user.clone());
        user
    }

    /// Remove a user and cascade-delete their results (the owner invariant:
    /// a result's owner must reference an existing user at all times).
    pub fn remove_user(&self, email: &str) -> bool {
        let existed = self.users.remove(email).is_some();
        if existed {
            self.results.retain(|_, r| r.owner_email() != email);
        }
        existed
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.get(email).map(|u| u.clone()))
    }

    async fn result_by_id(&self, id: i64) -> StoreResult<Option<ScoreResult>> {
        Ok(self.results.get(&id).map(|r| r.clone()))
    }

    async fn results_all(&self) -> StoreResult<Vec<ScoreResult>> {
        let mut all: Vec<ScoreResult> = self.results.iter().map(|r| r.clone()).collect();
        all.sort_by_key(|r| r.id);
        Ok(all)
    }

    async fn results_by_owner(&self, email: &str) -> StoreResult<Vec<ScoreResult>> {
        let mut owned: Vec<ScoreResult> = self
            .results
            .iter()
            .filter(|r| r.owner_email() == email)
            .map(|r| r.clone())
            .collect();
        owned.sort_by_key(|r| r.id);
        Ok(owned)
    }

    async fn insert(&self, mut result: ScoreResult) -> StoreResult<ScoreResult> {
        result.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.results.insert(result.id, result.clone());
        Ok(result)
    }

    async fn update(&self, result: ScoreResult) -> StoreResult<ScoreResult> {
        if !self.results.contains_key(&result.id) {
            return Err(StoreError::Constraint(format!(
                "update of unknown result id {}",
                result.id
            )));
        }
        self.results.insert(result.id, result.clone());
        Ok(result)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.results.remove(&id).is_some())
    }
}
