//! The result service: the orchestration between principal, policy, store,
//! and cache validation.
//!
//! Each call is an independent logical transaction: resolve the principal's
//! authority, touch the store, validate conditional headers, return a typed
//! outcome. The service holds no per-request state and defines no retries;
//! store failures propagate.
//!
//! Ordering contract: authentication is decided before any store access;
//! existence (404) is resolved before ownership (403). An authenticated
//! non-owner can therefore distinguish a missing id from a foreign one -
//! an accepted, deliberate leak.

use crate::auth::Clock;
use crate::error::{ApiError, ApiResult};
use crate::etag;
use crate::policy::AccessPolicy;
use crate::store::ResultStore;
use crate::types::{CreateResultRequest, UpdateResultRequest};
use chrono::{TimeZone, Utc};
use scoreboard_core::{AccessDecision, AccessReason, Operation, Principal, ScoreResult, Timestamp, Visibility};
use std::sync::Arc;

const FORBIDDEN_MESSAGE: &str = "Access Denied: You can only operate on your own results.";

// ============================================================================
// OUTCOMES
// ============================================================================

/// Outcome of a conditional single-resource read.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The client's tag matched; no body.
    NotModified,
    /// Fresh representation plus its entity tag.
    Fresh { resource: ScoreResult, etag: String },
}

/// Outcome of a conditional collection read.
#[derive(Debug, Clone, PartialEq)]
pub enum ListOutcome {
    /// No results visible to this principal. The transport maps this to 404
    /// (preserved behavior; see DESIGN.md).
    Empty,
    /// The client's tag matched; no body.
    NotModified,
    /// Fresh collection plus its entity tag.
    Fresh {
        results: Vec<ScoreResult>,
        etag: String,
    },
}

// ============================================================================
// SERVICE
// ============================================================================

/// Stateless orchestrator for the five result operations.
#[derive(Clone)]
pub struct ResultService {
    store: Arc<dyn ResultStore>,
    clock: Arc<dyn Clock>,
}

impl ResultService {
    pub fn new(store: Arc<dyn ResultStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn now(&self) -> Timestamp {
        Utc.timestamp_opt(self.clock.now_epoch_secs(), 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    fn check(decision: AccessDecision) -> ApiResult<AccessDecision> {
        if decision.allowed {
            return Ok(decision);
        }
        match decision.reason {
            AccessReason::Unauthenticated => Err(ApiError::unauthorized()),
            AccessReason::ForbiddenNotOwner => Err(ApiError::forbidden(FORBIDDEN_MESSAGE)),
            AccessReason::Ok => Err(ApiError::internal_error("inconsistent access decision")),
        }
    }

    /// Authentication gate shared by every operation: evaluated before any
    /// store access, with no target yet resolved.
    fn authenticate(principal: Option<&Principal>, op: Operation) -> ApiResult<()> {
        Self::check(AccessPolicy::decide(principal, None, op)).map(|_| ())
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Create a result owned by the user identified by the submitted email.
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        req: &CreateResultRequest,
    ) -> ApiResult<ScoreResult> {
        Self::authenticate(principal, Operation::Create)?;

        let (Some(value), Some(email)) = (req.result, req.email.as_deref()) else {
            return Err(ApiError::validation_failed(
                "Fields 'result' and 'email' are required",
            ));
        };

        // Unknown owner answers 404, same as a missing result id; the body
        // never states which lookup failed.
        let owner = self
            .store
            .user_by_email(email)
            .await?
            .ok_or_else(ApiError::not_found)?;

        // The prototype carries the submitted ownership for the policy to
        // compare against the principal.
        let prototype = ScoreResult::new(value, owner, self.now());
        Self::check(AccessPolicy::decide(principal, Some(&prototype), Operation::Create))?;

        let created = self.store.insert(prototype).await?;
        tracing::info!(id = created.id, owner = %created.owner_email(), "result created");
        Ok(created)
    }

    /// Fetch one result, honoring the client's conditional tags.
    pub async fn get(
        &self,
        principal: Option<&Principal>,
        result_id: i64,
        client_tags: &[String],
    ) -> ApiResult<ReadOutcome> {
        Self::authenticate(principal, Operation::Read)?;

        let target = self
            .store
            .result_by_id(result_id)
            .await?
            .ok_or_else(ApiError::not_found)?;

        Self::check(AccessPolicy::decide(principal, Some(&target), Operation::Read))?;

        let tag = etag::fingerprint(&target);
        if etag::matches(&tag, client_tags) {
            return Ok(ReadOutcome::NotModified);
        }
        Ok(ReadOutcome::Fresh {
            resource: target,
            etag: tag,
        })
    }

    /// List the results visible to this principal.
    pub async fn list(
        &self,
        principal: Option<&Principal>,
        client_tags: &[String],
    ) -> ApiResult<ListOutcome> {
        Self::authenticate(principal, Operation::List)?;

        let decision = Self::check(AccessPolicy::decide(principal, None, Operation::List))?;
        let results = match &decision.visibility {
            Visibility::All => self.store.results_all().await?,
            Visibility::OwnedBy(email) => self.store.results_by_owner(email).await?,
        };

        if results.is_empty() {
            return Ok(ListOutcome::Empty);
        }

        let tag = etag::collection_fingerprint(&results);
        if etag::matches(&tag, client_tags) {
            return Ok(ListOutcome::NotModified);
        }
        Ok(ListOutcome::Fresh { results, etag: tag })
    }

    /// Replace a result's value, refreshing its timestamp.
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        result_id: i64,
        req: &UpdateResultRequest,
    ) -> ApiResult<ScoreResult> {
        Self::authenticate(principal, Operation::Update)?;

        let mut target = self
            .store
            .result_by_id(result_id)
            .await?
            .ok_or_else(ApiError::not_found)?;

        Self::check(AccessPolicy::decide(principal, Some(&target), Operation::Update))?;

        let Some(value) = req.result else {
            return Err(ApiError::validation_failed("Field 'result' is required"));
        };

        target.result = value;
        target.time = self.now();
        let updated = self.store.update(target).await?;
        tracing::info!(id = updated.id, "result updated");
        Ok(updated)
    }

    /// Remove a result.
    pub async fn delete(&self, principal: Option<&Principal>, result_id: i64) -> ApiResult<()> {
        Self::authenticate(principal, Operation::Delete)?;

        let target = self
            .store
            .result_by_id(result_id)
            .await?
            .ok_or_else(ApiError::not_found)?;

        Self::check(AccessPolicy::decide(principal, Some(&target), Operation::Delete))?;

        self.store.delete(target.id).await?;
        tracing::info!(id = target.id, "result deleted");
        Ok(())
    }
}
