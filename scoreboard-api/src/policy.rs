//! The owner-or-admin authorization rule.
//!
//! One pure decision procedure, invoked identically from every operation in
//! `ResultService`. No endpoint carries its own authorization logic, so the
//! rules cannot drift between endpoints.

use scoreboard_core::{AccessDecision, AccessReason, Operation, Principal, ScoreResult, Visibility};

/// The access policy for the result resource.
///
/// Rules, evaluated in order:
/// 1. No principal: deny `Unauthenticated`. Checked before any store access,
///    on every operation including LIST and CREATE.
/// 2. Admin principal: allow unconditionally.
/// 3. CREATE: the submitted owner must be the principal itself.
/// 4. READ/UPDATE/DELETE: the target's owner must be the principal.
/// 5. LIST: never denies; non-admins get an owner-scoped visibility filter.
pub struct AccessPolicy;

impl AccessPolicy {
    /// Decide whether `principal` may perform `op`.
    ///
    /// `target` carries the existing resource for READ/UPDATE/DELETE and, for
    /// CREATE, a prototype holding the submitted owner. Existence of the
    /// target is resolved by the caller before this is invoked.
    pub fn decide(
        principal: Option<&Principal>,
        target: Option<&ScoreResult>,
        op: Operation,
    ) -> AccessDecision {
        let Some(principal) = principal else {
            return AccessDecision::deny(AccessReason::Unauthenticated);
        };

        if principal.is_admin() {
            return AccessDecision::allow(Visibility::All);
        }

        match op {
            Operation::List => {
                AccessDecision::allow(Visibility::OwnedBy(principal.email.clone()))
            }
            Operation::Create | Operation::Read | Operation::Update | Operation::Delete => {
                match target {
                    Some(target) if target.owner_email() == principal.email => {
                        AccessDecision::allow(Visibility::OwnedBy(principal.email.clone()))
                    }
                    Some(_) => AccessDecision::deny(AccessReason::ForbiddenNotOwner),
                    // Identity not yet known (e.g. the pre-fetch
                    // authentication check): nothing to compare against.
                    None => AccessDecision::allow(Visibility::OwnedBy(principal.email.clone())),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scoreboard_core::{RoleTag, User};
    use std::collections::BTreeSet;

    fn roles(tags: &[RoleTag]) -> BTreeSet<RoleTag> {
        tags.iter().copied().collect()
    }

    fn admin() -> Principal {
        Principal::new("admin@example.com", roles(&[RoleTag::Admin, RoleTag::User]))
    }

    fn owner() -> Principal {
        Principal::new("owner@example.com", roles(&[RoleTag::User]))
    }

    fn stranger() -> Principal {
        Principal::new("stranger@example.com", roles(&[RoleTag::User]))
    }

    fn owned_result() -> ScoreResult {
        let user = User::new(1, "owner@example.com", roles(&[RoleTag::User]), "digest");
        ScoreResult::new(10, user, Utc::now())
    }

    const ALL_OPS: [Operation; 5] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
        Operation::List,
    ];

    #[test]
    fn test_missing_principal_denied_on_every_operation() {
        let target = owned_result();
        for op in ALL_OPS {
            let decision = AccessPolicy::decide(None, Some(&target), op);
            assert!(!decision.allowed, "{:?} should deny", op);
            assert_eq!(decision.reason, AccessReason::Unauthenticated);

            let decision = AccessPolicy::decide(None, None, op);
            assert!(!decision.allowed, "{:?} without target should deny", op);
        }
    }

    #[test]
    fn test_admin_allowed_on_every_operation() {
        let principal = admin();
        let target = owned_result();
        for op in ALL_OPS {
            let decision = AccessPolicy::decide(Some(&principal), Some(&target), op);
            assert!(decision.allowed, "{:?} should allow admin", op);
            assert_eq!(decision.reason, AccessReason::Ok);
            assert_eq!(decision.visibility, Visibility::All);
        }
    }

    #[test]
    fn test_owner_allowed_on_own_resource() {
        let principal = owner();
        let target = owned_result();
        for op in [Operation::Read, Operation::Update, Operation::Delete] {
            let decision = AccessPolicy::decide(Some(&principal), Some(&target), op);
            assert!(decision.allowed, "{:?} should allow owner", op);
        }
    }

    #[test]
    fn test_non_owner_denied_on_foreign_resource() {
        let principal = stranger();
        let target = owned_result();
        for op in [Operation::Read, Operation::Update, Operation::Delete] {
            let decision = AccessPolicy::decide(Some(&principal), Some(&target), op);
            assert!(!decision.allowed, "{:?} should deny non-owner", op);
            assert_eq!(decision.reason, AccessReason::ForbiddenNotOwner);
        }
    }

    #[test]
    fn test_create_for_someone_else_denied() {
        let principal = stranger();
        let prototype = owned_result();
        let decision = AccessPolicy::decide(Some(&principal), Some(&prototype), Operation::Create);
        assert!(!decision.allowed);
        assert_eq!(decision.reason, AccessReason::ForbiddenNotOwner);
    }

    #[test]
    fn test_create_for_self_allowed() {
        let principal = owner();
        let prototype = owned_result();
        let decision = AccessPolicy::decide(Some(&principal), Some(&prototype), Operation::Create);
        assert!(decision.allowed);
    }

    #[test]
    fn test_list_never_denies_authenticated_principals() {
        let principal = stranger();
        let decision = AccessPolicy::decide(Some(&principal), None, Operation::List);
        assert!(decision.allowed);
        assert_eq!(
            decision.visibility,
            Visibility::OwnedBy("stranger@example.com".to_string())
        );
    }

    #[test]
    fn test_pre_fetch_check_passes_for_authenticated_principal() {
        // With no target resolved yet, only the authentication rule applies.
        let principal = stranger();
        let decision = AccessPolicy::decide(Some(&principal), None, Operation::Read);
        assert!(decision.allowed);
    }
}
