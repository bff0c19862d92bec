use std::sync::Arc;
use std::time::Duration;

use ringmate_core::{AppError, AppResult, BoxerId};
use ringmate_domain::{
    DenyReason, Permission, ResourceKind, ResourceRef, ResourceScope, Role, Subject, Verdict,
};
use tracing::{debug, error};

use crate::{DecisionCache, DecisionKey, RelationshipOracle};

/// Default lifetime of a memoized verdict.
///
/// The backstop against a missed invalidation; targeted invalidation is
/// expected to remove stale entries well before this elapses.
pub const DEFAULT_DECISION_TTL: Duration = Duration::from_secs(60);

/// The decision function: resolves whether a subject may perform an
/// action on a resource.
///
/// Combines the static role matrix with relationship facts from the
/// [`RelationshipOracle`] and memoizes verdicts in the [`DecisionCache`].
/// Evaluation is stateless and safe for unbounded parallel invocation;
/// the cache is the only shared mutable state.
#[derive(Clone)]
pub struct ResourceAuthorizer {
    oracle: Arc<dyn RelationshipOracle>,
    cache: Arc<dyn DecisionCache>,
    decision_ttl: Duration,
}

impl ResourceAuthorizer {
    /// Creates an authorizer over a relationship oracle and a decision
    /// cache, with the default verdict TTL.
    #[must_use]
    pub fn new(oracle: Arc<dyn RelationshipOracle>, cache: Arc<dyn DecisionCache>) -> Self {
        Self {
            oracle,
            cache,
            decision_ttl: DEFAULT_DECISION_TTL,
        }
    }

    /// Overrides the verdict TTL.
    #[must_use]
    pub fn with_decision_ttl(mut self, decision_ttl: Duration) -> Self {
        self.decision_ttl = decision_ttl;
        self
    }

    /// Evaluates one permission for a subject against an optional
    /// resource.
    ///
    /// An authorization failure is a [`Verdict::Deny`], never an error.
    /// An oracle or cache failure is an error, never a verdict, so
    /// callers can distinguish "denied" from "undecidable" and must
    /// treat the error as a denial (fail closed).
    pub async fn evaluate(
        &self,
        subject: Option<&Subject>,
        permission: Permission,
        resource: Option<ResourceRef>,
    ) -> AppResult<Verdict> {
        let Some(subject) = subject else {
            return Ok(self.denied(None, permission, DenyReason::AuthenticationRequired));
        };

        // Checked on every evaluation, before the cache, so a deactivated
        // account can never be served a memoized allow.
        if !self.fact(self.oracle.is_active(subject.user_id())).await? {
            return Ok(self.denied(Some(subject), permission, DenyReason::InactiveSubject));
        }

        let key = DecisionKey::new(subject, permission, resource);
        if let Some(verdict) = self.cache.get(&key).await? {
            return Ok(verdict);
        }

        let verdict = self.resolve(subject, permission, resource).await?;
        self.cache.put(key, verdict, self.decision_ttl).await?;

        if let Verdict::Deny(reason) = verdict {
            return Ok(self.denied(Some(subject), permission, reason));
        }
        Ok(verdict)
    }

    /// Evaluates a set of permissions, allowing if any one allows.
    ///
    /// Short-circuits on the first allow; an empty set denies. Each
    /// permission goes through [`ResourceAuthorizer::evaluate`], so
    /// caching and logging behave exactly as for single checks.
    pub async fn evaluate_any(
        &self,
        subject: Option<&Subject>,
        permissions: &[Permission],
        resource: Option<ResourceRef>,
    ) -> AppResult<Verdict> {
        let mut last_denial = Verdict::Deny(DenyReason::NoApplicableGrant);
        for permission in permissions {
            let verdict = self.evaluate(subject, *permission, resource).await?;
            if verdict.is_allowed() {
                return Ok(verdict);
            }
            last_denial = verdict;
        }

        Ok(last_denial)
    }

    /// Evaluates a set of permissions, allowing only if all allow.
    ///
    /// Short-circuits on the first denial; an empty set allows.
    pub async fn evaluate_all(
        &self,
        subject: Option<&Subject>,
        permissions: &[Permission],
        resource: Option<ResourceRef>,
    ) -> AppResult<Verdict> {
        for permission in permissions {
            let verdict = self.evaluate(subject, *permission, resource).await?;
            if !verdict.is_allowed() {
                return Ok(verdict);
            }
        }

        Ok(Verdict::Allow)
    }

    /// Ensures the subject holds the permission, mapping a denial to
    /// [`AppError::Forbidden`] for service call sites.
    pub async fn require(
        &self,
        subject: &Subject,
        permission: Permission,
        resource: Option<ResourceRef>,
    ) -> AppResult<()> {
        match self.evaluate(Some(subject), permission, resource).await? {
            Verdict::Allow => Ok(()),
            Verdict::Deny(reason) => Err(AppError::Forbidden(format!(
                "user '{}' may not '{}': {}",
                subject.user_id(),
                permission.as_str(),
                reason.message()
            ))),
        }
    }

    async fn resolve(
        &self,
        subject: &Subject,
        permission: Permission,
        resource: Option<ResourceRef>,
    ) -> AppResult<Verdict> {
        let role = subject.role();
        if !role.has_permission(permission) {
            return Ok(Verdict::Deny(DenyReason::RoleDenied));
        }

        // Admin bypasses every resource-scope check, including the
        // fight-history override.
        if role == Role::Admin {
            return Ok(Verdict::Allow);
        }

        let scope = permission.required_scope();
        if scope == ResourceScope::Unscoped {
            return Ok(Verdict::Allow);
        }

        let Some(resource) = resource else {
            return Ok(Verdict::Deny(DenyReason::ResourceScopeDenied));
        };

        match scope {
            ResourceScope::Unscoped => Ok(Verdict::Allow),
            ResourceScope::Own => self.resolve_own(subject, permission, resource).await,
            ResourceScope::Linked => self.resolve_linked(subject, permission, resource).await,
            ResourceScope::ClubOwner => self.resolve_club_owner(subject, resource).await,
        }
    }

    async fn resolve_own(
        &self,
        subject: &Subject,
        permission: Permission,
        resource: ResourceRef,
    ) -> AppResult<Verdict> {
        if !self
            .fact(self.oracle.is_owner(subject.user_id(), resource))
            .await?
        {
            return Ok(Verdict::Deny(DenyReason::ResourceScopeDenied));
        }

        // Fight history is managed exclusively by linked coaches, owners
        // of the boxer's club, or Admin. A boxer owning the profile is
        // still denied self-management.
        if permission.is_fight_management() && subject.role() == Role::Boxer {
            return Ok(Verdict::Deny(DenyReason::OverrideDenied));
        }

        Ok(Verdict::Allow)
    }

    async fn resolve_linked(
        &self,
        subject: &Subject,
        permission: Permission,
        resource: ResourceRef,
    ) -> AppResult<Verdict> {
        // Coach links are keyed by boxer; callers pass the boxer a
        // linked availability window or match request belongs to.
        if resource.kind() != ResourceKind::Boxer {
            return Ok(Verdict::Deny(DenyReason::NoApplicableGrant));
        }

        let boxer_id = BoxerId::from_uuid(resource.id());
        let level = self
            .fact(self.oracle.coach_link_level(subject.user_id(), boxer_id))
            .await?;

        match level {
            Some(level) if level.grants(permission) => Ok(Verdict::Allow),
            _ => Ok(Verdict::Deny(DenyReason::ResourceScopeDenied)),
        }
    }

    async fn resolve_club_owner(
        &self,
        subject: &Subject,
        resource: ResourceRef,
    ) -> AppResult<Verdict> {
        let holds = match resource.kind() {
            ResourceKind::Club => {
                self.fact(self.oracle.is_owner(subject.user_id(), resource))
                    .await?
            }
            ResourceKind::Boxer => {
                let boxer_id = BoxerId::from_uuid(resource.id());
                self.fact(self.oracle.owns_club_of_boxer(subject.user_id(), boxer_id))
                    .await?
            }
            _ => return Ok(Verdict::Deny(DenyReason::NoApplicableGrant)),
        };

        if holds {
            Ok(Verdict::Allow)
        } else {
            Ok(Verdict::Deny(DenyReason::ResourceScopeDenied))
        }
    }

    async fn fact<T>(&self, query: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        query.await.inspect_err(|error| {
            error!("relationship oracle query failed: {error}");
        })
    }

    fn denied(
        &self,
        subject: Option<&Subject>,
        permission: Permission,
        reason: DenyReason,
    ) -> Verdict {
        match subject {
            Some(subject) => debug!(
                user_id = %subject.user_id(),
                permission = permission.as_str(),
                reason = reason.as_str(),
                "authorization denied",
            ),
            None => debug!(
                permission = permission.as_str(),
                reason = reason.as_str(),
                "authorization denied",
            ),
        }

        Verdict::Deny(reason)
    }
}
