//! Ban guard pipeline
//!
//! The ordered validation checks that decide whether a ban attempt may
//! proceed. Checks short-circuit on the first failure, each mapping to its
//! own rejection reason, and nothing mutates guild state until every check
//! has passed. Given fixed collaborator responses the pipeline is a pure
//! function of its request.

use tracing::warn;

use crate::moderation::{
    BanListReader, BanRequest, Capability, GuardOutcome, PermissionOracle, RejectionReason,
    SelfTarget, TargetResolver,
};

/// Tunable guard behavior, configured per guild.
#[derive(Debug, Clone, Copy)]
pub struct GuardPolicy {
    /// Allow banning users who are not current guild members (ban-by-ID).
    /// Such targets carry no role rank, so the hierarchy checks never apply
    /// to them.
    pub allow_ban_by_id: bool,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            allow_ban_by_id: true,
        }
    }
}

/// The ban guard pipeline over its read-only collaborators.
pub struct BanGuard<'a> {
    oracle: &'a dyn PermissionOracle,
    resolver: &'a dyn TargetResolver,
    ban_list: &'a dyn BanListReader,
    policy: GuardPolicy,
}

impl<'a> BanGuard<'a> {
    /// Create a guard with the default policy.
    pub fn new(
        oracle: &'a dyn PermissionOracle,
        resolver: &'a dyn TargetResolver,
        ban_list: &'a dyn BanListReader,
    ) -> Self {
        Self {
            oracle,
            resolver,
            ban_list,
            policy: GuardPolicy::default(),
        }
    }

    /// Replace the guard policy.
    #[must_use]
    pub fn with_policy(mut self, policy: GuardPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run every check in order, stopping at the first rejection.
    ///
    /// A request reaches the executor only when this returns `Allowed`.
    pub async fn evaluate(&self, request: &BanRequest) -> GuardOutcome {
        use GuardOutcome::Rejected;

        // The moderator must hold the capability before anything else runs.
        if !self.oracle.has_capability(&request.actor, Capability::Ban) {
            return Rejected(RejectionReason::NoPermission);
        }

        // So must the bot itself. Guild-wide and target-independent, so it
        // comes before any resolution work.
        if !self.oracle.has_capability(&request.executor, Capability::Ban) {
            return Rejected(RejectionReason::ExecutorMissingPermission);
        }

        let Some(token) = request
            .target_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
        else {
            return Rejected(RejectionReason::InvalidUsage);
        };

        let Some(target) = self.resolver.resolve(request.guild_id, token).await else {
            return Rejected(RejectionReason::UserNotFound);
        };

        if target.user_id == request.actor.user_id {
            return Rejected(RejectionReason::InvalidTarget(SelfTarget::Actor));
        }

        if target.is_bot && target.user_id == request.executor.user_id {
            return Rejected(RejectionReason::InvalidTarget(SelfTarget::Executor));
        }

        // When ban-by-ID is disabled, out-of-guild identities are not
        // recognized at all.
        if !target.is_guild_member && !self.policy.allow_ban_by_id {
            return Rejected(RejectionReason::UserNotFound);
        }

        // Hierarchy only applies to current members; an outsider holds no
        // rank to compare against.
        if let Some(rank) = target.role_rank {
            if rank >= request.actor.role_rank {
                return Rejected(RejectionReason::InsufficientHierarchy);
            }
            if rank >= request.executor.role_rank {
                return Rejected(RejectionReason::ExecutorInsufficientHierarchy);
            }
        }

        // Fail-open: an unreadable ban list must not block moderation.
        match self.ban_list.fetch_banned_ids(request.guild_id).await {
            Ok(banned) if banned.contains(&target.user_id) => {
                return Rejected(RejectionReason::AlreadyBanned);
            }
            Ok(_) => {}
            Err(err) => {
                warn!("Ban list fetch failed for {}: {err}", request.guild_id);
            }
        }

        GuardOutcome::Allowed(target)
    }
}
