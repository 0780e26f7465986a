//! Moderation request and outcome types
//!
//! This module defines the data carried through a single ban invocation:
//! who asked, who would act, who is targeted, and what the guard pipeline
//! decided.

use derive_more::Display;
use poise::serenity_prelude::{GuildId, RoleId, UserId};

/// Reason recorded when the moderator supplies none.
pub const DEFAULT_REASON: &str = "No reason provided";

/// Identity and guild standing of a participant in a moderation command:
/// the invoking moderator, or the bot acting on their behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorProfile {
    /// User ID of the participant
    pub user_id: UserId,
    /// Highest role position held in the guild
    pub role_rank: u16,
    /// Roles held, consumed by the permission oracle
    pub role_ids: Vec<RoleId>,
}

impl ActorProfile {
    /// Create a new profile
    #[must_use]
    pub fn new(user_id: UserId, role_rank: u16, role_ids: Vec<RoleId>) -> Self {
        Self {
            user_id,
            role_rank,
            role_ids,
        }
    }
}

/// A single ban invocation. Built once per command call, read by the guard
/// pipeline, and discarded when the invocation completes.
#[derive(Debug, Clone)]
pub struct BanRequest {
    /// Guild the command was invoked in
    pub guild_id: GuildId,
    /// The invoking moderator
    pub actor: ActorProfile,
    /// The bot itself, as a member of the same guild
    pub executor: ActorProfile,
    /// Raw target argument: a mention or a user ID, if one was supplied
    pub target_token: Option<String>,
    /// Free-form reason for the ban, if one was supplied
    pub reason: Option<String>,
}

impl BanRequest {
    /// The reason text to record, defaulting when none was given.
    #[must_use]
    pub fn reason_text(&self) -> &str {
        self.reason.as_deref().unwrap_or(DEFAULT_REASON)
    }
}

/// The identity a target token resolved to.
///
/// A target carries a role rank exactly when it is a current guild member;
/// a user known only by ID has no in-guild standing to compare against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// User ID of the target
    pub user_id: UserId,
    /// Display tag, e.g. `someone#0001`
    pub display_tag: String,
    /// Whether the target is a current member of the guild
    pub is_guild_member: bool,
    /// Highest role position, present only for current members
    pub role_rank: Option<u16>,
    /// Whether the target account is a bot
    pub is_bot: bool,
}

impl ResolvedTarget {
    /// A target that is a current guild member, with a comparable rank.
    #[must_use]
    pub fn member(
        user_id: UserId,
        display_tag: impl Into<String>,
        role_rank: u16,
        is_bot: bool,
    ) -> Self {
        Self {
            user_id,
            display_tag: display_tag.into(),
            is_guild_member: true,
            role_rank: Some(role_rank),
            is_bot,
        }
    }

    /// A target known only as a global user (ban-by-ID).
    #[must_use]
    pub fn outsider(user_id: UserId, display_tag: impl Into<String>, is_bot: bool) -> Self {
        Self {
            user_id,
            display_tag: display_tag.into(),
            is_guild_member: false,
            role_rank: None,
            is_bot,
        }
    }
}

/// Which identity a rejected self-target matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SelfTarget {
    /// The moderator tried to ban themselves
    #[display("You cannot ban yourself.")]
    Actor,
    /// The moderator tried to ban the bot
    #[display("I cannot ban myself.")]
    Executor,
}

/// Why a ban request was refused. Each variant surfaces as its own
/// user-facing message; `Display` yields the embed description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RejectionReason {
    /// The moderator lacks the ban capability
    #[display("You do not have permission to use this command.")]
    NoPermission,
    /// The bot itself lacks the ban capability
    #[display("I do not have permission to ban members.")]
    ExecutorMissingPermission,
    /// No target argument was supplied
    #[display("Usage: `,ban <user> [reason]`")]
    InvalidUsage,
    /// The target argument named nobody
    #[display("Please mention a valid user or provide a valid user ID.")]
    UserNotFound,
    /// The target is the moderator or the bot itself
    #[display("{_0}")]
    InvalidTarget(SelfTarget),
    /// The target outranks or equals the moderator
    #[display("You cannot ban someone with equal or higher roles.")]
    InsufficientHierarchy,
    /// The target outranks or equals the bot
    #[display("I cannot ban someone with equal or higher roles than me.")]
    ExecutorInsufficientHierarchy,
    /// The target is already on the guild ban list
    #[display("This user is already banned.")]
    AlreadyBanned,
}

impl RejectionReason {
    /// Embed title for this rejection.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::NoPermission => "❌ No Permission",
            Self::ExecutorMissingPermission => "❌ Bot Missing Permissions",
            Self::InvalidUsage => "❌ Invalid Usage",
            Self::UserNotFound => "❌ User Not Found",
            Self::InvalidTarget(_) => "❌ Invalid Target",
            Self::InsufficientHierarchy => "❌ Insufficient Permissions",
            Self::ExecutorInsufficientHierarchy => "❌ Cannot Ban User",
            Self::AlreadyBanned => "❌ Already Banned",
        }
    }
}

/// Decision produced by the guard pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// Every check passed; the resolved target may be banned
    Allowed(ResolvedTarget),
    /// A check failed; nothing was executed
    Rejected(RejectionReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_target_carries_rank() {
        let target = ResolvedTarget::member(UserId::new(42), "someone#0001", 7, false);
        assert!(target.is_guild_member);
        assert_eq!(target.role_rank, Some(7));
        assert_eq!(target.display_tag, "someone#0001");
    }

    #[test]
    fn test_outsider_target_has_no_rank() {
        let target = ResolvedTarget::outsider(UserId::new(42), "gone#0001", true);
        assert!(!target.is_guild_member);
        assert_eq!(target.role_rank, None);
        assert!(target.is_bot);
    }

    #[test]
    fn test_reason_text_defaults() {
        let mut request = BanRequest {
            guild_id: GuildId::new(1),
            actor: ActorProfile::new(UserId::new(2), 1, vec![]),
            executor: ActorProfile::new(UserId::new(3), 2, vec![]),
            target_token: Some("42".to_string()),
            reason: None,
        };
        assert_eq!(request.reason_text(), DEFAULT_REASON);

        request.reason = Some("spamming invites".to_string());
        assert_eq!(request.reason_text(), "spamming invites");
    }

    #[test]
    fn test_rejection_messages_are_distinct() {
        let reasons = [
            RejectionReason::NoPermission,
            RejectionReason::ExecutorMissingPermission,
            RejectionReason::InvalidUsage,
            RejectionReason::UserNotFound,
            RejectionReason::InvalidTarget(SelfTarget::Actor),
            RejectionReason::InvalidTarget(SelfTarget::Executor),
            RejectionReason::InsufficientHierarchy,
            RejectionReason::ExecutorInsufficientHierarchy,
            RejectionReason::AlreadyBanned,
        ];

        let messages: std::collections::HashSet<String> =
            reasons.iter().map(ToString::to_string).collect();
        assert_eq!(messages.len(), reasons.len());
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(
            RejectionReason::NoPermission.to_string(),
            "You do not have permission to use this command."
        );
        assert_eq!(
            RejectionReason::InvalidTarget(SelfTarget::Actor).to_string(),
            "You cannot ban yourself."
        );
        assert_eq!(
            RejectionReason::InvalidTarget(SelfTarget::Executor).to_string(),
            "I cannot ban myself."
        );
        assert_eq!(
            RejectionReason::AlreadyBanned.to_string(),
            "This user is already banned."
        );
    }

    #[test]
    fn test_rejection_titles() {
        assert_eq!(RejectionReason::NoPermission.title(), "❌ No Permission");
        assert_eq!(
            RejectionReason::ExecutorMissingPermission.title(),
            "❌ Bot Missing Permissions"
        );
        assert_eq!(
            RejectionReason::InvalidTarget(SelfTarget::Actor).title(),
            RejectionReason::InvalidTarget(SelfTarget::Executor).title()
        );
        assert_eq!(
            RejectionReason::ExecutorInsufficientHierarchy.title(),
            "❌ Cannot Ban User"
        );
    }
}
