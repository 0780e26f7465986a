//! Target identity resolution
//!
//! Turns a raw command token (a mention or a bare user ID) into a resolved
//! identity. Resolution prefers the guild member, so the target carries a
//! comparable role rank; users outside the guild resolve through a global
//! lookup instead, which is what makes ban-by-ID work.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use serenity::{GuildId, Http, Member, RoleId, UserId};
use tracing::{debug, warn};

use crate::moderation::ResolvedTarget;

/// Maps a raw token to a user identity within a guild.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TargetResolver: Send + Sync {
    /// Resolve `token` within `guild_id`, or `None` when it names nobody.
    async fn resolve(&self, guild_id: GuildId, token: &str) -> Option<ResolvedTarget>;
}

/// Parse a target token: a user mention (`<@id>` or `<@!id>`) or a raw ID.
#[must_use]
pub fn parse_target_token(token: &str) -> Option<UserId> {
    let raw = token.trim();
    let raw = if let Some(inner) = raw.strip_prefix("<@").and_then(|rest| rest.strip_suffix('>')) {
        inner.strip_prefix('!').unwrap_or(inner)
    } else {
        raw
    };

    raw.parse::<u64>().ok().filter(|id| *id != 0).map(UserId::new)
}

/// Highest role position among `role_ids`, 0 when none are held.
#[must_use]
pub fn member_rank(positions: &HashMap<RoleId, u16>, role_ids: &[RoleId]) -> u16 {
    role_ids
        .iter()
        .filter_map(|id| positions.get(id))
        .copied()
        .max()
        .unwrap_or(0)
}

/// Resolver backed by the Discord HTTP API and a guild's role table.
pub struct HttpTargetResolver {
    http: Arc<Http>,
    role_positions: HashMap<RoleId, u16>,
}

impl HttpTargetResolver {
    /// Create a resolver for one guild, snapshotting its role positions.
    #[must_use]
    pub fn new(http: Arc<Http>, guild: &serenity::PartialGuild) -> Self {
        Self {
            http,
            role_positions: guild
                .roles
                .iter()
                .map(|(id, role)| (*id, role.position))
                .collect(),
        }
    }

    fn rank_of(&self, member: &Member) -> u16 {
        member_rank(&self.role_positions, &member.roles)
    }
}

#[async_trait]
impl TargetResolver for HttpTargetResolver {
    async fn resolve(&self, guild_id: GuildId, token: &str) -> Option<ResolvedTarget> {
        let user_id = parse_target_token(token)?;

        // Prefer the member lookup so the target carries a rank.
        match guild_id.member(&self.http, user_id).await {
            Ok(member) => {
                return Some(ResolvedTarget::member(
                    user_id,
                    member.user.tag(),
                    self.rank_of(&member),
                    member.user.bot,
                ));
            }
            Err(err) => {
                // Expected for users outside the guild.
                debug!("Member lookup missed for {user_id} in {guild_id}: {err}");
            }
        }

        match self.http.get_user(user_id).await {
            Ok(user) => Some(ResolvedTarget::outsider(user_id, user.tag(), user.bot)),
            Err(err) => {
                warn!("User lookup failed for {user_id}: {err}");
                None
            }
        }
    }
}
