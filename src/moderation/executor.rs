//! Ban execution and target notification
//!
//! The side-effecting tail of the ban flow: a best-effort direct message to
//! the target, then the ban call itself. Notification must come first; once
//! the ban lands, the DM channel may refuse delivery.

use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use serenity::{Colour, CreateEmbed, CreateMessage, GuildId, Http, Timestamp};
use tracing::warn;

use crate::moderation::{ModerationResult, ResolvedTarget};

/// Performs the moderation action once the guard pipeline allows it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BanExecutor: Send + Sync {
    /// Attempt to notify the target before the ban. Best-effort: delivery
    /// failures are logged and never block the ban.
    async fn notify_target(&self, target: &ResolvedTarget, reason: &str, moderator_tag: &str);

    /// Ban the target, deleting `retention_days` days of their messages.
    /// Fail-closed: an error here must be surfaced to the caller.
    async fn execute_ban(
        &self,
        guild_id: GuildId,
        target: &ResolvedTarget,
        reason: &str,
        moderator_tag: &str,
        retention_days: u8,
    ) -> ModerationResult<()>;
}

/// Format the reason recorded in the guild audit log.
#[must_use]
pub fn audit_reason(reason: &str, moderator_tag: &str) -> String {
    format!("{reason} | Moderator: {moderator_tag}")
}

/// Executor backed by the Discord HTTP API.
pub struct HttpBanExecutor {
    http: Arc<Http>,
    guild_name: String,
    notice_colour: Colour,
}

impl HttpBanExecutor {
    /// Create an executor for one guild.
    #[must_use]
    pub fn new(http: Arc<Http>, guild_name: impl Into<String>, notice_colour: Colour) -> Self {
        Self {
            http,
            guild_name: guild_name.into(),
            notice_colour,
        }
    }
}

#[async_trait]
impl BanExecutor for HttpBanExecutor {
    async fn notify_target(&self, target: &ResolvedTarget, reason: &str, moderator_tag: &str) {
        let embed = CreateEmbed::new()
            .colour(self.notice_colour)
            .title("🔨 Banned from Server")
            .description(format!("You have been banned from **{}**", self.guild_name))
            .field("Reason", reason, false)
            .field("Moderator", moderator_tag, false)
            .timestamp(Timestamp::now());

        let delivery = async {
            let channel = target.user_id.create_dm_channel(&self.http).await?;
            channel
                .id
                .send_message(&self.http, CreateMessage::new().embed(embed))
                .await?;
            Ok::<_, serenity::Error>(())
        }
        .await;

        if let Err(err) = delivery {
            warn!("Could not send ban notice to {}: {err}", target.display_tag);
        }
    }

    async fn execute_ban(
        &self,
        guild_id: GuildId,
        target: &ResolvedTarget,
        reason: &str,
        moderator_tag: &str,
        retention_days: u8,
    ) -> ModerationResult<()> {
        guild_id
            .ban_with_reason(
                &self.http,
                target.user_id,
                retention_days,
                audit_reason(reason, moderator_tag),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_reason_format() {
        assert_eq!(
            audit_reason("spamming invites", "mod#0001"),
            "spamming invites | Moderator: mod#0001"
        );
        assert_eq!(
            audit_reason("No reason provided", "mod#0001"),
            "No reason provided | Moderator: mod#0001"
        );
    }
}
