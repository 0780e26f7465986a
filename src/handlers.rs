use poise::serenity_prelude::{self as serenity, Context, EventHandler, GuildId, Ready, User};
use tracing::{info, warn};

use crate::EVENT_TARGET;

pub struct Handler;

#[serenity::async_trait]
impl EventHandler for Handler {
    /// Called when the gateway session is established; the cache may still
    /// be filling.
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            target: EVENT_TARGET,
            "Connected as {} on shard {}",
            ready.user.name,
            ctx.shard_id
        );
    }

    /// Called once the cache is fully populated.
    async fn cache_ready(&self, ctx: Context, guilds: Vec<GuildId>) {
        let cached = ctx.cache.guild_count();
        if cached != guilds.len() {
            warn!(
                target: EVENT_TARGET,
                "Guild count mismatch: {cached} cached vs {} reported",
                guilds.len()
            );
        }
        info!(target: EVENT_TARGET, "Cache ready; serving {} guild(s)", guilds.len());
    }

    /// Bans issued outside the bot surface here too; keep the audit trail
    /// for both.
    async fn guild_ban_addition(&self, _ctx: Context, guild_id: GuildId, banned_user: User) {
        info!(
            target: EVENT_TARGET,
            guild_id = %guild_id,
            user_id = %banned_user.id,
            user_tag = %banned_user.tag(),
            "Ban recorded in guild"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // This test verifies at compile time that Handler implements EventHandler
    #[test]
    fn test_handler_implements_event_handler() {
        fn assert_impl<T: EventHandler>() {}
        assert_impl::<Handler>();
    }
}
