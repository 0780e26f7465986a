//! Guild ban-list access
//!
//! Read-only view of a guild's ban list, consumed by the guard pipeline's
//! already-banned check.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude::{GuildId, Http, UserId};

use crate::moderation::ModerationResult;

/// Read access to a guild's ban list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BanListReader: Send + Sync {
    /// Fetch the IDs of every currently banned user.
    async fn fetch_banned_ids(&self, guild_id: GuildId) -> ModerationResult<HashSet<UserId>>;
}

/// Ban-list reader backed by the Discord HTTP API.
pub struct HttpBanListReader {
    http: Arc<Http>,
}

impl HttpBanListReader {
    /// Create a new reader
    #[must_use]
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl BanListReader for HttpBanListReader {
    async fn fetch_banned_ids(&self, guild_id: GuildId) -> ModerationResult<HashSet<UserId>> {
        let bans = guild_id.bans(&self.http, None, None).await?;
        Ok(bans.into_iter().map(|ban| ban.user.id).collect())
    }
}
