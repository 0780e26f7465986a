use std::{
    fmt::{Display, Formatter},
    ops::{Deref, DerefMut},
    sync::Arc,
};

use dashmap::DashMap;
use poise::serenity_prelude as serenity;
use serde::{Deserialize, Serialize};
use serenity::prelude::TypeMapKey;

/// Embed colour palette used by command replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedPalette {
    // Colour for rejection and failure embeds
    pub error: u32,
    // Colour for confirmation embeds
    pub success: u32,
}

impl Default for EmbedPalette {
    fn default() -> Self {
        Self {
            error: 0xED4245,
            success: 0x57F287,
        }
    }
}

impl EmbedPalette {
    /// Colour for rejection and failure embeds
    #[must_use]
    pub fn error_colour(&self) -> serenity::Colour {
        serenity::Colour::new(self.error)
    }

    /// Colour for confirmation embeds
    #[must_use]
    pub fn success_colour(&self) -> serenity::Colour {
        serenity::Colour::new(self.success)
    }
}

/// Guild configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildConfig {
    // The ID of the guild
    pub guild_id: u64,
    // Embed colours for command replies
    pub colors: EmbedPalette,
    // Role granting moderation capabilities in addition to Discord permissions
    pub moderator_role_id: Option<u64>,
    // Days of the target's messages deleted along with a ban
    pub delete_message_days: u8,
    // Whether users outside the guild may be banned by raw ID
    pub allow_ban_by_id: bool,
    // Channel for public moderation logs
    pub mod_log_channel_id: Option<u64>,
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self {
            guild_id: 0,
            colors: EmbedPalette::default(),
            moderator_role_id: None,
            delete_message_days: 1,
            allow_ban_by_id: true,
            mod_log_channel_id: None,
        }
    }
}

/// A recorded ban case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanRecord {
    pub id: String,
    pub guild_id: u64,
    pub user_id: u64,
    pub user_tag: String,
    pub moderator_id: u64,
    pub reason: String,
    pub timestamp: String,
}

impl BanRecord {
    /// Create a record with a fresh case ID and the current timestamp.
    #[must_use]
    pub fn new(
        guild_id: u64,
        user_id: u64,
        user_tag: impl Into<String>,
        moderator_id: u64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            guild_id,
            user_id,
            user_tag: user_tag.into(),
            moderator_id,
            reason: reason.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl Display for BanRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Case ID: {}. Guild ID: {}. User ID: {}. Moderator ID: {}. Reason: {}. Timestamp: {}.",
            self.id, self.guild_id, self.user_id, self.moderator_id, self.reason, self.timestamp
        ))
    }
}

/// Centralized data structure for the bot
#[derive(Clone)]
pub struct Data(pub Arc<DataInner>);

// Implement TypeMapKey for Data to allow storing it in Serenity's data map
impl TypeMapKey for Data {
    type Value = Data;
}

impl Default for Data {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("guild_configs", &self.guild_configs)
            .field("ban_records", &self.ban_records)
            .finish()
    }
}

impl Deref for Data {
    type Target = DataInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Data {
    fn deref_mut(&mut self) -> &mut Self::Target {
        Arc::make_mut(&mut self.0)
    }
}

impl Data {
    /// Create a new Data instance
    #[must_use]
    pub fn new() -> Self {
        Self(DataInner::new().into())
    }

    /// Load data from YAML files
    pub async fn load() -> Self {
        Self(Arc::new(DataInner::load().await))
    }

    /// Save data to YAML files
    ///
    /// # Errors
    ///
    /// Returns an error when the data directory cannot be created or the
    /// serialized YAML cannot be written.
    pub async fn save(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.0.save().await
    }

    /// Get the guild configuration for a specific guild
    #[must_use]
    pub fn get_guild_config(&self, guild_id: serenity::GuildId) -> Option<GuildConfig> {
        self.0
            .guild_configs
            .get(&guild_id)
            .map(|entry| entry.value().clone())
    }

    /// Guild configuration, or the defaults for an unconfigured guild.
    #[must_use]
    pub fn guild_config_or_default(&self, guild_id: serenity::GuildId) -> GuildConfig {
        self.get_guild_config(guild_id).unwrap_or_else(|| GuildConfig {
            guild_id: guild_id.get(),
            ..GuildConfig::default()
        })
    }

    /// Record a completed ban case
    pub fn add_ban_record(&self, record: BanRecord) {
        self.0.ban_records.insert(record.id.clone(), record);
    }

    /// Get all recorded ban cases
    #[must_use]
    pub fn get_ban_records(&self) -> Vec<BanRecord> {
        self.0
            .ban_records
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Get a specific ban case by ID
    #[must_use]
    pub fn get_ban_record(&self, id: &str) -> Option<BanRecord> {
        self.0.ban_records.get(id).map(|entry| entry.value().clone())
    }
}

/// Main centralized data structure for the bot
#[derive(Clone)]
pub struct DataInner {
    // Map of guild_id -> guild configuration
    pub guild_configs: DashMap<serenity::GuildId, GuildConfig>,
    // Map of case_id -> ban record
    pub ban_records: DashMap<String, BanRecord>,
}

impl Default for DataInner {
    fn default() -> Self {
        Self::new()
    }
}

impl DataInner {
    // Create a new Data instance
    #[must_use]
    pub fn new() -> Self {
        Self {
            guild_configs: DashMap::new(),
            ban_records: DashMap::new(),
        }
    }

    /// Load data from YAML files
    ///
    /// Missing or unreadable files yield an empty instance.
    pub async fn load() -> Self {
        let data = Self::new();

        if let Ok(file_content) = tokio::fs::read_to_string(CONFIG_FILE).await {
            if let Ok(configs) = serde_yaml::from_str::<Vec<GuildConfig>>(&file_content) {
                for config in configs {
                    let guild_id = serenity::GuildId::new(config.guild_id);
                    data.guild_configs.insert(guild_id, config);
                }
            }
        }

        if let Ok(file_content) = tokio::fs::read_to_string(RECORDS_FILE).await {
            if let Ok(records) = serde_yaml::from_str::<Vec<BanRecord>>(&file_content) {
                for record in records {
                    data.ban_records.insert(record.id.clone(), record);
                }
            }
        }

        data
    }

    /// Save data to YAML files
    ///
    /// # Errors
    ///
    /// Returns an error when the data directory cannot be created or the
    /// serialized YAML cannot be written.
    pub async fn save(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !std::path::Path::new(DATA_DIR).exists() {
            tokio::fs::create_dir_all(DATA_DIR).await?;
        }

        let configs: Vec<GuildConfig> = self
            .guild_configs
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        tokio::fs::write(CONFIG_FILE, serde_yaml::to_string(&configs)?).await?;

        let records: Vec<BanRecord> = self
            .ban_records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        tokio::fs::write(RECORDS_FILE, serde_yaml::to_string(&records)?).await?;

        Ok(())
    }
}

/// Data directory name
const DATA_DIR: &str = "data";
/// Guild configuration file
const CONFIG_FILE: &str = "data/guild_configs.yaml";
/// Ban record file
const RECORDS_FILE: &str = "data/ban_records.yaml";

/// Tests for the data module
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_new() {
        let data = Data::new();
        assert_eq!(data.guild_configs.len(), 0);
        assert_eq!(data.ban_records.len(), 0);
    }

    #[test]
    fn test_guild_config_default() {
        let config = GuildConfig::default();
        assert_eq!(config.guild_id, 0);
        assert_eq!(config.colors, EmbedPalette::default());
        assert!(config.moderator_role_id.is_none());
        assert_eq!(config.delete_message_days, 1);
        assert!(config.allow_ban_by_id);
        assert!(config.mod_log_channel_id.is_none());
    }

    #[test]
    fn test_guild_config_or_default_fills_guild_id() {
        let data = Data::new();
        let config = data.guild_config_or_default(serenity::GuildId::new(12345));
        assert_eq!(config.guild_id, 12345);
        assert_eq!(config.delete_message_days, 1);
    }

    #[test]
    fn test_data_debug_impl() {
        let data = Data::new();
        let debug_output = format!("{data:?}");
        assert!(debug_output.contains("Data"));
        assert!(debug_output.contains("guild_configs"));
        assert!(debug_output.contains("ban_records"));
    }

    #[test]
    fn test_guild_config_serialization() {
        let config = GuildConfig {
            guild_id: 12345,
            moderator_role_id: Some(67890),
            delete_message_days: 3,
            allow_ban_by_id: false,
            mod_log_channel_id: Some(54321),
            ..GuildConfig::default()
        };

        let serialized = serde_yaml::to_string(&config).expect("Failed to serialize");
        assert!(serialized.contains("guild_id: 12345"));
        assert!(serialized.contains("moderator_role_id: 67890"));
        assert!(serialized.contains("delete_message_days: 3"));
        assert!(serialized.contains("allow_ban_by_id: false"));

        let deserialized: GuildConfig =
            serde_yaml::from_str(&serialized).expect("Failed to deserialize");
        assert_eq!(deserialized.guild_id, 12345);
        assert_eq!(deserialized.moderator_role_id, Some(67890));
        assert_eq!(deserialized.delete_message_days, 3);
        assert!(!deserialized.allow_ban_by_id);
        assert_eq!(deserialized.mod_log_channel_id, Some(54321));
    }

    #[test]
    fn test_ban_record_serialization() {
        let record = BanRecord {
            id: "case-id".to_string(),
            guild_id: 11111,
            user_id: 12345,
            user_tag: "someone#0001".to_string(),
            moderator_id: 67890,
            reason: "Test ban".to_string(),
            timestamp: "2023-01-01T00:00:00Z".to_string(),
        };

        let serialized = serde_yaml::to_string(&record).expect("Failed to serialize");
        assert!(serialized.contains("id: case-id"));
        assert!(serialized.contains("user_id: 12345"));
        assert!(serialized.contains("reason: Test ban"));

        let deserialized: BanRecord =
            serde_yaml::from_str(&serialized).expect("Failed to deserialize");
        assert_eq!(deserialized.id, "case-id");
        assert_eq!(deserialized.user_tag, "someone#0001");
        assert_eq!(deserialized.moderator_id, 67890);
    }

    #[test]
    fn test_ban_record_new_fills_identity() {
        let record = BanRecord::new(1, 2, "someone#0001", 3, "spam");
        assert!(!record.id.is_empty());
        assert_eq!(record.guild_id, 1);
        assert_eq!(record.user_id, 2);
        assert_eq!(record.moderator_id, 3);
        assert_eq!(record.reason, "spam");

        let display = record.to_string();
        assert!(display.contains(&record.id));
        assert!(display.contains("Reason: spam"));
    }

    #[test]
    fn test_ban_record_roundtrip_through_data() {
        let data = Data::new();
        let record = BanRecord::new(1, 2, "someone#0001", 3, "spam");
        let id = record.id.clone();

        data.add_ban_record(record);
        assert_eq!(data.get_ban_records().len(), 1);
        assert_eq!(data.get_ban_record(&id).map(|r| r.user_id), Some(2));
        assert!(data.get_ban_record("missing").is_none());
    }
}
