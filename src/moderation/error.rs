//! Error types for the moderation subsystem
//!
//! Guard rejections are not errors; they are returned as data through
//! `GuardOutcome`. The variants here cover the transport-level faults that
//! can occur while resolving state or executing an action.

use thiserror::Error;

use poise::serenity_prelude as serenity;

/// Errors that can occur during moderation operations
#[derive(Debug, Error)]
pub enum ModerationError {
    /// Discord API error
    #[error("Discord API error: {0}")]
    Discord(#[from] Box<serenity::Error>),

    /// Generic error
    #[error("Moderation error: {0}")]
    Other(String),
}

impl From<serenity::Error> for ModerationError {
    fn from(error: serenity::Error) -> Self {
        Self::Discord(Box::new(error))
    }
}

impl From<String> for ModerationError {
    fn from(message: String) -> Self {
        Self::Other(message)
    }
}

/// Result type for moderation operations
pub type ModerationResult<T> = Result<T, ModerationError>;
