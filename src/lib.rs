pub mod commands;
pub mod data;
pub mod handlers;
pub mod logging;
pub mod moderation;

pub const BOT_NAME: &str = "gavel";
pub const COMMAND_TARGET: &str = "gavel::command";
pub const ERROR_TARGET: &str = "gavel::error";
pub const EVENT_TARGET: &str = "gavel::handlers";
pub const CONSOLE_TARGET: &str = "gavel";

pub use data::Data;
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
