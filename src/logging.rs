use std::path::Path;
use std::time::Instant;

use poise::{Context, FrameworkError};
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::{COMMAND_TARGET, CONSOLE_TARGET, Data, ERROR_TARGET, Error};

/// Log directory name
pub const LOG_DIR: &str = "logs";
/// Moderation log file name
pub const MODERATION_LOG_FILE: &str = "moderation";

/// Initialize logging: human-readable console output plus a JSON moderation
/// log file with daily rotation.
pub fn init() -> Result<(), Error> {
    if !Path::new(LOG_DIR).exists() {
        std::fs::create_dir_all(LOG_DIR)?;
    }

    let moderation_file = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, MODERATION_LOG_FILE);

    let console_layer = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_ansi(true);

    let moderation_layer = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_ansi(false)
        .json()
        .with_writer(moderation_file);

    // Levels stay runtime-configurable; serenity's own chatter is filtered
    // out unless asked for explicitly.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info").add_directive("serenity=error".parse().unwrap())
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(moderation_layer)
        .init();

    info!(target: CONSOLE_TARGET, "Logging initialized");
    Ok(())
}

// Start time of the command currently executing on this thread
thread_local! {
    static COMMAND_START: std::cell::RefCell<Option<Instant>> =
        const { std::cell::RefCell::new(None) };
}

/// Command, guild, and user identifiers shared by every command log line.
fn invocation_fields(ctx: &Context<'_, Data, Error>) -> (String, String, String) {
    let command = ctx.command().qualified_name.clone();
    let guild_id = ctx
        .guild_id()
        .map_or_else(|| "DM".to_string(), |id| id.get().to_string());
    let user_id = ctx.author().id.get().to_string();
    (command, guild_id, user_id)
}

/// Log the start of a command execution (pre-command hook)
pub fn log_command_start(ctx: Context<'_, Data, Error>) {
    COMMAND_START.with(|cell| {
        *cell.borrow_mut() = Some(Instant::now());
    });

    let (command, guild_id, user_id) = invocation_fields(&ctx);
    info!(
        target: COMMAND_TARGET,
        command = %command,
        guild_id = %guild_id,
        user_id = %user_id,
        invocation = %ctx.invocation_string(),
        event = "start",
        "Command started"
    );
}

/// Log the end of a command execution (post-command hook)
pub fn log_command_end(ctx: Context<'_, Data, Error>) {
    let duration_ms = COMMAND_START
        .with(|cell| cell.borrow_mut().take())
        .map_or(0, |start| {
            u64::try_from(start.elapsed().as_millis()).unwrap_or_default()
        });

    let (command, guild_id, user_id) = invocation_fields(&ctx);
    info!(
        target: COMMAND_TARGET,
        command = %command,
        guild_id = %guild_id,
        user_id = %user_id,
        duration_ms = duration_ms,
        event = "end",
        "Command finished"
    );
}

/// Log errors that occur during command execution
pub fn log_command_error(error: &FrameworkError<'_, Data, Error>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            let (command, guild_id, user_id) = invocation_fields(ctx);
            error!(
                target: ERROR_TARGET,
                command = %command,
                guild_id = %guild_id,
                user_id = %user_id,
                error = %error,
                "Command error"
            );
        }
        err => {
            error!(
                target: ERROR_TARGET,
                error = ?err,
                "Framework error"
            );
        }
    }
}
