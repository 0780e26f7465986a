use std::collections::HashMap;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use serenity::{
    ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, Http, Member, PartialGuild, RoleId,
    Timestamp,
};
use tracing::{error, info, warn};

use crate::data::{BanRecord, GuildConfig};
use crate::moderation::{
    ActorProfile, BanExecutor, BanGuard, BanRequest, GuardOutcome, GuardPolicy,
    GuildPermissionOracle, HttpBanExecutor, HttpBanListReader, HttpTargetResolver,
    RejectionReason, member_rank,
};
use crate::{Context, Error};

/// Ban a user from the server
///
/// The target may be a mention or a raw user ID; IDs also reach users who
/// have already left the server.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "User mention or ID to ban"] user: Option<String>,
    #[rest]
    #[description = "Reason for the ban"]
    reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("ban invoked outside a guild")?;
    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let config = ctx.data().guild_config_or_default(guild_id);
    let http = Arc::clone(&ctx.serenity_context().http);

    let positions = role_positions(&guild);
    let actor_member = ctx
        .author_member()
        .await
        .ok_or("caller is not a guild member")?;
    let bot_member = guild_id.member(ctx.http(), ctx.framework().bot_id).await?;

    let request = BanRequest {
        guild_id,
        actor: profile_of(&positions, &actor_member),
        executor: profile_of(&positions, &bot_member),
        target_token: user,
        reason,
    };

    let oracle =
        GuildPermissionOracle::from_guild(&guild, config.moderator_role_id.map(RoleId::new));
    let resolver = HttpTargetResolver::new(Arc::clone(&http), &guild);
    let ban_list = HttpBanListReader::new(Arc::clone(&http));
    let guard = BanGuard::new(&oracle, &resolver, &ban_list).with_policy(GuardPolicy {
        allow_ban_by_id: config.allow_ban_by_id,
    });

    let target = match guard.evaluate(&request).await {
        GuardOutcome::Rejected(rejection) => {
            info!(
                target: crate::COMMAND_TARGET,
                guild_id = %guild_id,
                moderator_id = %request.actor.user_id,
                rejection = ?rejection,
                "Ban request rejected"
            );
            ctx.send(rejection_reply(&config, rejection)).await?;
            return Ok(());
        }
        GuardOutcome::Allowed(target) => target,
    };

    let moderator_tag = ctx.author().tag();
    let reason_text = request.reason_text().to_string();
    let executor = HttpBanExecutor::new(
        Arc::clone(&http),
        guild.name.clone(),
        config.colors.error_colour(),
    );

    // The notice must go out while the DM channel still works; the ban
    // closes it. Only current members get one.
    if target.is_guild_member {
        executor
            .notify_target(&target, &reason_text, &moderator_tag)
            .await;
    }

    match executor
        .execute_ban(
            guild_id,
            &target,
            &reason_text,
            &moderator_tag,
            config.delete_message_days,
        )
        .await
    {
        Ok(()) => {
            let record = BanRecord::new(
                guild_id.get(),
                target.user_id.get(),
                target.display_tag.clone(),
                request.actor.user_id.get(),
                reason_text.clone(),
            );
            info!(
                target: crate::COMMAND_TARGET,
                case_id = %record.id,
                guild_id = %guild_id,
                user_id = %target.user_id,
                moderator_id = %request.actor.user_id,
                reason = %reason_text,
                "User banned"
            );

            let embed = success_embed(
                &config,
                &target.display_tag,
                &reason_text,
                &moderator_tag,
                &record.id,
            );
            ctx.send(poise::CreateReply::default().embed(embed.clone()))
                .await?;
            post_mod_log(&http, &config, embed).await;

            ctx.data().add_ban_record(record);
            if let Err(err) = ctx.data().save().await {
                error!("Failed to save ban records: {err}");
            }
        }
        Err(err) => {
            error!(
                target: crate::ERROR_TARGET,
                guild_id = %guild_id,
                user_id = %target.user_id,
                error = %err,
                "Ban execution failed"
            );
            ctx.send(
                poise::CreateReply::default().embed(
                    CreateEmbed::new()
                        .colour(config.colors.error_colour())
                        .title("❌ Error")
                        .description("An error occurred while banning the user."),
                ),
            )
            .await?;
        }
    }

    Ok(())
}

/// Snapshot of a guild's role positions, for rank comparisons.
fn role_positions(guild: &PartialGuild) -> HashMap<RoleId, u16> {
    guild
        .roles
        .iter()
        .map(|(id, role)| (*id, role.position))
        .collect()
}

/// Build the guard-pipeline profile of a guild member.
fn profile_of(positions: &HashMap<RoleId, u16>, member: &Member) -> ActorProfile {
    ActorProfile::new(
        member.user.id,
        member_rank(positions, &member.roles),
        member.roles.clone(),
    )
}

fn rejection_reply(config: &GuildConfig, rejection: RejectionReason) -> poise::CreateReply {
    poise::CreateReply::default().embed(
        CreateEmbed::new()
            .colour(config.colors.error_colour())
            .title(rejection.title())
            .description(rejection.to_string()),
    )
}

fn success_embed(
    config: &GuildConfig,
    banned_tag: &str,
    reason: &str,
    moderator_tag: &str,
    case_id: &str,
) -> CreateEmbed {
    CreateEmbed::new()
        .colour(config.colors.success_colour())
        .title("🔨 User Banned")
        .description(format!("Successfully banned {banned_tag}"))
        .field("Reason", reason, false)
        .field("Moderator", moderator_tag, false)
        .footer(CreateEmbedFooter::new(format!("Case {case_id}")))
        .timestamp(Timestamp::now())
}

/// Mirror a confirmation embed into the configured moderation log channel.
async fn post_mod_log(http: &Http, config: &GuildConfig, embed: CreateEmbed) {
    let Some(channel_id) = config.mod_log_channel_id else {
        return;
    };

    if let Err(err) = ChannelId::new(channel_id)
        .send_message(http, CreateMessage::new().embed(embed))
        .await
    {
        warn!("Could not post to moderation log channel {channel_id}: {err}");
    }
}
