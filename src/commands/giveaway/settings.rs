use serenity::{all::CommandInteraction, builder::CreateEmbed};

use crate::{
    common::{options::Options, reply::CommandContextReply},
    models::{
        command::CommandContext,
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
        settings::GiveawayAccess,
    },
};

fn subcommand_name(options: &Options) -> Option<String> {
    use serenity::all::ResolvedValue;

    for option in &options.options {
        if let ResolvedValue::SubCommandGroup(subs) = &option.value {
            for sub in subs {
                if let ResolvedValue::SubCommand(_) = &sub.value {
                    return Some(sub.name.to_string());
                }
            }
        }
    }
    None
}

pub async fn settings(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    match subcommand_name(&options).as_deref() {
        Some("view") => view(handler, ctx, cmd).await,
        Some("access") => access(handler, ctx, cmd, &options).await,
        Some("defaults") => defaults(handler, ctx, cmd, &options).await,
        Some("autoreroll") => autoreroll(handler, ctx, cmd).await,
        Some("banlist") => banlist(handler, ctx, cmd, &options).await,
        _ => Err(ResponseError::Execution(
            "Invalid command",
            Some("You must specify a subcommand to use this command!".to_string()),
        )),
    }
}

async fn view(handler: &Handler, ctx: &CommandContext, cmd: &CommandInteraction) -> ResponseResult {
    let settings = handler
        .settings
        .get_or_create()
        .await
        .map_err(|err| ResponseError::Execution(err.user_message(), None))?;
    let bans = handler
        .settings
        .banned_users()
        .await
        .map_err(|err| ResponseError::Execution(err.user_message(), None))?;

    ctx.reply(
        cmd,
        Response::new()
            .embed(
                CreateEmbed::new()
                    .title("Giveaway Settings")
                    .color(0xed4245)
                    .field("Status", settings.access.to_string(), true)
                    .field("Total Giveaways", settings.total_giveaways.to_string(), true)
                    .field(
                        "Default Duration",
                        format!("{} minutes", settings.default_duration / 60),
                        true,
                    )
                    .field("Default Winners", settings.default_winner_count.to_string(), true)
                    .field(
                        "Auto-Reroll",
                        if settings.auto_reroll { "Enabled" } else { "Disabled" },
                        true,
                    )
                    .field("Ban List", format!("{} user(s) banned", bans.len()), true),
            )
            .ephemeral(true),
    )
    .await
}

async fn access(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
    options: &Options<'_>,
) -> ResponseResult {
    let Some(status) = options.get_string("status").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get the requested status",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };
    let access = status.parse().unwrap_or(GiveawayAccess::Enabled);

    if let Err(err) = handler.settings.set_access(access).await {
        return Err(ResponseError::Execution(err.user_message(), None));
    }

    ctx.reply(
        cmd,
        Response::new()
            .content(format!(
                "Giveaways are now {}",
                if access == GiveawayAccess::Enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            ))
            .ephemeral(true),
    )
    .await
}

async fn defaults(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
    options: &Options<'_>,
) -> ResponseResult {
    let Some(setting) = options.get_string("setting").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get the setting to change",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };
    let Some(value) = options.get_integer("value") else {
        return Err(ResponseError::Execution(
            "Could not get the new value",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };

    let confirmation = match setting.as_str() {
        "duration" => {
            let minutes = value.clamp(1, 20160);
            if let Err(err) = handler.settings.set_default_duration(minutes * 60).await {
                return Err(ResponseError::Execution(err.user_message(), None));
            }
            format!("Default giveaway duration set to {minutes} minutes")
        }
        _ => {
            let count = value.clamp(1, 10) as i32;
            if let Err(err) = handler.settings.set_default_winner_count(count).await {
                return Err(ResponseError::Execution(err.user_message(), None));
            }
            format!("Default winner count set to {count}")
        }
    };

    ctx.reply(cmd, Response::new().content(confirmation).ephemeral(true))
        .await
}

async fn autoreroll(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let enabled = match handler.settings.toggle_auto_reroll().await {
        Ok(enabled) => enabled,
        Err(err) => return Err(ResponseError::Execution(err.user_message(), None)),
    };

    ctx.reply(
        cmd,
        Response::new()
            .content(format!(
                "Auto-reroll is now {}",
                if enabled { "enabled" } else { "disabled" }
            ))
            .ephemeral(true),
    )
    .await
}

async fn banlist(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
    options: &Options<'_>,
) -> ResponseResult {
    let action = options
        .get_string("action")
        .into_owned()
        .unwrap_or_else(|| "view".to_string());

    if action == "view" {
        let bans = handler
            .settings
            .banned_users()
            .await
            .map_err(|err| ResponseError::Execution(err.user_message(), None))?;
        if bans.is_empty() {
            return ctx
                .reply(
                    cmd,
                    Response::new()
                        .content(
                            "No users are currently banned from participating in giveaways."
                                .to_string(),
                        )
                        .ephemeral(true),
                )
                .await;
        }
        let lines = bans
            .iter()
            .map(|ban| {
                format!(
                    "<@{}> - Banned by <@{}> - {}",
                    ban.user_id,
                    ban.moderator,
                    ban.reason.as_deref().unwrap_or("No reason provided")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        return ctx
            .reply(
                cmd,
                Response::new()
                    .embed(
                        CreateEmbed::new()
                            .title("Giveaway Ban List")
                            .description(lines)
                            .color(0xed4245),
                    )
                    .ephemeral(true),
            )
            .await;
    }

    let Some(user) = options.get_user("user").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get the user to act on",
            Some("Please provide a user for this action".to_string()),
        ));
    };
    let user_id = user.id.get().to_string();

    let confirmation = if action == "add" {
        let reason = options.get_string("reason").into_owned();
        let banned = match handler
            .settings
            .ban_user(&user_id, &cmd.user.id.get().to_string(), reason.as_deref())
            .await
        {
            Ok(banned) => banned,
            Err(err) => return Err(ResponseError::Execution(err.user_message(), None)),
        };
        if !banned {
            return Err(ResponseError::Execution(
                "That user is already banned from participating in giveaways.",
                None,
            ));
        }
        format!("User {} has been banned from participating in giveaways.", user.tag())
    } else {
        let unbanned = match handler.settings.unban_user(&user_id).await {
            Ok(unbanned) => unbanned,
            Err(err) => return Err(ResponseError::Execution(err.user_message(), None)),
        };
        if !unbanned {
            return Err(ResponseError::Execution(
                "That user is not banned from participating in giveaways.",
                None,
            ));
        }
        format!("User {} has been unbanned from participating in giveaways.", user.tag())
    };

    ctx.reply(cmd, Response::new().content(confirmation).ephemeral(true))
        .await
}
