use serenity::{all::CommandInteraction, builder::CreateEmbed};
use tracing::error;

use crate::{
    common::{clock, options::Options, reply::CommandContextReply},
    giveaway::lifecycle::GiveawayDraft,
    models::{
        command::CommandContext,
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
        settings::GiveawayAccess,
    },
};

pub async fn create(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(prize) = options.get_string("prize").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get the giveaway prize",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };

    let settings = match handler.settings.get_or_create().await {
        Ok(settings) => settings,
        Err(err) => {
            error!("Could not load giveaway settings, failed with error: {err}");
            return Err(ResponseError::Execution(err.user_message(), None));
        }
    };
    // Check the access gate before anything is announced; the controller
    // checks again before it persists.
    if settings.access == GiveawayAccess::Disabled {
        return Err(ResponseError::Execution(
            "Giveaways are currently disabled.",
            None,
        ));
    }

    let duration_minutes = options
        .get_integer("duration")
        .unwrap_or(settings.default_duration / 60)
        .clamp(1, 20160);
    let winner_count = options
        .get_integer("winners")
        .unwrap_or(i64::from(settings.default_winner_count))
        .clamp(1, 10) as i32;
    let channel = options
        .get_channel("channel")
        .into_owned()
        .map_or(cmd.channel_id, |channel| channel.id);
    let required_role_id = options
        .get_role("required_role")
        .into_owned()
        .map(|role| role.id.get().to_string());
    let ping_role_id = options
        .get_role("ping_role")
        .into_owned()
        .map(|role| role.id.get().to_string());

    let duration_seconds = duration_minutes * 60;
    let end_time_ms = clock::now_ms() + duration_seconds * 1000;

    // The announcement goes out first so its message id can be stored with
    // the record. If persisting fails afterwards the announcement is left
    // behind without a backing giveaway; that window is accepted and logged,
    // not repaired.
    let message = match handler
        .presenter
        .announce(
            channel,
            &prize,
            end_time_ms,
            required_role_id.as_deref(),
            ping_role_id.as_deref(),
        )
        .await
    {
        Ok(message) => message,
        Err(err) => {
            error!("Attempted to announce a giveaway, failed with error: {err}");
            return Err(ResponseError::Serenity(err));
        }
    };

    let draft = GiveawayDraft {
        prize,
        duration_seconds,
        winner_count,
        required_role_id,
        ping_role_id,
        message_id: message.id.get().to_string(),
        channel_id: channel.get().to_string(),
    };

    match handler.controller.start(draft).await {
        Ok(id) => {
            ctx.reply(
                cmd,
                Response::new()
                    .embed(
                        CreateEmbed::new()
                            .title(format!("Giveaway #{id} started"))
                            .description(format!(
                                "The giveaway has been posted in <#{channel}>."
                            ))
                            .color(0x00ff00),
                    )
                    .ephemeral(true),
            )
            .await
        }
        Err(err) => {
            error!(
                "Announcement message {} has no backing giveaway record: {err}",
                message.id
            );
            Err(ResponseError::Execution(err.user_message(), None))
        }
    }
}
