use serenity::{all::CommandInteraction, builder::CreateEmbed};

use crate::{
    common::{options::Options, reply::CommandContextReply},
    models::{
        command::CommandContext,
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

pub async fn end(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(id) = options.get_integer("giveaway_id") else {
        return Err(ResponseError::Execution(
            "Could not get the giveaway ID",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };

    match handler.controller.end(id).await {
        Ok(winners) => {
            let description = if winners.is_empty() {
                "No one entered, so there are no winners.".to_string()
            } else {
                format!(
                    "Winner(s): {}",
                    winners
                        .iter()
                        .map(|winner| format!("<@{winner}>"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            };
            ctx.reply(
                cmd,
                Response::new()
                    .embed(
                        CreateEmbed::new()
                            .title(format!("Giveaway #{id} ended"))
                            .description(description)
                            .color(0x00ff00),
                    )
                    .ephemeral(true),
            )
            .await
        }
        Err(err) => Err(ResponseError::Execution(err.user_message(), None)),
    }
}
