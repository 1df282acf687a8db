use serenity::{all::CommandInteraction, builder::CreateEmbed};

use crate::{
    common::{options::Options, reply::CommandContextReply},
    models::{
        command::CommandContext,
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

pub async fn reroll(
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
    let count = options.get_integer("count").unwrap_or(1).clamp(1, 10) as usize;

    match handler.controller.reroll(id, count).await {
        Ok(new_winners) => {
            ctx.reply(
                cmd,
                Response::new()
                    .embed(
                        CreateEmbed::new()
                            .title(format!("Giveaway #{id} rerolled"))
                            .description(format!(
                                "New winner(s): {}",
                                new_winners
                                    .iter()
                                    .map(|winner| format!("<@{winner}>"))
                                    .collect::<Vec<_>>()
                                    .join(", ")
                            ))
                            .color(0x00ff00),
                    )
                    .ephemeral(true),
            )
            .await
        }
        Err(err) => Err(ResponseError::Execution(err.user_message(), None)),
    }
}
