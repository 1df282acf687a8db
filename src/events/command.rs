use std::sync::atomic::AtomicBool;

use serenity::{all::CommandInteraction, builder::CreateEmbed, prelude::Context as IncomingContext};
use tracing::{debug, error};

use crate::{
    commands::get_command_list,
    common::reply::CommandContextReply,
    models::{
        command::{CommandContext, FailedCommandContext},
        handler::Handler,
        response::{Response, ResponseError},
    },
};

impl Handler {
    pub async fn on_command(&self, ctx: IncomingContext, command: CommandInteraction) {
        let start = std::time::Instant::now();

        if command.guild_id.is_none() {
            let fail_context = FailedCommandContext { ctx };
            if let Err(err) = fail_context
                .reply(
                    &command,
                    Response::new().content("Giveaways cannot be run outside of guilds".to_string()),
                )
                .await
            {
                error!("Failed to reply to command: {:?}", err);
            }
            return;
        }

        let command_context = CommandContext {
            ctx,
            has_responsed: AtomicBool::new(false),
        };

        for existing_command in get_command_list() {
            if existing_command.name() != command.data.name {
                continue;
            }
            match existing_command
                .router(self, &command_context, &command)
                .await
            {
                Ok(()) => {}
                // Business errors carry their own user-facing sentence;
                // send it instead of leaving the interaction hanging.
                Err(ResponseError::Execution(title, description)) => {
                    let mut embed = CreateEmbed::new().title(title).color(0xff0000);
                    if let Some(description) = description {
                        embed = embed.description(description);
                    }
                    if let Err(err) = command_context
                        .reply(&command, Response::new().embed(embed).ephemeral(true))
                        .await
                    {
                        error!("Failed to reply to command: {:?}", err);
                    }
                }
                Err(ResponseError::Serenity(err)) => {
                    error!("Failed to handle command: {err}");
                }
            }
        }

        debug!("Took {:?} to handle a command", start.elapsed());
    }
}
