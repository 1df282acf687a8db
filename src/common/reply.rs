use std::sync::atomic::Ordering;

use serenity::{
    all::{CommandInteraction, Message},
    builder::{
        CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage,
        EditInteractionResponse,
    },
};
use tracing::error;

use crate::models::{
    command::{CommandContext, FailedCommandContext, InteractionContext},
    response::{Response, ResponseError, ResponseResult},
};

#[async_trait::async_trait]
pub trait CommandContextReply {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError>;

    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult {
        self.reply_get_message(cmd, response).await?;
        Ok(())
    }
}

fn response_message(response: Response) -> CreateInteractionResponseMessage {
    let mut reply = CreateInteractionResponseMessage::new();
    if let Some(content) = response.content {
        reply = reply.content(content);
    }
    if let Some(embeds) = response.embeds {
        reply = reply.embeds(embeds);
    }
    if let Some(allowed_mentions) = response.allowed_mentions {
        reply = reply.allowed_mentions(allowed_mentions);
    }
    if let Some(components) = response.components {
        reply = reply.components(components);
    }
    if response.ephemeral {
        reply = reply.ephemeral(true);
    }
    reply
}

#[async_trait::async_trait]
impl CommandContextReply for CommandContext {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError> {
        // A command may only create one interaction response; everything
        // after the first reply has to be an edit.
        if self.has_responsed.load(Ordering::Relaxed) {
            let mut edit = EditInteractionResponse::new();
            if let Some(content) = response.content {
                edit = edit.content(content);
            }
            if let Some(embeds) = response.embeds {
                edit = edit.embeds(embeds);
            }
            if let Some(allowed_mentions) = response.allowed_mentions {
                edit = edit.allowed_mentions(allowed_mentions);
            }
            if let Some(components) = response.components {
                edit = edit.components(components);
            }

            match cmd.edit_response(&self.ctx.http, edit).await {
                Ok(message) => Ok(message),
                Err(err) => {
                    error!("Attempted to edit a response to a command, failed with error: {err}");
                    Err(ResponseError::Serenity(err))
                }
            }
        } else {
            match cmd
                .create_response(
                    &self.ctx.http,
                    CreateInteractionResponse::Message(response_message(response)),
                )
                .await
            {
                Ok(()) => {
                    self.has_responsed.store(true, Ordering::Relaxed);
                    match cmd.get_response(&self.ctx.http).await {
                        Ok(message) => Ok(message),
                        Err(err) => {
                            error!(
                                "A message was sent, but failed to fetch, failed with error: {err}"
                            );
                            Err(ResponseError::Serenity(err))
                        }
                    }
                }
                Err(err) => {
                    error!("Attempted to create a response to a command, failed with error: {err}");
                    Err(ResponseError::Serenity(err))
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl CommandContextReply for FailedCommandContext {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError> {
        match cmd
            .create_response(
                &self.ctx.http,
                CreateInteractionResponse::Message(response_message(response)),
            )
            .await
        {
            Ok(()) => match cmd.get_response(&self.ctx.http).await {
                Ok(message) => Ok(message),
                Err(err) => {
                    error!("A message was sent, but failed to fetch, failed with error: {err}");
                    Err(ResponseError::Serenity(err))
                }
            },
            Err(err) => {
                error!("Attempted to create a response to a command, failed with error: {err}");
                Err(ResponseError::Serenity(err))
            }
        }
    }
}

impl InteractionContext<'_> {
    /// Ephemeral acknowledgement of a component interaction.
    pub async fn reply(&self, response: Response) -> ResponseResult {
        match self
            .interaction
            .create_response(
                &self.ctx.http,
                CreateInteractionResponse::Message(response_message(response)),
            )
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => {
                error!("Attempted to respond to an interaction, failed with error: {err}");
                Err(ResponseError::Serenity(err))
            }
        }
    }

    pub async fn error_message(&self, message: &str) -> ResponseResult {
        self.reply(
            Response::new()
                .embed(CreateEmbed::new().title(message.to_string()).color(0xff0000))
                .ephemeral(true),
        )
        .await
    }
}
