use std::sync::atomic::AtomicBool;

use serenity::{
    all::{CommandInteraction, ComponentInteraction},
    builder::CreateCommand,
    prelude::Context as IncomingContext,
};

use super::{handler::Handler, response::ResponseResult};

pub struct CommandContext {
    pub ctx: IncomingContext,
    pub has_responsed: AtomicBool,
}

/// Context for replying before a full command context could be built, for
/// example when a command arrives outside of a guild.
pub struct FailedCommandContext {
    pub ctx: IncomingContext,
}

pub struct InteractionContext<'a> {
    pub ctx: IncomingContext,
    pub interaction: &'a ComponentInteraction,
}

impl<'a> InteractionContext<'a> {
    pub fn new(ctx: IncomingContext, interaction: &'a ComponentInteraction) -> Self {
        InteractionContext { ctx, interaction }
    }
}

#[async_trait::async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;
    fn register(&self) -> CreateCommand;
    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        command: &CommandInteraction,
    ) -> ResponseResult;
}
